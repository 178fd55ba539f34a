pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

use crate::models::PriceRecord;

pub use memory::InMemoryPriceRepository;
pub use postgres::PgPriceRepository;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    #[error("price store unavailable: {0}")]
    Unavailable(String),

    #[error("price store did not answer within {0:?}")]
    Timeout(Duration),
}

impl From<sqlx::Error> for StoreError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                StoreError::Unavailable(value.to_string())
            }
            other => StoreError::Database(other),
        }
    }
}

/// Source of candidate price records.
///
/// An empty result is a normal answer, never an error. When `at` is given an
/// implementation may narrow the candidates to the records valid at that
/// instant (or directly to the winner); callers re-apply the selection rule
/// to whatever comes back.
#[async_trait]
pub trait PriceRepository: Send + Sync {
    async fn find_candidates(
        &self,
        brand_id: i32,
        product_id: i64,
        at: Option<NaiveDateTime>,
    ) -> Result<Vec<PriceRecord>, StoreError>;
}
