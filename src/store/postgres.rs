use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::PgPool;
use tracing::{debug, error};

use crate::db;
use crate::models::PriceRecord;
use crate::store::{PriceRepository, StoreError};

/// `PriceRepository` over the `prices` table. Interval and priority filtering
/// is pushed into SQL when the instant is known.
#[derive(Clone)]
pub struct PgPriceRepository {
    pool: PgPool,
}

impl PgPriceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Applies the bundled schema and reference data migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl PriceRepository for PgPriceRepository {
    async fn find_candidates(
        &self,
        brand_id: i32,
        product_id: i64,
        at: Option<NaiveDateTime>,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        let result = match at {
            Some(at) => db::price_queries::fetch_top_applicable(&self.pool, brand_id, product_id, at)
                .await
                .map(|top| top.into_iter().collect::<Vec<_>>()),
            None => db::price_queries::fetch_for_product(&self.pool, brand_id, product_id).await,
        };

        let records = result.map_err(|e| {
            error!("Failed to load prices for brand {} product {}: {}", brand_id, product_id, e);
            StoreError::from(e)
        })?;

        debug!(
            "db find_candidates brandId={} productId={} date={:?} rows={}",
            brand_id, product_id, at, records.len()
        );
        Ok(records)
    }
}
