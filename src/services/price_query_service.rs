use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use moka::future::Cache;
use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::errors::AppError;
use crate::models::{PriceRecord, PriceResponse};
use crate::services::price_resolver;
use crate::store::{PriceRepository, StoreError};

/// Exact cache key: two instants a nanosecond apart are different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PriceKey {
    pub brand_id: i32,
    pub product_id: i64,
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCacheConfig {
    pub max_capacity: u64,
    pub ttl: Duration,
    /// Upper bound for a single repository call.
    pub store_timeout: Duration,
}

impl Default for PriceCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Duration::from_secs(600),
            store_timeout: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PriceCacheStats {
    #[schema(example = 3)]
    pub entries: u64,
    #[schema(example = 10000)]
    pub max_capacity: u64,
    #[schema(example = 600)]
    pub ttl_secs: u64,
}

/// Memoizing front for applicable-price lookups.
///
/// Outcomes, including "no price applies", are cached per [`PriceKey`] until
/// evicted by capacity or TTL. Concurrent misses on one key share a single
/// repository call. Repository failures reach the caller and leave the key
/// uncached.
#[derive(Clone)]
pub struct PriceQueryService {
    repository: Arc<dyn PriceRepository>,
    cache: Cache<PriceKey, Option<PriceRecord>>,
    config: PriceCacheConfig,
}

impl PriceQueryService {
    pub fn new(repository: Arc<dyn PriceRepository>, config: PriceCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self {
            repository,
            cache,
            config,
        }
    }

    pub async fn query(
        &self,
        brand_id: i32,
        product_id: i64,
        at: NaiveDateTime,
    ) -> Result<Option<PriceRecord>, AppError> {
        let started = Instant::now();
        let key = PriceKey {
            brand_id,
            product_id,
            at,
        };

        let entry = self
            .cache
            .entry(key)
            .or_try_insert_with(self.load(key))
            .await?;

        let source = if entry.is_fresh() { "store" } else { "cache" };
        let result = entry.into_value();
        debug!(
            "price query brandId={} productId={} date={} found={} source={} tookMs={}",
            brand_id,
            product_id,
            at,
            result.is_some(),
            source,
            started.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Same as [`query`](Self::query), shaped for the HTTP layer.
    pub async fn query_response(
        &self,
        brand_id: i32,
        product_id: i64,
        at: NaiveDateTime,
    ) -> Result<Option<PriceResponse>, AppError> {
        Ok(self
            .query(brand_id, product_id, at)
            .await?
            .map(PriceResponse::from))
    }

    /// Drops every cached outcome. Subsequent queries go back to the store.
    pub fn clear(&self) {
        self.cache.invalidate_all();
    }

    pub async fn stats(&self) -> PriceCacheStats {
        self.cache.run_pending_tasks().await;
        PriceCacheStats {
            entries: self.cache.entry_count(),
            max_capacity: self.config.max_capacity,
            ttl_secs: self.config.ttl.as_secs(),
        }
    }

    async fn load(&self, key: PriceKey) -> Result<Option<PriceRecord>, StoreError> {
        let timeout = self.config.store_timeout;
        let candidates = tokio::time::timeout(
            timeout,
            self.repository
                .find_candidates(key.brand_id, key.product_id, Some(key.at)),
        )
        .await
        .map_err(|_| StoreError::Timeout(timeout))??;

        Ok(price_resolver::resolve(
            &candidates,
            key.brand_id,
            key.product_id,
            key.at,
        ))
    }
}
