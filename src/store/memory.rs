use std::sync::Arc;

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use dashmap::DashMap;

use crate::models::PriceRecord;
use crate::store::{PriceRepository, StoreError};

/// Thread-safe in-process price table, indexed by `(brand_id, product_id)`.
#[derive(Clone, Default)]
pub struct InMemoryPriceRepository {
    index: Arc<DashMap<(i32, i64), Vec<PriceRecord>>>,
}

impl InMemoryPriceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = PriceRecord>) -> Self {
        let repository = Self::new();
        for record in records {
            repository.insert(record);
        }
        repository
    }

    /// Brand 1 / product 35455 tariffs, the same rows the seed migration loads.
    pub fn with_reference_data() -> Self {
        Self::from_records(reference_records())
    }

    pub fn insert(&self, record: PriceRecord) {
        self.index
            .entry((record.brand_id, record.product_id))
            .or_default()
            .push(record);
    }

    /// Total number of stored records.
    pub fn len(&self) -> usize {
        self.index.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PriceRepository for InMemoryPriceRepository {
    async fn find_candidates(
        &self,
        brand_id: i32,
        product_id: i64,
        at: Option<NaiveDateTime>,
    ) -> Result<Vec<PriceRecord>, StoreError> {
        let Some(entry) = self.index.get(&(brand_id, product_id)) else {
            return Ok(Vec::new());
        };

        let records = match at {
            Some(at) => entry.value().iter().filter(|r| r.applies_at(at)).cloned().collect(),
            None => entry.value().clone(),
        };
        Ok(records)
    }
}

pub fn reference_records() -> Vec<PriceRecord> {
    vec![
        reference_row(1, 0, (2020, 6, 14, 0, 0, 0), (2020, 12, 31, 23, 59, 59), "35.50"),
        reference_row(2, 1, (2020, 6, 14, 15, 0, 0), (2020, 6, 14, 18, 30, 0), "25.45"),
        reference_row(3, 1, (2020, 6, 15, 0, 0, 0), (2020, 6, 15, 11, 0, 0), "30.50"),
        reference_row(4, 1, (2020, 6, 15, 16, 0, 0), (2020, 12, 31, 23, 59, 59), "38.95"),
    ]
}

type Stamp = (i32, u32, u32, u32, u32, u32);

fn reference_row(price_list: i32, priority: i32, start: Stamp, end: Stamp, price: &str) -> PriceRecord {
    PriceRecord {
        brand_id: 1,
        product_id: 35455,
        start_date: stamp(start),
        end_date: stamp(end),
        price_list,
        priority,
        price: price.parse::<BigDecimal>().expect("reference price literal"),
        curr: "EUR".to_string(),
    }
}

fn stamp((y, mo, d, h, mi, s): Stamp) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .and_then(|date| date.and_hms_opt(h, mi, s))
        .expect("reference timestamp literal")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_product_yields_empty_candidates() {
        let repo = InMemoryPriceRepository::with_reference_data();

        let records = repo.find_candidates(1, 99999, None).await.unwrap();

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_candidates_without_instant_returns_all_rows() {
        let repo = InMemoryPriceRepository::with_reference_data();

        let records = repo.find_candidates(1, 35455, None).await.unwrap();

        assert_eq!(records.len(), 4);
        assert_eq!(repo.len(), 4);
    }

    #[tokio::test]
    async fn test_candidates_with_instant_are_narrowed_to_window() {
        let repo = InMemoryPriceRepository::with_reference_data();
        let at = stamp((2020, 6, 14, 16, 0, 0));

        let mut lists: Vec<i32> = repo
            .find_candidates(1, 35455, Some(at))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.price_list)
            .collect();
        lists.sort();

        assert_eq!(lists, vec![1, 2]);
    }

    #[test]
    fn test_insert_indexes_by_brand_and_product() {
        let repo = InMemoryPriceRepository::new();
        assert!(repo.is_empty());

        let mut other = reference_records().remove(0);
        other.brand_id = 2;
        repo.insert(other);
        repo.insert(reference_records().remove(1));

        assert_eq!(repo.len(), 2);
        assert_eq!(repo.index.len(), 2);
    }
}
