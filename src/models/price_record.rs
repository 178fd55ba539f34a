use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One tariff entry of the `prices` table.
///
/// A record applies to its brand/product on the half-open window
/// `[start_date, end_date)`. When several records overlap, the one with the
/// highest `priority` wins (see [`crate::services::price_resolver`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PriceRecord {
    pub brand_id: i32,
    pub product_id: i64,
    pub start_date: NaiveDateTime,
    pub end_date: NaiveDateTime,
    pub price_list: i32,
    pub priority: i32,
    pub price: BigDecimal,      // NUMERIC(10, 2)
    pub curr: String,           // ISO-4217 code
}

impl PriceRecord {
    pub fn is_for(&self, brand_id: i32, product_id: i64) -> bool {
        self.brand_id == brand_id && self.product_id == product_id
    }

    /// Start inclusive, end exclusive.
    pub fn applies_at(&self, at: NaiveDateTime) -> bool {
        self.start_date <= at && at < self.end_date
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 6, d).unwrap().and_hms_opt(h, m, s).unwrap()
    }

    fn record() -> PriceRecord {
        PriceRecord {
            brand_id: 1,
            product_id: 35455,
            start_date: ts(14, 15, 0, 0),
            end_date: ts(14, 18, 30, 0),
            price_list: 2,
            priority: 1,
            price: "25.45".parse().unwrap(),
            curr: "EUR".to_string(),
        }
    }

    #[test]
    fn test_window_is_half_open() {
        let r = record();
        assert!(r.applies_at(ts(14, 15, 0, 0)));
        assert!(r.applies_at(ts(14, 18, 29, 59)));
        assert!(!r.applies_at(ts(14, 18, 30, 0)));
        assert!(!r.applies_at(ts(14, 14, 59, 59)));
    }

    #[test]
    fn test_is_for_requires_both_ids() {
        let r = record();
        assert!(r.is_for(1, 35455));
        assert!(!r.is_for(2, 35455));
        assert!(!r.is_for(1, 35456));
    }
}
