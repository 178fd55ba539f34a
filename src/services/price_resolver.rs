//! Applicable-price selection.
//!
//! Given the candidate records of a store, [`resolve`] picks the single record
//! that applies to a brand/product at an instant:
//!
//! 1. the record must belong to the requested brand and product;
//! 2. its window `[start_date, end_date)` must contain the instant;
//! 3. among the survivors the highest `priority` wins.
//!
//! Equal priorities are settled by a fixed order so the outcome never depends
//! on the order the store returned rows in: lowest `price_list`, then the most
//! recent `start_date`, then the earliest `end_date`, then the lowest `price`,
//! then `curr`. Two records that tie on all of these are identical.

use std::cmp::Ordering;

use chrono::NaiveDateTime;

use crate::models::PriceRecord;

/// SQL rendition of [`precedence`], best row first. Stores that rank in the
/// database must use this clause so both paths agree on the winner.
pub const PRECEDENCE_ORDER_BY: &str = r#"priority DESC, price_list ASC, start_date DESC, end_date ASC, price ASC, curr COLLATE "C" ASC"#;

pub fn resolve(
    records: &[PriceRecord],
    brand_id: i32,
    product_id: i64,
    at: NaiveDateTime,
) -> Option<PriceRecord> {
    records
        .iter()
        .filter(|r| r.is_for(brand_id, product_id))
        .filter(|r| r.applies_at(at))
        .max_by(|a, b| precedence(a, b))
        .cloned()
}

/// `Greater` means `a` beats `b`.
fn precedence(a: &PriceRecord, b: &PriceRecord) -> Ordering {
    a.priority
        .cmp(&b.priority)
        .then_with(|| b.price_list.cmp(&a.price_list))
        .then_with(|| a.start_date.cmp(&b.start_date))
        .then_with(|| b.end_date.cmp(&a.end_date))
        .then_with(|| b.price.cmp(&a.price))
        .then_with(|| b.curr.cmp(&a.curr))
}
