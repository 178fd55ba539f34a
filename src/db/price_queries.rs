use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::models::PriceRecord;
use crate::services::price_resolver::PRECEDENCE_ORDER_BY;

/// All tariff rows of a brand/product, highest priority first.
pub async fn fetch_for_product(
    pool: &PgPool,
    brand_id: i32,
    product_id: i64,
) -> Result<Vec<PriceRecord>, sqlx::Error> {
    sqlx::query_as::<_, PriceRecord>(
        r#"
        SELECT brand_id, product_id, start_date, end_date, price_list, priority, price, curr
        FROM prices
        WHERE brand_id = $1
          AND product_id = $2
        ORDER BY priority DESC, price_list ASC
        "#,
    )
    .bind(brand_id)
    .bind(product_id)
    .fetch_all(pool)
    .await
}

/// The single row that applies at `at`, or `None`.
pub async fn fetch_top_applicable(
    pool: &PgPool,
    brand_id: i32,
    product_id: i64,
    at: NaiveDateTime,
) -> Result<Option<PriceRecord>, sqlx::Error> {
    let sql = format!(
        r#"
        SELECT brand_id, product_id, start_date, end_date, price_list, priority, price, curr
        FROM prices
        WHERE brand_id = $1
          AND product_id = $2
          AND start_date <= $3
          AND end_date > $3
        ORDER BY {}
        LIMIT 1
        "#,
        PRECEDENCE_ORDER_BY
    );
    sqlx::query_as::<_, PriceRecord>(&sql)
        .bind(brand_id)
        .bind(product_id)
        .bind(at)
        .fetch_optional(pool)
        .await
}
