use axum::extract::{OriginalUri, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::errors::{AppError, ErrorBody};
use crate::models::PriceResponse;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_price))
}

/// Raw query string of `GET /api/v1/prices`. Every field is optional here so
/// that missing and malformed values are reported together as a 400.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQueryParams {
    pub brand_id: Option<String>,
    pub product_id: Option<String>,
    pub date: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceCriteria {
    pub brand_id: i32,
    pub product_id: i64,
    pub date: NaiveDateTime,
}

impl PriceQueryParams {
    /// Parses every parameter, collecting one message per problem.
    pub fn validate(&self) -> Result<PriceCriteria, Vec<String>> {
        let mut messages = Vec::new();

        let brand_id = parse_positive::<i32>("brandId", self.brand_id.as_deref(), &mut messages);
        let product_id = parse_positive::<i64>("productId", self.product_id.as_deref(), &mut messages);
        let date = match self.date.as_deref() {
            None => {
                messages.push("Missing parameter: date".to_string());
                None
            }
            Some(raw) => {
                let parsed = parse_local_date_time(raw);
                if parsed.is_none() {
                    messages.push(format!(
                        "date: must be an ISO-8601 local date-time (e.g. 2020-06-14T10:00:00), got '{}'",
                        raw
                    ));
                }
                parsed
            }
        };

        match (brand_id, product_id, date) {
            (Some(brand_id), Some(product_id), Some(date)) => Ok(PriceCriteria {
                brand_id,
                product_id,
                date,
            }),
            _ => Err(messages),
        }
    }
}

fn parse_positive<T>(name: &str, raw: Option<&str>, messages: &mut Vec<String>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + From<u8>,
{
    let Some(raw) = raw else {
        messages.push(format!("Missing parameter: {}", name));
        return None;
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value >= T::from(1u8) => Some(value),
        Ok(_) => {
            messages.push(format!("{}: must be greater than or equal to 1", name));
            None
        }
        Err(_) => {
            messages.push(format!("{}: must be an integer, got '{}'", name, raw));
            None
        }
    }
}

/// Accepts `YYYY-MM-DDTHH:MM[:SS[.fff]]`, no offset.
fn parse_local_date_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// GET /api/v1/prices?brandId=1&productId=35455&date=2020-06-14T10:00:00
///
/// 200 with the applicable price, 404 when none applies, 400 on bad parameters.
#[utoipa::path(
    get,
    path = "/api/v1/prices",
    params(
        ("brandId" = i32, Query, description = "Brand identifier (>= 1)", example = 1),
        ("productId" = i64, Query, description = "Product identifier (>= 1)", example = 35455),
        ("date" = String, Query, description = "Application date, ISO-8601 local date-time", example = "2020-06-14T10:00:00"),
    ),
    responses(
        (status = 200, description = "Applicable price", body = PriceResponse),
        (status = 400, description = "Missing or invalid parameters", body = ErrorBody),
        (status = 404, description = "No price applies"),
        (status = 503, description = "Price store unavailable", body = ErrorBody),
        (status = 504, description = "Price store timed out", body = ErrorBody),
    ),
    tag = "Prices"
)]
pub async fn get_price(
    OriginalUri(uri): OriginalUri,
    Query(params): Query<PriceQueryParams>,
    State(state): State<AppState>,
) -> Result<Json<PriceResponse>, AppError> {
    let criteria = params.validate().map_err(|messages| {
        warn!("GET /api/v1/prices - rejected {:?}: {}", params, messages.join("; "));
        AppError::Validation {
            path: uri.path().to_string(),
            messages,
        }
    })?;
    info!(
        "GET /api/v1/prices - brandId={} productId={} date={}",
        criteria.brand_id, criteria.product_id, criteria.date
    );

    match state
        .prices
        .query_response(criteria.brand_id, criteria.product_id, criteria.date)
        .await?
    {
        Some(response) => {
            info!(
                "price found brandId={} productId={} priceList={} valid=[{}, {})",
                response.brand_id, response.product_id, response.price_list, response.start_date, response.end_date
            );
            Ok(Json(response))
        }
        None => {
            debug!(
                "price not found brandId={} productId={} date={}",
                criteria.brand_id, criteria.product_id, criteria.date
            );
            Err(AppError::NotFound)
        }
    }
}
