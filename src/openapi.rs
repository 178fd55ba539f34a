use utoipa::OpenApi;

use crate::errors::ErrorBody;
use crate::models::PriceResponse;
use crate::routes::{admin, health, prices};
use crate::services::price_query_service::PriceCacheStats;

/// OpenAPI document served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "sisu-price API",
        version = "v1",
        description = "Applicable price of a brand's product at a point in time."
    ),
    paths(
        prices::get_price,
        admin::get_price_cache_stats,
        admin::clear_price_cache,
        health::health
    ),
    components(schemas(PriceResponse, ErrorBody, PriceCacheStats)),
    tags(
        (name = "Prices", description = "Applicable price lookup"),
        (name = "Admin", description = "Price cache administration"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;
