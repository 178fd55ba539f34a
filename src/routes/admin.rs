use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use axum::http::StatusCode;
use tracing::info;

use crate::services::price_query_service::PriceCacheStats;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/price-cache", get(get_price_cache_stats))
        .route("/price-cache/clear", post(clear_price_cache))
}

/// GET /admin/price-cache
#[utoipa::path(
    get,
    path = "/admin/price-cache",
    responses((status = 200, description = "Price cache occupancy and limits", body = PriceCacheStats)),
    tag = "Admin"
)]
pub async fn get_price_cache_stats(State(state): State<AppState>) -> Json<PriceCacheStats> {
    let stats = state.prices.stats().await;
    info!("GET /admin/price-cache - {} entries", stats.entries);
    Json(stats)
}

/// POST /admin/price-cache/clear
///
/// Drops every cached price outcome; the next queries reload from the store.
#[utoipa::path(
    post,
    path = "/admin/price-cache/clear",
    responses((status = 204, description = "Price cache cleared")),
    tag = "Admin"
)]
pub async fn clear_price_cache(State(state): State<AppState>) -> StatusCode {
    info!("POST /admin/price-cache/clear - Clearing price cache");
    state.prices.clear();
    StatusCode::NO_CONTENT
}
