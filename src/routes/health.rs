use axum::{
    Router,
    routing::get,
};
use tracing::debug;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(health))
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = String, example = json!("OK"))),
    tag = "Health"
)]
pub async fn health() -> &'static str {
    debug!("GET /health - Health check");
    "OK"
}
