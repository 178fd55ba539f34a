use axum::routing::get;
use axum::{middleware, Json, Router};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

use crate::middleware::correlation_id;
use crate::openapi::ApiDoc;
use crate::routes::{admin, health, prices};
use crate::state::AppState;

pub fn create_app(state: AppState) -> Router {
    let openapi = ApiDoc::openapi();

    Router::<AppState>::new()
        .route("/api-docs/openapi.json", get(|| async { Json(openapi) }))
        .nest("/health", health::router())
        .nest("/api/v1/prices", prices::router())
        .nest("/admin", admin::router())
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(correlation_id))
        .with_state(state)
}
