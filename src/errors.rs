use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tracing::error;
use utoipa::ToSchema;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error on {path}: {}", .messages.join("; "))]
    Validation { path: String, messages: Vec<String> },
    #[error("Not found")]
    NotFound,
    #[error("Price store error: {0}")]
    Store(Arc<StoreError>),
}

/// JSON body for 4xx/5xx responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "2020-06-14T10:00:00+00:00")]
    pub timestamp: String,
    #[schema(example = 400)]
    pub status: u16,
    #[schema(example = "Bad Request")]
    pub error: String,
    /// Request path, present on validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "/api/v1/prices")]
    pub path: Option<String>,
    pub messages: Vec<String>,
}

impl ErrorBody {
    fn new(status: StatusCode, path: Option<String>, messages: Vec<String>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            path,
            messages,
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Store(e) => match e.as_ref() {
                StoreError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                StoreError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        match self {
            AppError::NotFound => status.into_response(),
            AppError::Validation { path, messages } => {
                (status, Json(ErrorBody::new(status, Some(path), messages))).into_response()
            }
            AppError::Store(e) => {
                error!("Price store failure: {}", e);
                let message = match e.as_ref() {
                    StoreError::Database(_) => "Internal server error".to_string(),
                    other => other.to_string(),
                };
                (status, Json(ErrorBody::new(status, None, vec![message]))).into_response()
            }
        }
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(Arc::new(value))
    }
}

impl From<Arc<StoreError>> for AppError {
    fn from(value: Arc<StoreError>) -> Self {
        AppError::Store(value)
    }
}
