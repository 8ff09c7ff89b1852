use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FunkoApiError {
    #[error("funko with id {0} not found")]
    NotFound(i64),

    #[error("validation failed")]
    Validation(BTreeMap<String, String>),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("metrics error: {0}")]
    Metrics(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for FunkoApiError {
    fn from(err: rusqlite::Error) -> Self {
        FunkoApiError::Database(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FunkoApiError>;

/// HTTP mapping: validation errors become a 400 with a field -> message map,
/// missing resources a 404, everything else a 500.
impl IntoResponse for FunkoApiError {
    fn into_response(self) -> Response {
        match self {
            FunkoApiError::Validation(fields) => {
                (StatusCode::BAD_REQUEST, Json(fields)).into_response()
            }
            FunkoApiError::NotFound(_) => {
                let body = json!({ "error": self.to_string() });
                (StatusCode::NOT_FOUND, Json(body)).into_response()
            }
            other => {
                tracing::error!("request failed: {}", other);
                let body = json!({ "error": other.to_string() });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
