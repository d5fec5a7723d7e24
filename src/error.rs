//! Error types for weighpoint
//!
//! One taxonomy for the whole service: validation failures name the offending
//! field and map to 400, auth failures map to 401 with a fixed body, store
//! failures map to a generic 500 with the detail kept in the server log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Convenience Result type using the weighpoint Error
pub type Result<T> = std::result::Result<T, Error>;

/// Service-wide error type
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input; the message names the offending field
    #[error("invalid request: {0}")]
    Validation(String),

    /// Missing or incorrect bearer token
    #[error("Unauthorized")]
    Unauthorized,

    /// Persistence layer failure (wraps sqlx::Error)
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// Configuration loading or validation error (startup only)
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error (startup only)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Validation failure naming a specific request field
    pub fn field(name: impl Into<String>) -> Self {
        Error::Validation(format!("missing or invalid field: {}", name.into()))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            Error::Store(e) => {
                // Detail stays in the log; the caller gets a generic message
                error!("store operation failed: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Error::Config(msg) => {
                error!("configuration error surfaced on request path: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            Error::Io(e) => {
                error!("IO error surfaced on request path: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
