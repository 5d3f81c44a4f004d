//! Error types for the file cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type for the file cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key has no backing file
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key cannot be mapped to a usable file name
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Value could not be serialized to JSON
    #[error("Failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// Backing file content is not valid JSON for the requested type
    #[error("Failed to decode value for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem failure not explained by a missing entry
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidKey(_) | CacheError::Encode(_) => StatusCode::BAD_REQUEST,
            CacheError::Decode { .. } | CacheError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the file cache.
pub type Result<T> = std::result::Result<T, CacheError>;
