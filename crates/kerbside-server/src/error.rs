//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use kerbside_core::{EngineError, MatchError, RateError};

/// API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (unparseable timestamp, empty batch, ...).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Rate definition rejected by the engine.
    #[error(transparent)]
    Validation(#[from] RateError),

    /// Query range rejected or unmatched.
    #[error(transparent)]
    Match(#[from] MatchError),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Rate(e) => ApiError::Validation(e),
            EngineError::Match(e) => ApiError::Match(e),
            EngineError::Store(e) => ApiError::Internal(e.to_string()),
            EngineError::EmptyBatch => ApiError::BadRequest(err.to_string()),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            // A rejected candidate that collides with a stored rate is a
            // conflict; every other definition problem is a bad request.
            ApiError::Validation(RateError::Overlap { .. }) => (StatusCode::CONFLICT, "overlap"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            ApiError::Match(MatchError::Unavailable) => {
                (StatusCode::NOT_FOUND, "price_unavailable")
            }
            ApiError::Match(MatchError::Ambiguous { .. }) => {
                (StatusCode::CONFLICT, "ambiguous_match")
            }
            ApiError::Match(_) => (StatusCode::BAD_REQUEST, "bad_range"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };

        let body = ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
