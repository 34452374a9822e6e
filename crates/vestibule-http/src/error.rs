//! Wire mapping for the error taxonomy.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;
use vestibule_engine::EngineError;

/// API-level error, rendered as an `{"error": ...}` envelope.
#[derive(Debug)]
pub enum ApiError {
    /// No token in the request (400).
    MissingToken,
    /// Token present but not a valid identifier (400).
    MalformedToken,
    /// Engine outcome: 404 for an unknown token, 500 for dependency failure.
    Engine(EngineError),
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        Self::Engine(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (StatusCode::BAD_REQUEST, "Token is required."),
            Self::MalformedToken => (StatusCode::BAD_REQUEST, "Token is malformed."),
            Self::Engine(EngineError::UnknownToken) => {
                (StatusCode::NOT_FOUND, "Token not found or expired.")
            }
            Self::Engine(source) => {
                error!(%source, "request failed on a dependency");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred.",
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
