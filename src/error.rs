use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::compose::ComposeError;

/// Request-level error taxonomy. Each variant carries the user-facing
/// message; the JSON body shape is fixed per status class.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("upstream unavailable: {0}")]
    Upstream(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<ComposeError> for ApiError {
    fn from(e: ComposeError) -> Self {
        match e {
            ComposeError::AvatarDecode(msg) | ComposeError::FrameDecode(msg) => {
                ApiError::Decode(msg)
            }
            ComposeError::PngEncode => ApiError::Internal("failed to encode png".to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Bad Request", "message": msg }),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Upstream(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "Service Unavailable", "message": msg }),
            ),
            ApiError::Decode(msg) | ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal Server Error", "message": msg }),
            ),
        };
        (status, Json(body)).into_response()
    }
}
