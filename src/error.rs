use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::domain::UpstreamError;

/// Error body returned to API callers.
///
/// ```json
/// { "error": "tmdb_error", "detail": "upstream returned status 404" }
/// ```
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

/// Errors surfaced by HTTP handlers.
///
/// Cache problems never appear here; they are absorbed by
/// [`crate::application::services::CacheAside`].
#[derive(Debug)]
pub enum AppError {
    /// Invalid request input, rendered as 400 `{error: message}`.
    Validation { message: String },
    /// Upstream failure, rendered as 502 `{error: "tmdb_error", detail}`.
    Upstream { detail: String },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn upstream(detail: impl Into<String>) -> Self {
        Self::Upstream {
            detail: detail.into(),
        }
    }
}

impl From<UpstreamError> for AppError {
    fn from(e: UpstreamError) -> Self {
        error!("Upstream request failed: {}", e);
        Self::upstream(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Validation { message } => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: message,
                    detail: None,
                },
            ),
            AppError::Upstream { detail } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    error: "tmdb_error".to_string(),
                    detail: Some(detail),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
