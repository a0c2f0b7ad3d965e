//! Mapping of core errors to HTTP responses.

use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use doctopic_core::Error;
use tracing::warn;

pub const NO_TEXT_MESSAGE: &str = "No text found in the uploaded file.";

/// Error returned by route handlers.
#[derive(Debug)]
pub enum ApiError {
    Core(Error),
    Multipart(MultipartError),
    /// Extraction succeeded but produced only whitespace.
    NoText,
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Core(e)
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        Self::Multipart(e)
    }
}

fn status_for(e: &Error) -> StatusCode {
    match e {
        Error::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Error::Decode(_) | Error::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::Timeout(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message, retryable) = match &self {
            Self::Core(e) => (status_for(e), e.kind(), e.to_string(), e.is_retryable()),
            Self::Multipart(e) => (e.status(), "invalid_upload", e.body_text(), false),
            Self::NoText => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "no_text",
                NO_TEXT_MESSAGE.to_string(),
                false,
            ),
        };

        if status.is_server_error() {
            warn!("Request failed ({}): {}", status, message);
        }

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "kind": kind,
                "retryable": retryable,
            })),
        )
            .into_response()
    }
}
