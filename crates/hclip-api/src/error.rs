//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use hclip_models::SourceUrlError;
use hclip_worker::StoreError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidUrl(#[from] SourceUrlError),

    #[error("Job store error: {0}")]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message sent to the client. Server-side failures are logged in full
    /// and answered with a generic message.
    fn client_message(&self) -> String {
        match self {
            ApiError::InvalidUrl(e) => e.to_string(),
            ApiError::Store(e) => {
                error!("Request failed: {}", e);
                "An internal error occurred".to_string()
            }
        }
    }
}

/// Failure body: `{ "success": false, "error": "..." }`.
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            success: false,
            error: self.client_message(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}
