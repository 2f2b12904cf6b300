//! API error type and its HTTP mapping.
//!
//! All storage and logic failures surface directly as an error response with
//! a status and a JSON `{"detail": ...}` body; nothing is retried. Failures
//! are logged before surfacing.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

/// Everything a request handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Core dataset error (not-found, validation).
    #[error(transparent)]
    Core(#[from] devtrack_core::Error),

    /// Dataset store error.
    #[error(transparent)]
    Storage(#[from] devtrack_store::Error),

    /// Auth gate error.
    #[error(transparent)]
    Auth(#[from] devtrack_auth::AuthError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Core(devtrack_core::Error::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Core(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Storage(devtrack_store::Error::Unavailable { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(e) if e.is_unauthenticated() => StatusCode::UNAUTHORIZED,
            ApiError::Auth(_) => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }

        let mut response = (status, Json(json!({ "detail": self.to_string() }))).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response.headers_mut().insert(
                http::header::WWW_AUTHENTICATE,
                http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}
