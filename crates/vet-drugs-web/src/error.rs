//! Web error types mapped to HTML error pages.

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use vet_drugs_core::ControllerError;

use crate::views;

/// Request-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            WebError::NotFound(detail) | WebError::BadRequest(detail) => detail,
            WebError::Internal(detail) => {
                tracing::error!(%detail, "Internal error while handling request");
                "An internal error occurred".to_string()
            }
        };
        (status, Html(views::error_page(status, &message))).into_response()
    }
}

impl From<ControllerError> for WebError {
    fn from(err: ControllerError) -> Self {
        match err {
            ControllerError::NotFound(detail) => WebError::NotFound(detail),
            ControllerError::BadRequest(detail) => WebError::BadRequest(detail),
            ControllerError::Store(e) => WebError::Internal(e.to_string()),
        }
    }
}

impl<T> From<std::sync::PoisonError<T>> for WebError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        WebError::Internal(format!("Lock poisoned: {}", e))
    }
}
