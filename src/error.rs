//! Handler-layer error type and its HTTP mapping.
//!
//! Store and validation errors bubble up here and translate to user-facing
//! responses: 404 for missing entries, 400 for bad form input, a login
//! redirect for missing/expired sessions, and an HTML error page for
//! everything else.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::store::StoreError;
use crate::views;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("session missing or expired")]
    SessionInvalid { next: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            StoreError::InvalidRenderer(kind) => {
                AppError::BadRequest(format!("unsupported renderer: {kind}"))
            }
            other => AppError::Internal(other.into()),
        }
    }
}

/// A plain 302 Found redirect.
pub fn found(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::SessionInvalid { next } => {
                found(&format!("/login?next={}", urlencoding::encode(&next)))
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                views::error_page("Not Found", "Nothing lives at this address."),
            )
                .into_response(),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, views::error_page("Bad Request", &msg)).into_response()
            }
            AppError::Internal(err) => {
                error!(error = %err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    views::error_page("Server Error", "Something went wrong. Please try again."),
                )
                    .into_response()
            }
        }
    }
}
