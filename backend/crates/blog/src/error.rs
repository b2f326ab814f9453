//! Blog Error Types
//!
//! Blog-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Authorization failures are carried as
//! `AuthError` so they render exactly like the auth crate's own denials.

use auth::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Blog-specific result type alias
pub type BlogResult<T> = Result<T, BlogError>;

/// Blog-specific error variants
#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Post not found")]
    PostNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    /// Input failed validation for a specific field
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Authentication or authorization failure
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        BlogError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::PostNotFound | BlogError::CommentNotFound => ErrorKind::NotFound,
            BlogError::Validation { .. } => ErrorKind::BadRequest,
            BlogError::Auth(e) => e.kind(),
            BlogError::Database(_) | BlogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Stable machine-readable code rendered in the response body
    pub fn code(&self) -> &'static str {
        match self {
            BlogError::PostNotFound => "POST_NOT_FOUND",
            BlogError::CommentNotFound => "COMMENT_NOT_FOUND",
            BlogError::Validation { .. } => "VALIDATION_ERROR",
            BlogError::Auth(e) => e.code(),
            BlogError::Database(_) | BlogError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        match self {
            BlogError::Auth(e) => e.to_app_error(),
            BlogError::Validation { field, message } => AppError::validation(field, message),
            BlogError::Database(_) | BlogError::Internal(_) => {
                AppError::internal("Internal server error").with_code(self.code())
            }
            other => AppError::new(other.kind(), other.to_string()).with_code(other.code()),
        }
    }

    fn log(&self) {
        match self {
            BlogError::Database(e) => {
                tracing::error!(error = %e, "Blog database error");
            }
            BlogError::Internal(msg) => {
                tracing::error!(message = %msg, "Blog internal error");
            }
            BlogError::Auth(AuthError::Forbidden(reason)) => {
                tracing::warn!(reason = %reason, "Blog action denied");
            }
            _ => {
                tracing::debug!(error = %self, "Blog error");
            }
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        match self {
            // The auth error logs itself
            BlogError::Auth(e) if !matches!(e, AuthError::Forbidden(_)) => e.into_response(),
            other => {
                other.log();
                other.to_app_error().into_response()
            }
        }
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        err.to_app_error()
    }
}

/// The cascade is reported to the auth crate as an opaque internal failure
impl From<BlogError> for AuthError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::Auth(e) => e,
            other => AuthError::Internal(other.to_string()),
        }
    }
}
