//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system. Every variant carries a
//! stable machine-readable code so clients can tell, for example, an expired
//! access token (refresh and retry) from a missing refresh cookie (log in).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// No bearer token on a protected route
    #[error("Authentication token is missing")]
    NoToken,

    /// Bad signature, bad shape, or wrong token class
    #[error("Token is malformed or has an invalid signature")]
    MalformedToken,

    #[error("Access token has expired")]
    ExpiredToken,

    /// Refresh endpoint called without the refresh cookie
    #[error("Refresh token is missing")]
    NoRefreshToken,

    #[error("Refresh token has expired")]
    RefreshExpired,

    /// Refresh token is valid but its account no longer exists
    #[error("Session is no longer valid")]
    SessionRevoked,

    #[error("Invalid CSRF token")]
    InvalidCsrfToken,

    /// Unknown email or wrong password (indistinguishable on purpose)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is banned
    #[error("Account is disabled")]
    AccountDisabled,

    #[error("User already exists")]
    EmailTaken,

    /// Authenticated but not allowed; the reason is shown to the client
    #[error("{0}")]
    Forbidden(String),

    /// Input failed validation for a specific field
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Field-level validation failure
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AuthError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::NoToken
            | AuthError::MalformedToken
            | AuthError::ExpiredToken
            | AuthError::NoRefreshToken
            | AuthError::RefreshExpired
            | AuthError::SessionRevoked => ErrorKind::Unauthorized,
            AuthError::InvalidCsrfToken | AuthError::AccountDisabled | AuthError::Forbidden(_) => {
                ErrorKind::Forbidden
            }
            AuthError::InvalidCredentials | AuthError::EmailTaken | AuthError::Validation { .. } => {
                ErrorKind::BadRequest
            }
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Stable machine-readable code rendered in the response body
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::NoToken => "NO_TOKEN",
            AuthError::MalformedToken => "MALFORMED_TOKEN",
            AuthError::ExpiredToken => "EXPIRED_TOKEN",
            AuthError::NoRefreshToken => "NO_REFRESH_TOKEN",
            AuthError::RefreshExpired => "REFRESH_EXPIRED",
            AuthError::SessionRevoked => "SESSION_REVOKED",
            AuthError::InvalidCsrfToken => "INVALID_CSRF_TOKEN",
            AuthError::InvalidCredentials => "INVALID_CREDENTIALS",
            AuthError::AccountDisabled => "ACCOUNT_DISABLED",
            AuthError::EmailTaken => "EMAIL_TAKEN",
            AuthError::Forbidden(_) => "FORBIDDEN",
            AuthError::Validation { .. } => "VALIDATION_ERROR",
            AuthError::UserNotFound => "USER_NOT_FOUND",
            AuthError::Database(_) | AuthError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to AppError
    ///
    /// Server-side failures never leak their details to the client.
    pub fn to_app_error(&self) -> AppError {
        let err = match self {
            AuthError::Validation { field, message } => AppError::validation(field, message),
            AuthError::Database(_) | AuthError::Internal(_) => {
                AppError::internal("Internal server error")
            }
            other => AppError::new(other.kind(), other.to_string()),
        };
        let err = err.with_code(self.code());

        match self {
            AuthError::ExpiredToken => err.with_action("Refresh the session and retry once"),
            AuthError::NoRefreshToken | AuthError::RefreshExpired | AuthError::SessionRevoked => {
                err.with_action("Sign in again")
            }
            AuthError::InvalidCsrfToken => err.with_action("Fetch a new CSRF token and retry"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::MalformedToken => {
                tracing::warn!("Rejected malformed or tampered token");
            }
            AuthError::InvalidCsrfToken => {
                tracing::warn!("CSRF validation failed");
            }
            AuthError::AccountDisabled => {
                tracing::warn!("Session attempt on disabled account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_are_unauthorized() {
        for err in [
            AuthError::NoToken,
            AuthError::MalformedToken,
            AuthError::ExpiredToken,
            AuthError::NoRefreshToken,
            AuthError::RefreshExpired,
            AuthError::SessionRevoked,
        ] {
            assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(AuthError::InvalidCsrfToken.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_codes_are_distinct() {
        let codes = [
            AuthError::NoToken.code(),
            AuthError::MalformedToken.code(),
            AuthError::ExpiredToken.code(),
            AuthError::NoRefreshToken.code(),
            AuthError::RefreshExpired.code(),
            AuthError::SessionRevoked.code(),
            AuthError::InvalidCsrfToken.code(),
        ];
        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AuthError::Internal("pool poisoned at 10.0.0.3".to_string());
        let app = err.to_app_error();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "Internal server error");
        assert_eq!(app.code(), Some("INTERNAL_ERROR"));
    }

    #[test]
    fn test_forbidden_reason_is_shown() {
        let app = AuthError::Forbidden("Cannot delete yourself".to_string()).to_app_error();
        assert_eq!(app.status_code(), 403);
        assert_eq!(app.message(), "Cannot delete yourself");
    }

    #[test]
    fn test_validation_message_names_field() {
        let app = AuthError::validation("email", "Email cannot be empty").to_app_error();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.message(), "email: Email cannot be empty");
        assert_eq!(app.code(), Some("VALIDATION_ERROR"));
    }
}
