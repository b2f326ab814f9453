//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, authorization policy
//! - `application/` - Use cases, token issuer, CSRF guard
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, middleware, router
//!
//! ## Features
//! - Register / login with email + password
//! - Short-lived access tokens (bearer) and long-lived refresh tokens (cookie)
//! - Refresh token rotation on every refresh
//! - Double-submit CSRF tokens bound to an httpOnly cookie secret
//! - Admin user management: list, ban, unban, delete with content cascade
//!
//! ## Security Model
//! - Passwords hashed with Argon2id
//! - Access and refresh tokens signed with separate HS256 keys
//! - Stateless sessions: role and ban changes apply at next login
//! - Banned users cannot log in

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::{AuthConfig, ConfigError};
pub use domain::entity::AuthContext;
pub use domain::policy;
pub use domain::repository::{AuthoredContentRepository, CascadeCounts};
pub use domain::value_object::user_id::{UserId, UserMarker};
pub use error::{AuthError, AuthResult};
pub use infra::{MemoryAuthRepository, PgAuthRepository};
pub use presentation::middleware::AuthMiddlewareState;
pub use presentation::router::{
    admin_router, admin_router_generic, auth_router, auth_router_generic, csrf_router,
};

// Re-export kernel error types for unified error handling
pub use kernel::error::{app_error::AppError, kind::ErrorKind};

// Convenience re-exports
pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
mod tests;
