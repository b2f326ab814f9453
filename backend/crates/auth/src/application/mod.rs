//! Application Layer
//!
//! Use cases and application services.

pub mod admin_users;
pub mod bootstrap;
pub mod config;
pub mod csrf;
pub mod current_user;
pub mod refresh;
pub mod sign_in;
pub mod sign_up;
pub mod token_issuer;

// Re-exports
pub use admin_users::{AdminUsersUseCase, DeleteUserAudit};
pub use bootstrap::{AdminSeed, ensure_admin};
pub use config::{AuthConfig, ConfigError};
pub use csrf::CsrfGuard;
pub use current_user::CurrentUserUseCase;
pub use refresh::RefreshUseCase;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_up::{SignUpInput, SignUpUseCase};
pub use token_issuer::{RefreshSession, TokenClass, TokenIssuer, TokenPair};
