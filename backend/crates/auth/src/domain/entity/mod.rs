//! Entity Module

pub mod auth_context;
pub mod claims;
pub mod user;

pub use auth_context::AuthContext;
pub use claims::Claims;
pub use user::User;
