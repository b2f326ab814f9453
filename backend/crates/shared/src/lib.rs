//! Shared Kernel - Domain-crossing minimal core
//!
//! The vocabulary every backend crate agrees on:
//! - Unified error type ([`error::app_error::AppError`]) and its HTTP mapping
//! - Typed entity identifiers ([`id::Id`]) for users, posts and comments
//! - A `Json` extractor whose rejections use that HTTP mapping (`axum` feature)
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
#[cfg(feature = "axum")]
pub mod extract;
pub mod id;
