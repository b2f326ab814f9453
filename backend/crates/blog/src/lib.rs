//! Blog Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Access Model
//! - Reading posts and comments is public
//! - Writing needs a bearer access token and a CSRF token
//! - Only the author or an admin may edit or delete content
//! - The content store implements `auth::AuthoredContentRepository`, so
//!   deleting a user removes everything they wrote

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::config::BlogConfig;
pub use error::{BlogError, BlogResult};
pub use infra::{MemoryBlogRepository, PgBlogRepository};
pub use presentation::router::{blog_router, blog_router_generic};

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
    pub use crate::presentation::dto::*;
}
