//! Application Layer - Use Cases
//!
//! This layer orchestrates domain logic and infrastructure.

pub mod comments;
pub mod config;
pub mod posts;

pub use comments::CommentUseCase;
pub use config::BlogConfig;
pub use posts::{CreatePostInput, PostUseCase, UpdatePostInput};
