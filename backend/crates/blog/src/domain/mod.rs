//! Domain Layer - Posts and comments
//!
//! This layer contains:
//! - Domain entities (Post, Comment)
//! - Domain value objects (PostTitle, Content, Pagination)
//! - Repository traits (interfaces)

pub mod entities;
pub mod repository;
pub mod value_objects;
