//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use auth::UserId;
use kernel::id::{CommentId, PostId};

use crate::domain::entities::{Comment, LikeState, Post};
use crate::domain::value_objects::Pagination;
use crate::error::BlogResult;

/// Filter for post listings
#[derive(Debug, Clone)]
pub struct PostQuery {
    /// Only posts by this author
    pub author_id: Option<UserId>,
    /// Case-insensitive substring over title and content
    pub search: Option<String>,
    pub pagination: Pagination,
}

/// One page of posts plus the total matching count
#[derive(Debug, Clone)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
}

/// Post repository trait
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    async fn create(&self, post: &Post) -> BlogResult<()>;

    async fn find_by_id(&self, post_id: &PostId) -> BlogResult<Option<Post>>;

    /// Newest first
    async fn list(&self, query: &PostQuery) -> BlogResult<PostPage>;

    /// Persist title, content and `updated_at`
    async fn update(&self, post: &Post) -> BlogResult<()>;

    /// Delete a post and its comments; `false` when no such post existed
    async fn delete(&self, post_id: &PostId) -> BlogResult<bool>;

    /// Toggle `user_id`'s like atomically; `None` when the post is missing
    async fn toggle_like(&self, post_id: &PostId, user_id: &UserId)
    -> BlogResult<Option<LikeState>>;
}

/// Comment repository trait
#[trait_variant::make(CommentRepository: Send)]
pub trait LocalCommentRepository {
    async fn create(&self, comment: &Comment) -> BlogResult<()>;

    async fn find_by_id(&self, comment_id: &CommentId) -> BlogResult<Option<Comment>>;

    /// Oldest first
    async fn list_by_post(&self, post_id: &PostId) -> BlogResult<Vec<Comment>>;

    async fn delete(&self, comment_id: &CommentId) -> BlogResult<bool>;
}
