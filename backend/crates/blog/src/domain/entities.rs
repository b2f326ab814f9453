//! Domain Entities

use auth::UserId;
use chrono::{DateTime, Utc};
use kernel::id::{CommentId, PostId};

use crate::domain::value_objects::{Content, PostTitle};

/// Post entity
#[derive(Debug, Clone)]
pub struct Post {
    pub post_id: PostId,
    pub author_id: UserId,
    pub title: PostTitle,
    pub content: Content,
    /// Users who liked the post, in like order, without duplicates
    pub likes: Vec<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(author_id: UserId, title: PostTitle, content: Content) -> Self {
        let now = Utc::now();
        Self {
            post_id: PostId::new(),
            author_id,
            title,
            content,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an edit; absent fields keep their current value
    pub fn edit(&mut self, title: Option<PostTitle>, content: Option<Content>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }

    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.likes.contains(user_id)
    }

    /// Like or unlike; returns whether the user likes the post afterwards
    pub fn toggle_like(&mut self, user_id: UserId) -> bool {
        if let Some(pos) = self.likes.iter().position(|id| *id == user_id) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(user_id);
            true
        }
    }

    /// Case-insensitive substring match over title and content
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.title.as_str().to_lowercase().contains(needle_lower)
            || self.content.as_str().to_lowercase().contains(needle_lower)
    }
}

/// Comment entity
#[derive(Debug, Clone)]
pub struct Comment {
    pub comment_id: CommentId,
    pub post_id: PostId,
    pub author_id: UserId,
    pub content: Content,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: PostId, author_id: UserId, content: Content) -> Self {
        Self {
            comment_id: CommentId::new(),
            post_id,
            author_id,
            content,
            created_at: Utc::now(),
        }
    }
}

/// Like state after a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeState {
    pub likes_count: u64,
    pub liked_by_user: bool,
}
