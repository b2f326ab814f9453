//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::{Comment, LikeState, Post};
use crate::domain::repository::PostPage;
use crate::domain::value_objects::Pagination;

// ============================================================================
// Posts
// ============================================================================

/// Create or update request; on update absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// `?page=&limit=&search=`; kept as raw strings so bad numbers fall back to defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub content: String,
    pub likes: Vec<Uuid>,
    pub likes_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.post_id.into_uuid(),
            author_id: post.author_id.into_uuid(),
            title: post.title.as_str().to_string(),
            content: post.content.as_str().to_string(),
            likes: post.likes.iter().map(|id| id.into_uuid()).collect(),
            likes_count: post.likes.len() as u64,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListResponse {
    pub success: bool,
    pub data: Vec<PostResponse>,
    pub pagination: PaginationResponse,
}

impl PostListResponse {
    pub fn new(page: &PostPage, pagination: &Pagination) -> Self {
        Self {
            success: true,
            data: page.posts.iter().map(PostResponse::from).collect(),
            pagination: PaginationResponse {
                page: pagination.page,
                limit: pagination.limit,
                total: page.total,
                pages: pagination.pages(page.total),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes_count: u64,
    pub liked_by_user: bool,
}

impl From<LikeState> for LikeResponse {
    fn from(state: LikeState) -> Self {
        Self {
            likes_count: state.likes_count,
            liked_by_user: state.liked_by_user,
        }
    }
}

// ============================================================================
// Comments
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Comment> for CommentResponse {
    fn from(comment: &Comment) -> Self {
        Self {
            id: comment.comment_id.into_uuid(),
            post_id: comment.post_id.into_uuid(),
            author_id: comment.author_id.into_uuid(),
            content: comment.content.as_str().to_string(),
            created_at: comment.created_at,
        }
    }
}
