//! In-Memory Repository
//!
//! Process-local post and comment store for tests and local development.
//! Everything sits behind one lock, so a cascade delete is atomic.

use std::collections::HashMap;
use std::sync::Arc;

use auth::{AuthResult, AuthoredContentRepository, CascadeCounts, UserId};
use kernel::id::{CommentId, PostId};
use tokio::sync::RwLock;

use crate::domain::entities::{Comment, LikeState, Post};
use crate::domain::repository::{CommentRepository, PostPage, PostQuery, PostRepository};
use crate::error::BlogResult;

#[derive(Default)]
struct BlogState {
    posts: HashMap<PostId, Post>,
    comments: HashMap<CommentId, Comment>,
}

#[derive(Clone, Default)]
pub struct MemoryBlogRepository {
    state: Arc<RwLock<BlogState>>,
}

impl MemoryBlogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PostRepository for MemoryBlogRepository {
    async fn create(&self, post: &Post) -> BlogResult<()> {
        self.state
            .write()
            .await
            .posts
            .insert(post.post_id, post.clone());
        Ok(())
    }

    async fn find_by_id(&self, post_id: &PostId) -> BlogResult<Option<Post>> {
        Ok(self.state.read().await.posts.get(post_id).cloned())
    }

    async fn list(&self, query: &PostQuery) -> BlogResult<PostPage> {
        let state = self.state.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let mut matching: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| query.author_id.is_none_or(|author| p.author_id == author))
            .filter(|p| needle.as_deref().is_none_or(|n| p.matches(n)))
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.post_id.as_uuid().cmp(a.post_id.as_uuid()))
        });

        let total = matching.len() as u64;
        let posts = matching
            .into_iter()
            .skip(query.pagination.offset() as usize)
            .take(query.pagination.limit as usize)
            .cloned()
            .collect();

        Ok(PostPage { posts, total })
    }

    async fn update(&self, post: &Post) -> BlogResult<()> {
        if let Some(existing) = self.state.write().await.posts.get_mut(&post.post_id) {
            existing.title = post.title.clone();
            existing.content = post.content.clone();
            existing.updated_at = post.updated_at;
        }
        Ok(())
    }

    async fn delete(&self, post_id: &PostId) -> BlogResult<bool> {
        let mut state = self.state.write().await;
        if state.posts.remove(post_id).is_none() {
            return Ok(false);
        }
        state.comments.retain(|_, c| c.post_id != *post_id);
        Ok(true)
    }

    async fn toggle_like(
        &self,
        post_id: &PostId,
        user_id: &UserId,
    ) -> BlogResult<Option<LikeState>> {
        let mut state = self.state.write().await;
        Ok(state.posts.get_mut(post_id).map(|post| {
            let liked_by_user = post.toggle_like(*user_id);
            LikeState {
                likes_count: post.likes.len() as u64,
                liked_by_user,
            }
        }))
    }
}

impl CommentRepository for MemoryBlogRepository {
    async fn create(&self, comment: &Comment) -> BlogResult<()> {
        self.state
            .write()
            .await
            .comments
            .insert(comment.comment_id, comment.clone());
        Ok(())
    }

    async fn find_by_id(&self, comment_id: &CommentId) -> BlogResult<Option<Comment>> {
        Ok(self.state.read().await.comments.get(comment_id).cloned())
    }

    async fn list_by_post(&self, post_id: &PostId) -> BlogResult<Vec<Comment>> {
        let mut comments: Vec<Comment> = self
            .state
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.post_id == *post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.comment_id.as_uuid().cmp(b.comment_id.as_uuid()))
        });
        Ok(comments)
    }

    async fn delete(&self, comment_id: &CommentId) -> BlogResult<bool> {
        Ok(self
            .state
            .write()
            .await
            .comments
            .remove(comment_id)
            .is_some())
    }
}

impl AuthoredContentRepository for MemoryBlogRepository {
    async fn delete_authored_by(&self, author_id: &UserId) -> AuthResult<CascadeCounts> {
        let mut state = self.state.write().await;

        let authored_posts: Vec<PostId> = state
            .posts
            .values()
            .filter(|p| p.author_id == *author_id)
            .map(|p| p.post_id)
            .collect();

        let comments_before = state.comments.len();
        state
            .comments
            .retain(|_, c| c.author_id != *author_id && !authored_posts.contains(&c.post_id));
        let comments_deleted = (comments_before - state.comments.len()) as u64;

        for post_id in &authored_posts {
            state.posts.remove(post_id);
        }
        for post in state.posts.values_mut() {
            post.likes.retain(|id| id != author_id);
        }

        Ok(CascadeCounts {
            posts_deleted: authored_posts.len() as u64,
            comments_deleted,
        })
    }
}
