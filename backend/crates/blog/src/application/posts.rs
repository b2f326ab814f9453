//! Post Use Cases
//!
//! Create, read, list, edit, delete and like. Edit and delete go through the
//! auth policy: only the author or an admin may change a post.

use std::sync::Arc;

use auth::{AuthContext, policy};
use kernel::id::PostId;

use crate::domain::entities::{LikeState, Post};
use crate::domain::repository::{PostPage, PostQuery, PostRepository};
use crate::domain::value_objects::{Content, Pagination, PostTitle};
use crate::error::{BlogError, BlogResult};

/// Create post input
pub struct CreatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Update post input; absent fields are left unchanged
pub struct UpdatePostInput {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Post use cases
pub struct PostUseCase<P>
where
    P: PostRepository,
{
    post_repo: Arc<P>,
}

impl<P> PostUseCase<P>
where
    P: PostRepository,
{
    pub fn new(post_repo: Arc<P>) -> Self {
        Self { post_repo }
    }

    pub async fn create(&self, actor: &AuthContext, input: CreatePostInput) -> BlogResult<Post> {
        let title = PostTitle::new(input.title.unwrap_or_default())?;
        let content = Content::new(input.content.unwrap_or_default())?;

        let post = Post::new(*actor.user_id(), title, content);
        self.post_repo.create(&post).await?;

        tracing::info!(post_id = %post.post_id, author_id = %post.author_id, "Post created");

        Ok(post)
    }

    pub async fn get(&self, post_id: &PostId) -> BlogResult<Post> {
        self.post_repo
            .find_by_id(post_id)
            .await?
            .ok_or(BlogError::PostNotFound)
    }

    /// Public listing, newest first
    pub async fn list(&self, search: Option<String>, pagination: Pagination) -> BlogResult<PostPage> {
        self.post_repo
            .list(&PostQuery {
                author_id: None,
                search: normalize_search(search),
                pagination,
            })
            .await
    }

    /// The caller's own posts, newest first
    pub async fn list_mine(
        &self,
        actor: &AuthContext,
        search: Option<String>,
        pagination: Pagination,
    ) -> BlogResult<PostPage> {
        self.post_repo
            .list(&PostQuery {
                author_id: Some(*actor.user_id()),
                search: normalize_search(search),
                pagination,
            })
            .await
    }

    pub async fn update(
        &self,
        actor: &AuthContext,
        post_id: &PostId,
        input: UpdatePostInput,
    ) -> BlogResult<Post> {
        let mut post = self.get(post_id).await?;
        policy::check_edit_post(actor, &post.author_id)?;

        let title = input.title.map(PostTitle::new).transpose()?;
        let content = input.content.map(Content::new).transpose()?;

        post.edit(title, content);
        self.post_repo.update(&post).await?;

        tracing::info!(post_id = %post.post_id, actor_id = %actor.user_id(), "Post updated");

        Ok(post)
    }

    pub async fn delete(&self, actor: &AuthContext, post_id: &PostId) -> BlogResult<()> {
        let post = self.get(post_id).await?;
        policy::check_delete_post(actor, &post.author_id)?;

        if !self.post_repo.delete(post_id).await? {
            return Err(BlogError::PostNotFound);
        }

        tracing::info!(post_id = %post_id, actor_id = %actor.user_id(), "Post deleted");

        Ok(())
    }

    pub async fn toggle_like(&self, actor: &AuthContext, post_id: &PostId) -> BlogResult<LikeState> {
        self.post_repo
            .toggle_like(post_id, actor.user_id())
            .await?
            .ok_or(BlogError::PostNotFound)
    }
}

fn normalize_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
