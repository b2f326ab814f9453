//! Comment Use Cases

use std::sync::Arc;

use auth::{AuthContext, policy};
use kernel::id::{CommentId, PostId};

use crate::domain::entities::Comment;
use crate::domain::repository::{CommentRepository, PostRepository};
use crate::domain::value_objects::Content;
use crate::error::{BlogError, BlogResult};

/// Comment use cases
pub struct CommentUseCase<P, C>
where
    P: PostRepository,
    C: CommentRepository,
{
    post_repo: Arc<P>,
    comment_repo: Arc<C>,
}

impl<P, C> CommentUseCase<P, C>
where
    P: PostRepository,
    C: CommentRepository,
{
    pub fn new(post_repo: Arc<P>, comment_repo: Arc<C>) -> Self {
        Self {
            post_repo,
            comment_repo,
        }
    }

    pub async fn add(
        &self,
        actor: &AuthContext,
        post_id: &PostId,
        content: Option<String>,
    ) -> BlogResult<Comment> {
        let content = Content::new(content.unwrap_or_default())?;

        if self.post_repo.find_by_id(post_id).await?.is_none() {
            return Err(BlogError::PostNotFound);
        }

        let comment = Comment::new(*post_id, *actor.user_id(), content);
        self.comment_repo.create(&comment).await?;

        tracing::info!(
            comment_id = %comment.comment_id,
            post_id = %post_id,
            author_id = %comment.author_id,
            "Comment added"
        );

        Ok(comment)
    }

    /// Comments on a post, oldest first; an unknown post has none
    pub async fn list(&self, post_id: &PostId) -> BlogResult<Vec<Comment>> {
        self.comment_repo.list_by_post(post_id).await
    }

    pub async fn delete(&self, actor: &AuthContext, comment_id: &CommentId) -> BlogResult<()> {
        let comment = self
            .comment_repo
            .find_by_id(comment_id)
            .await?
            .ok_or(BlogError::CommentNotFound)?;

        policy::check_delete_comment(actor, &comment.author_id)?;

        if !self.comment_repo.delete(comment_id).await? {
            return Err(BlogError::CommentNotFound);
        }

        tracing::info!(comment_id = %comment_id, actor_id = %actor.user_id(), "Comment deleted");

        Ok(())
    }
}
