//! Admin User Management Use Cases
//!
//! List, delete (with content cascade), ban and unban.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::entity::{auth_context::AuthContext, user::User};
use crate::domain::policy;
use crate::domain::repository::{
    AuthoredContentRepository, CascadeCounts, UserDeletion, UserRepository,
};
use crate::domain::value_object::{user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Record emitted for every successful user deletion
#[derive(Debug, Clone)]
pub struct DeleteUserAudit {
    pub actor_id: UserId,
    pub target_id: UserId,
    pub at: DateTime<Utc>,
    pub counts: CascadeCounts,
}

impl DeleteUserAudit {
    fn emit(&self) {
        tracing::info!(
            target: "audit",
            actor_id = %self.actor_id,
            target_id = %self.target_id,
            at = %self.at.to_rfc3339(),
            posts_deleted = self.counts.posts_deleted,
            comments_deleted = self.counts.comments_deleted,
            "User deleted"
        );
    }
}

/// Admin use cases over the credential store
pub struct AdminUsersUseCase<U, C>
where
    U: UserRepository,
    C: AuthoredContentRepository,
{
    user_repo: Arc<U>,
    content_repo: Arc<C>,
}

impl<U, C> AdminUsersUseCase<U, C>
where
    U: UserRepository,
    C: AuthoredContentRepository,
{
    pub fn new(user_repo: Arc<U>, content_repo: Arc<C>) -> Self {
        Self {
            user_repo,
            content_repo,
        }
    }

    pub async fn list(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list().await
    }

    /// Delete `target_id` and everything they authored
    ///
    /// Content goes first; if that fails the user is left in place. The store
    /// re-checks the last-admin rule atomically with the delete, which catches
    /// two admins deleting each other at the same time.
    pub async fn delete(
        &self,
        actor: &AuthContext,
        target_id: &UserId,
    ) -> AuthResult<DeleteUserAudit> {
        let target = self.find(target_id).await?;

        let active_admins = self.user_repo.count_active_by_role(UserRole::Admin).await?;
        policy::check_delete_user(actor, &target, active_admins)?;

        let counts = self
            .content_repo
            .delete_authored_by(target_id)
            .await
            .map_err(|e| {
                tracing::error!(target_id = %target_id, error = %e, "Content cascade failed");
                match e {
                    AuthError::Internal(_) => e,
                    other => AuthError::Internal(other.to_string()),
                }
            })?;

        match self.user_repo.delete(target_id).await? {
            UserDeletion::Deleted => {}
            UserDeletion::NotFound => return Err(AuthError::UserNotFound),
            UserDeletion::LastAdmin => {
                tracing::warn!(
                    target_id = %target_id,
                    posts_deleted = counts.posts_deleted,
                    comments_deleted = counts.comments_deleted,
                    "Last admin kept after a concurrent delete"
                );
                return Err(policy::last_admin_denied());
            }
        }

        let audit = DeleteUserAudit {
            actor_id: *actor.user_id(),
            target_id: *target_id,
            at: Utc::now(),
            counts,
        };
        audit.emit();

        Ok(audit)
    }

    pub async fn ban(&self, actor: &AuthContext, target_id: &UserId) -> AuthResult<User> {
        let mut target = self.find(target_id).await?;
        policy::check_ban_user(actor, &target)?;

        if target.is_active {
            target.ban(*actor.user_id());
            self.user_repo.update(&target).await?;
            tracing::info!(
                target: "audit",
                actor_id = %actor.user_id(),
                target_id = %target_id,
                "User banned"
            );
        }

        Ok(target)
    }

    pub async fn unban(&self, actor: &AuthContext, target_id: &UserId) -> AuthResult<User> {
        let mut target = self.find(target_id).await?;

        if !target.is_active {
            target.unban();
            self.user_repo.update(&target).await?;
            tracing::info!(
                target: "audit",
                actor_id = %actor.user_id(),
                target_id = %target_id,
                "User unbanned"
            );
        }

        Ok(target)
    }

    async fn find(&self, user_id: &UserId) -> AuthResult<User> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
