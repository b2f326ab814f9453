//! In-Memory Repository
//!
//! Process-local credential store for tests and local development without a
//! database. Email uniqueness is enforced under the write lock.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::user::User;
use crate::domain::repository::{UserDeletion, UserRepository};
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

#[derive(Clone, Default)]
pub struct MemoryAuthRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl MemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for MemoryAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(AuthError::EmailTaken);
        }
        users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>> {
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        Ok(self.users.read().await.values().any(|u| &u.email == email))
    }

    async fn list(&self) -> AuthResult<Vec<User>> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });
        Ok(users)
    }

    async fn update(&self, user: &User) -> AuthResult<()> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email == user.email && u.user_id != user.user_id)
        {
            return Err(AuthError::EmailTaken);
        }
        match users.get_mut(&user.user_id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AuthError::UserNotFound),
        }
    }

    async fn delete(&self, user_id: &UserId) -> AuthResult<UserDeletion> {
        let mut users = self.users.write().await;
        let Some(target) = users.get(user_id) else {
            return Ok(UserDeletion::NotFound);
        };

        if target.is_admin() && target.is_active {
            let active_admins = users.values().filter(|u| u.is_admin() && u.is_active).count();
            if active_admins <= 1 {
                return Ok(UserDeletion::LastAdmin);
            }
        }

        users.remove(user_id);
        Ok(UserDeletion::Deleted)
    }

    async fn count_active_by_role(&self, role: UserRole) -> AuthResult<u64> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.role == role && u.is_active)
            .count() as u64)
    }
}
