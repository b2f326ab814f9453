//! Current User Use Case

use std::sync::Arc;

use crate::domain::entity::{auth_context::AuthContext, user::User};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self, ctx: &AuthContext) -> AuthResult<User> {
        self.user_repo
            .find_by_id(ctx.user_id())
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}
