//! Sign In Use Case
//!
//! Authenticates a user by email and password and opens a session.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::domain::entity::claims::Claims;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Sign in input
pub struct SignInInput {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sign in use case
pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<PasswordHasher>,
    issuer: Arc<TokenIssuer>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, hasher: Arc<PasswordHasher>, issuer: Arc<TokenIssuer>) -> Self {
        Self {
            user_repo,
            hasher,
            issuer,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<TokenPair> {
        let (Some(email), Some(password)) = (input.email, input.password) else {
            return Err(AuthError::InvalidCredentials);
        };

        // A malformed email cannot belong to anyone
        let email = Email::new(email).map_err(|_| AuthError::InvalidCredentials)?;
        let password = ClearTextPassword::for_verification(password);

        let user = self.user_repo.find_by_email(&email).await?;

        let hasher = Arc::clone(&self.hasher);
        let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
        let password_valid = tokio::task::spawn_blocking(move || match stored_hash {
            Some(hash) => hasher.verify(&password, &hash),
            None => {
                hasher.verify_dummy(&password);
                false
            }
        })
        .await
        .map_err(|e| AuthError::Internal(format!("Password verification task failed: {e}")))?;

        let user = match user {
            Some(user) if password_valid => user,
            _ => return Err(AuthError::InvalidCredentials),
        };

        // Checked after the password so a ban is only revealed to its owner
        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        tracing::info!(user_id = %user.user_id, role = %user.role, "User signed in");

        self.issuer.issue_pair(&Claims::for_user(&user))
    }
}
