//! Sign Up Use Case
//!
//! Registers a new user and opens a session for them.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::domain::entity::{claims::Claims, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{display_name::DisplayName, email::Email};
use crate::error::{AuthError, AuthResult};

/// Sign up input; absent fields are reported as validation errors
pub struct SignUpInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Sign up use case
pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    hasher: Arc<PasswordHasher>,
    issuer: Arc<TokenIssuer>,
}

impl<U> SignUpUseCase<U>
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

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<TokenPair> {
        let name = required("name", input.name)?;
        let email = required("email", input.email)?;
        let password = required("password", input.password)?;

        let name = DisplayName::new(name)?;
        let email = Email::new(email)?;
        let password = ClearTextPassword::new(password)
            .map_err(|e| AuthError::validation("password", e.to_string()))?;

        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(&self.hasher, password).await?;

        let user = User::new(name, email, password_hash);
        // A concurrent registration can still win the race; the store
        // reports that as EmailTaken too.
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, "User registered");

        self.issuer.issue_pair(&Claims::for_user(&user))
    }
}

fn required(field: &'static str, value: Option<String>) -> AuthResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AuthError::validation(field, format!("{field} is required"))),
    }
}

/// Argon2 is CPU-bound; keep it off the async worker threads
pub(crate) async fn hash_password(
    hasher: &Arc<PasswordHasher>,
    password: ClearTextPassword,
) -> AuthResult<platform::password::HashedPassword> {
    let hasher = Arc::clone(hasher);
    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AuthError::Internal(e.to_string()))
}
