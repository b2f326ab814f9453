//! Admin Bootstrap
//!
//! Seeds the first admin account at startup so admin routes are reachable on
//! a fresh database.

use std::sync::Arc;

use platform::password::{ClearTextPassword, PasswordHasher};

use crate::application::sign_up::hash_password;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{display_name::DisplayName, email::Email, user_role::UserRole};
use crate::error::{AuthError, AuthResult};

/// Seed admin credentials (ADMIN_EMAIL / ADMIN_PASSWORD / ADMIN_NAME)
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

impl AdminSeed {
    /// `None` unless both ADMIN_EMAIL and ADMIN_PASSWORD are set
    pub fn from_env() -> Option<Self> {
        let email = std::env::var("ADMIN_EMAIL").ok()?;
        let password = std::env::var("ADMIN_PASSWORD").ok()?;
        let name = std::env::var("ADMIN_NAME").unwrap_or_else(|_| "Admin".to_string());
        Some(Self {
            email,
            password,
            name,
        })
    }
}

/// Create the seed admin unless the email is already registered
///
/// Returns `true` when an account was created. An existing account is left
/// untouched, including its role.
pub async fn ensure_admin<U>(
    user_repo: &U,
    hasher: &Arc<PasswordHasher>,
    seed: AdminSeed,
) -> AuthResult<bool>
where
    U: UserRepository,
{
    let email = Email::new(&seed.email)?;
    if user_repo.exists_by_email(&email).await? {
        tracing::debug!(email = %email, "Seed admin already present");
        return Ok(false);
    }

    let name = DisplayName::new(seed.name)?;
    let password = ClearTextPassword::new(seed.password)
        .map_err(|e| AuthError::validation("password", e.to_string()))?;
    let hash = hash_password(hasher, password).await?;

    let admin = User::new(name, email, hash).with_role(UserRole::Admin);
    user_repo.create(&admin).await?;

    tracing::info!(user_id = %admin.user_id, "Seed admin created");
    Ok(true)
}
