//! Refresh Use Case
//!
//! Exchanges a refresh token for a new access token. The refresh token is
//! rotated on every call but keeps the deadline of the login that started the
//! session, so a session ends at most one refresh lifetime after sign-in.
//!
//! The account is re-read on each refresh: a ban or deletion ends the session
//! once the current access token runs out, and role or email changes reach the
//! new tokens.

use std::sync::Arc;

use crate::application::token_issuer::{TokenIssuer, TokenPair};
use crate::domain::entity::claims::Claims;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    issuer: Arc<TokenIssuer>,
}

impl<U> RefreshUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, issuer: Arc<TokenIssuer>) -> Self {
        Self { user_repo, issuer }
    }

    /// `refresh_token` is the cookie value, if any
    pub async fn execute(&self, refresh_token: Option<&str>) -> AuthResult<TokenPair> {
        let token = refresh_token.ok_or(AuthError::NoRefreshToken)?;

        let session = self.issuer.verify_refresh(token).map_err(|e| match e {
            AuthError::ExpiredToken => AuthError::RefreshExpired,
            other => other,
        })?;

        let user = self
            .user_repo
            .find_by_id(&session.claims.user_id)
            .await?
            .ok_or_else(|| {
                tracing::info!(user_id = %session.claims.user_id, "Refresh for deleted account");
                AuthError::SessionRevoked
            })?;

        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        tracing::debug!(user_id = %user.user_id, "Session refreshed");

        self.issuer
            .rotate_pair(&Claims::for_user(&user), session.expires_at)
    }
}
