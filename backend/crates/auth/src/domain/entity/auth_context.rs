//! Per-request identity.

use crate::domain::entity::claims::Claims;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// Authenticated identity attached to a request by the session middleware
///
/// Read-only once inserted into the request extensions; handlers take it
/// through `Extension<AuthContext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    user_id: UserId,
    email: Email,
    role: UserRole,
}

impl AuthContext {
    pub fn new(user_id: UserId, email: Email, role: UserRole) -> Self {
        Self {
            user_id,
            email,
            role,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self::new(claims.user_id, claims.email, claims.role)
    }
}
