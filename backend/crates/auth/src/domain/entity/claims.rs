//! Identity claims carried by both token classes.

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// Who the bearer is, as asserted by a signed token
///
/// Claims are a snapshot taken at issuance: a role or email change only
/// reaches the client with the next refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub user_id: UserId,
    pub email: Email,
    pub role: UserRole,
}

impl Claims {
    pub fn for_user(user: &User) -> Self {
        Self {
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role,
        }
    }
}
