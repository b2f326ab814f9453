//! User Entity
//!
//! Account record owned by the credential store.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{
    display_name::DisplayName, email::Email, user_id::UserId, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub name: DisplayName,
    /// Unique, stored lowercase
    pub email: Email,
    pub password_hash: HashedPassword,
    pub role: UserRole,
    /// False while banned
    pub is_active: bool,
    pub banned_at: Option<DateTime<Utc>>,
    pub banned_by: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user with the default role
    pub fn new(name: DisplayName, email: Email, password_hash: HashedPassword) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            name,
            email,
            password_hash,
            role: UserRole::default(),
            is_active: true,
            banned_at: None,
            banned_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Ban the account on behalf of `actor`
    pub fn ban(&mut self, actor: UserId) {
        let now = Utc::now();
        self.is_active = false;
        self.banned_at = Some(now);
        self.banned_by = Some(actor);
        self.updated_at = now;
    }

    /// Lift a ban, clearing the ban metadata
    pub fn unban(&mut self) {
        self.is_active = true;
        self.banned_at = None;
        self.banned_by = None;
        self.updated_at = Utc::now();
    }
}
