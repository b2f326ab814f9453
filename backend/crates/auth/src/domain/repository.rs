//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use serde::Serialize;

use crate::domain::entity::user::User;
use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};
use crate::error::AuthResult;

/// Credential store: the only writer of user records
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user (`EmailTaken` when the email is already registered)
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    /// All users, oldest first
    async fn list(&self) -> AuthResult<Vec<User>>;

    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Delete a user unless they are the last active admin
    ///
    /// Counting the remaining admins and deleting happen as one atomic step,
    /// so concurrent deletes can never remove every admin.
    async fn delete(&self, user_id: &UserId) -> AuthResult<UserDeletion>;

    /// Count users with `role` that are not banned
    async fn count_active_by_role(&self, role: UserRole) -> AuthResult<u64>;
}

/// Outcome of [`LocalUserRepository::delete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDeletion {
    Deleted,
    NotFound,
    /// Refused: the user is the only active admin left
    LastAdmin,
}

/// Rows removed by a cascade delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CascadeCounts {
    pub posts_deleted: u64,
    pub comments_deleted: u64,
}

/// Content authored by users, owned by another bounded context
///
/// The admin delete flow removes a user's content through this trait before
/// removing the user, so no content ever points at a missing author.
#[trait_variant::make(AuthoredContentRepository: Send)]
pub trait LocalAuthoredContentRepository {
    /// Delete the author's comments, all comments on the author's posts, and
    /// the author's posts, atomically
    async fn delete_authored_by(&self, author_id: &UserId) -> AuthResult<CascadeCounts>;
}
