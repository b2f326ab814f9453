//! Authorization Policy
//!
//! Pure functions over (actor, target, action). The `check_*` variants return
//! the reason for a denial; the `can_*` variants answer yes or no.

use crate::domain::entity::{auth_context::AuthContext, user::User};
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Denial reason when a delete would leave no active admin
pub const LAST_ADMIN_REASON: &str = "Cannot delete the last active admin";

fn deny(reason: &str) -> AuthError {
    AuthError::Forbidden(reason.to_string())
}

/// Denial raised when the store refuses to remove the last active admin
pub fn last_admin_denied() -> AuthError {
    deny(LAST_ADMIN_REASON)
}

/// Admin deleting another user
///
/// `active_admins` is the number of non-banned admins before the delete.
pub fn check_delete_user(actor: &AuthContext, target: &User, active_admins: u64) -> AuthResult<()> {
    if actor.user_id() == &target.user_id {
        return Err(deny("You cannot delete your own account"));
    }
    if target.is_admin() && active_admins <= 1 {
        return Err(last_admin_denied());
    }
    Ok(())
}

pub fn can_delete_user(actor: &AuthContext, target: &User, active_admins: u64) -> bool {
    check_delete_user(actor, target, active_admins).is_ok()
}

/// Admin banning another user
pub fn check_ban_user(actor: &AuthContext, target: &User) -> AuthResult<()> {
    if actor.user_id() == &target.user_id {
        return Err(deny("You cannot ban yourself"));
    }
    if target.is_admin() {
        return Err(deny("Admins cannot be banned"));
    }
    Ok(())
}

pub fn can_ban_user(actor: &AuthContext, target: &User) -> bool {
    check_ban_user(actor, target).is_ok()
}

fn is_author_or_admin(actor: &AuthContext, author_id: &UserId) -> bool {
    actor.user_id() == author_id || actor.is_admin()
}

pub fn check_edit_post(actor: &AuthContext, author_id: &UserId) -> AuthResult<()> {
    if is_author_or_admin(actor, author_id) {
        Ok(())
    } else {
        Err(deny("Not authorized to edit this post"))
    }
}

pub fn can_edit_post(actor: &AuthContext, author_id: &UserId) -> bool {
    check_edit_post(actor, author_id).is_ok()
}

pub fn check_delete_post(actor: &AuthContext, author_id: &UserId) -> AuthResult<()> {
    if is_author_or_admin(actor, author_id) {
        Ok(())
    } else {
        Err(deny("Not authorized to delete this post"))
    }
}

pub fn can_delete_post(actor: &AuthContext, author_id: &UserId) -> bool {
    check_delete_post(actor, author_id).is_ok()
}

pub fn check_delete_comment(actor: &AuthContext, author_id: &UserId) -> AuthResult<()> {
    if is_author_or_admin(actor, author_id) {
        Ok(())
    } else {
        Err(deny("Not authorized to delete this comment"))
    }
}

pub fn can_delete_comment(actor: &AuthContext, author_id: &UserId) -> bool {
    check_delete_comment(actor, author_id).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        display_name::DisplayName, email::Email, user_role::UserRole,
    };
    use platform::password::HashedPassword;

    // Fixed PHC string; policy checks never touch the hash.
    const PHC: &str = "$argon2id$v=19$m=19456,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$WbLbnU8rUiXtHKwFCgq/jLn3+4pcKo0yEJfhp8dOkhQ";

    fn user(role: UserRole) -> User {
        let id = UserId::new();
        User::new(
            DisplayName::new("someone").unwrap(),
            Email::new(format!("{}@example.com", id)).unwrap(),
            HashedPassword::from_phc_string(PHC).unwrap(),
        )
        .with_role(role)
    }

    fn ctx(user: &User) -> AuthContext {
        AuthContext::new(user.user_id, user.email.clone(), user.role)
    }

    #[test]
    fn test_no_self_delete() {
        let admin = user(UserRole::Admin);
        assert!(!can_delete_user(&ctx(&admin), &admin, 5));
        assert!(matches!(
            check_delete_user(&ctx(&admin), &admin, 5),
            Err(AuthError::Forbidden(_))
        ));
    }

    #[test]
    fn test_last_admin_guard() {
        let actor = user(UserRole::Admin);
        let other_admin = user(UserRole::Admin);
        assert!(!can_delete_user(&ctx(&actor), &other_admin, 1));
        assert!(!can_delete_user(&ctx(&actor), &other_admin, 0));
        assert!(can_delete_user(&ctx(&actor), &other_admin, 2));
    }

    #[test]
    fn test_delete_regular_user() {
        let actor = user(UserRole::Admin);
        let target = user(UserRole::User);
        // Admin count is irrelevant for non-admin targets
        assert!(can_delete_user(&ctx(&actor), &target, 1));
    }

    #[test]
    fn test_ban_rules() {
        let actor = user(UserRole::Admin);
        let target = user(UserRole::User);
        let other_admin = user(UserRole::Admin);

        assert!(can_ban_user(&ctx(&actor), &target));
        assert!(!can_ban_user(&ctx(&actor), &actor));
        assert!(!can_ban_user(&ctx(&actor), &other_admin));
    }

    #[test]
    fn test_content_ownership() {
        let author = user(UserRole::User);
        let stranger = user(UserRole::User);
        let admin = user(UserRole::Admin);

        assert!(can_edit_post(&ctx(&author), &author.user_id));
        assert!(can_edit_post(&ctx(&admin), &author.user_id));
        assert!(!can_edit_post(&ctx(&stranger), &author.user_id));

        assert!(can_delete_post(&ctx(&author), &author.user_id));
        assert!(can_delete_post(&ctx(&admin), &author.user_id));
        assert!(!can_delete_post(&ctx(&stranger), &author.user_id));

        assert!(can_delete_comment(&ctx(&author), &author.user_id));
        assert!(can_delete_comment(&ctx(&admin), &author.user_id));
        assert!(!can_delete_comment(&ctx(&stranger), &author.user_id));
    }
}
