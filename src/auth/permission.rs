//! Permission checking for staff accounts.
//!
//! This module provides role-based access control functions.

use thiserror::Error;

use crate::db::{Role, User};
use crate::ChanError;

/// Permission-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PermissionError {
    /// User does not have sufficient permission.
    #[error("this action requires the {0} role")]
    InsufficientRole(Role),

    /// No user is logged in.
    #[error("login required")]
    NotAuthenticated,

    /// User account is not active.
    #[error("account is disabled")]
    AccountInactive,
}

impl From<PermissionError> for ChanError {
    fn from(e: PermissionError) -> Self {
        match e {
            PermissionError::NotAuthenticated => ChanError::Auth(e.to_string()),
            _ => ChanError::Permission(e.to_string()),
        }
    }
}

/// Check that a user is logged in, active and holds at least `required`.
///
/// # Examples
///
/// ```
/// use chanboard::auth::{check_permission, PermissionError};
/// use chanboard::db::Role;
///
/// assert!(matches!(
///     check_permission(None, Role::Moderator),
///     Err(PermissionError::NotAuthenticated)
/// ));
/// ```
pub fn check_permission(user: Option<&User>, required: Role) -> Result<(), PermissionError> {
    let user = user.ok_or(PermissionError::NotAuthenticated)?;

    if !user.is_active {
        return Err(PermissionError::AccountInactive);
    }

    if !user.role.can_access(required) {
        return Err(PermissionError::InsufficientRole(required));
    }

    Ok(())
}

/// Require at least the Moderator role.
pub fn require_moderator(user: Option<&User>) -> Result<(), PermissionError> {
    check_permission(user, Role::Moderator)
}

/// Require the Admin role.
pub fn require_admin(user: Option<&User>) -> Result<(), PermissionError> {
    check_permission(user, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, is_active: bool) -> User {
        User {
            id: 1,
            username: "staff".to_string(),
            password: "hash".to_string(),
            role,
            is_active,
            created_at: "2024-01-01 00:00:00".to_string(),
            last_login: None,
        }
    }

    #[test]
    fn test_no_user() {
        assert_eq!(
            require_moderator(None),
            Err(PermissionError::NotAuthenticated)
        );
    }

    #[test]
    fn test_moderator_permissions() {
        let moderator = user(Role::Moderator, true);
        assert!(require_moderator(Some(&moderator)).is_ok());
        assert_eq!(
            require_admin(Some(&moderator)),
            Err(PermissionError::InsufficientRole(Role::Admin))
        );
    }

    #[test]
    fn test_admin_permissions() {
        let admin = user(Role::Admin, true);
        assert!(require_moderator(Some(&admin)).is_ok());
        assert!(require_admin(Some(&admin)).is_ok());
    }

    #[test]
    fn test_inactive_user() {
        let admin = user(Role::Admin, false);
        assert_eq!(
            require_moderator(Some(&admin)),
            Err(PermissionError::AccountInactive)
        );
    }

    #[test]
    fn test_error_conversion() {
        assert!(matches!(
            ChanError::from(PermissionError::NotAuthenticated),
            ChanError::Auth(_)
        ));
        assert!(matches!(
            ChanError::from(PermissionError::InsufficientRole(Role::Admin)),
            ChanError::Permission(_)
        ));
        assert_eq!(
            PermissionError::InsufficientRole(Role::Admin).to_string(),
            "this action requires the admin role"
        );
    }
}
