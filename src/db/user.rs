//! Admin panel user model.
//!
//! Visitors are anonymous; only moderators and administrators have accounts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Staff role for permission management.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Moderator: handles posts, bans and reports.
    #[default]
    Moderator = 1,
    /// Administrator: additionally manages boards, users and settings.
    Admin = 2,
}

impl Role {
    /// Convert role to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// Check if this role has at least the required permission level.
    ///
    /// # Examples
    ///
    /// ```
    /// use chanboard::db::Role;
    ///
    /// assert!(Role::Admin.can_access(Role::Moderator));
    /// assert!(Role::Moderator.can_access(Role::Moderator));
    /// assert!(!Role::Moderator.can_access(Role::Admin));
    /// ```
    pub fn can_access(&self, required: Role) -> bool {
        *self >= required
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "moderator" | "mod" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("unknown role: {s}")),
        }
    }
}

/// Staff account.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login username (unique, case-insensitive).
    pub username: String,
    /// Password hash (Argon2).
    pub password: String,
    /// Role for permissions.
    pub role: Role,
    /// Whether the account may log in.
    pub is_active: bool,
    /// Account creation timestamp.
    pub created_at: String,
    /// Last login timestamp.
    pub last_login: Option<String>,
}

impl User {
    /// Check if this user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Data for creating a new staff account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login username.
    pub username: String,
    /// Password hash (already hashed with Argon2).
    pub password: String,
    /// Role (defaults to Moderator).
    pub role: Role,
}

impl NewUser {
    /// Create a new moderator account.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role: Role::Moderator,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }
}

/// Data for updating an existing account.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    /// New password hash.
    pub password: Option<String>,
    /// New role.
    pub role: Option<Role>,
    /// New active status.
    pub is_active: Option<bool>,
}

impl UserUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new password hash.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set new role.
    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    /// Set active status.
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.password.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Moderator < Role::Admin);
    }

    #[test]
    fn test_role_round_trip_strings() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("MOD").unwrap(), Role::Moderator);
        assert_eq!(Role::Moderator.to_string(), "moderator");
        assert!(Role::from_str("janitor").is_err());
    }

    #[test]
    fn test_new_user_defaults_to_moderator() {
        let user = NewUser::new("mod", "hash");
        assert_eq!(user.role, Role::Moderator);
        assert_eq!(NewUser::new("a", "h").with_role(Role::Admin).role, Role::Admin);
    }

    #[test]
    fn test_user_update_builder() {
        assert!(UserUpdate::new().is_empty());
        let update = UserUpdate::new().role(Role::Admin).is_active(false);
        assert_eq!(update.role, Some(Role::Admin));
        assert_eq!(update.is_active, Some(false));
        assert!(!update.is_empty());
    }
}
