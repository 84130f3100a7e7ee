//! Staff account management.
//!
//! All operations require the Admin role. An administrator cannot delete,
//! demote or deactivate their own account, and the last active
//! administrator cannot be removed.

use tracing::{info, warn};

use crate::auth::{hash_password, require_admin};
use crate::db::{Database, NewUser, Role, SessionRepository, User, UserRepository, UserUpdate};
use crate::{ChanError, Result};

use super::AdminError;

/// Minimum username length.
const MIN_USERNAME_LENGTH: usize = 3;

/// Maximum username length.
const MAX_USERNAME_LENGTH: usize = 32;

/// Validate a username: 3-32 ASCII letters, digits or underscores.
pub fn validate_username(username: &str) -> Result<()> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ChanError::Validation(format!(
            "username must be {MIN_USERNAME_LENGTH}-{MAX_USERNAME_LENGTH} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(ChanError::Validation(
            "username may only contain letters, digits and underscores".to_string(),
        ));
    }
    Ok(())
}

/// Changes to apply to an account.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    /// New role.
    pub role: Option<Role>,
    /// New active status.
    pub is_active: Option<bool>,
    /// New plain-text password.
    pub password: Option<String>,
}

/// Admin service for staff accounts.
pub struct UserAdminService<'a> {
    db: &'a Database,
}

impl<'a> UserAdminService<'a> {
    /// Create a new UserAdminService.
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// List all accounts.
    pub async fn list_users(&self, admin: &User) -> std::result::Result<Vec<User>, AdminError> {
        require_admin(Some(admin))?;
        Ok(UserRepository::new(self.db.pool()).list().await?)
    }

    /// Create a new account.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        role: Role,
        admin: &User,
    ) -> std::result::Result<User, AdminError> {
        require_admin(Some(admin))?;
        validate_username(username)?;

        let repo = UserRepository::new(self.db.pool());
        if repo.username_exists(username).await? {
            return Err(AdminError::Conflict(format!(
                "username {username} is already taken"
            )));
        }

        let hash = hash_password(password).map_err(ChanError::from)?;
        let user = repo
            .create(&NewUser::new(username, hash).with_role(role))
            .await?;

        info!(username = %user.username, role = %user.role, admin = %admin.username, "User created");
        Ok(user)
    }

    /// Change role, active status or password of an account.
    pub async fn update_user(
        &self,
        user_id: i64,
        changes: &UserChanges,
        admin: &User,
    ) -> std::result::Result<User, AdminError> {
        require_admin(Some(admin))?;

        let repo = UserRepository::new(self.db.pool());
        let target = repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("user".to_string()))?;

        let demoting = changes.role.is_some_and(|r| r != Role::Admin);
        let deactivating = changes.is_active == Some(false);

        if target.id == admin.id && (demoting || deactivating) {
            return Err(AdminError::CannotModifySelf);
        }
        if demoting || deactivating {
            self.ensure_not_last_admin(&target).await?;
        }

        let mut update = UserUpdate::new();
        if let Some(role) = changes.role {
            update = update.role(role);
        }
        if let Some(is_active) = changes.is_active {
            update = update.is_active(is_active);
        }
        if let Some(ref password) = changes.password {
            update = update.password(hash_password(password).map_err(ChanError::from)?);
        }

        let updated = repo
            .update(user_id, &update)
            .await?
            .ok_or_else(|| AdminError::NotFound("user".to_string()))?;

        if deactivating || changes.password.is_some() {
            SessionRepository::new(self.db.pool())
                .delete_for_user(user_id)
                .await?;
        }

        info!(username = %updated.username, admin = %admin.username, "User updated");
        Ok(updated)
    }

    /// Delete an account.
    pub async fn delete_user(&self, user_id: i64, admin: &User) -> std::result::Result<(), AdminError> {
        require_admin(Some(admin))?;

        if user_id == admin.id {
            return Err(AdminError::CannotModifySelf);
        }

        let repo = UserRepository::new(self.db.pool());
        let target = repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("user".to_string()))?;
        self.ensure_not_last_admin(&target).await?;

        repo.delete(user_id).await?;
        info!(username = %target.username, admin = %admin.username, "User deleted");
        Ok(())
    }

    async fn ensure_not_last_admin(&self, target: &User) -> std::result::Result<(), AdminError> {
        if target.role != Role::Admin || !target.is_active {
            return Ok(());
        }
        let admins = UserRepository::new(self.db.pool())
            .count_active_by_role(Role::Admin)
            .await?;
        if admins <= 1 {
            return Err(AdminError::LastAdmin);
        }
        Ok(())
    }
}

/// Create the first administrator when no accounts exist.
///
/// Does nothing if any account exists. Without a configured password no
/// account is created and a warning is logged.
pub async fn ensure_bootstrap_admin(
    db: &Database,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    let repo = UserRepository::new(db.pool());
    if repo.count().await? > 0 {
        return Ok(None);
    }

    if password.is_empty() {
        warn!("No staff accounts exist and no bootstrap password is configured");
        return Ok(None);
    }

    validate_username(username)?;
    let hash = hash_password(password)?;
    let user = repo
        .create(&NewUser::new(username, hash).with_role(Role::Admin))
        .await?;
    info!(username = %user.username, "Created bootstrap administrator");
    Ok(Some(user))
}
