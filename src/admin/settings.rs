//! Site settings for administrators.

use tracing::info;

use crate::auth::require_admin;
use crate::db::{parse_bool, DbPool, Setting, SettingsRepository, User, BOOLEAN_SETTINGS};

use super::AdminError;

/// Maximum length of a setting key.
const MAX_KEY_LENGTH: usize = 64;

/// Maximum length of a setting value.
const MAX_VALUE_LENGTH: usize = 4000;

/// Admin service for site settings.
pub struct SettingsAdminService<'a> {
    pool: &'a DbPool,
}

impl<'a> SettingsAdminService<'a> {
    /// Create a new SettingsAdminService.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// List every setting.
    pub async fn list(&self, admin: &User) -> Result<Vec<Setting>, AdminError> {
        require_admin(Some(admin))?;
        Ok(SettingsRepository::new(self.pool).list().await?)
    }

    /// Set a setting.
    ///
    /// Keys are lowercase letters, digits and underscores. Boolean keys
    /// only take values `parse_bool` understands.
    pub async fn set(&self, key: &str, value: &str, admin: &User) -> Result<Setting, AdminError> {
        require_admin(Some(admin))?;

        let valid_key = !key.is_empty()
            && key.len() <= MAX_KEY_LENGTH
            && key
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if !valid_key {
            return Err(AdminError::InvalidOperation(format!("invalid setting key: {key}")));
        }
        if value.chars().count() > MAX_VALUE_LENGTH {
            return Err(AdminError::InvalidOperation(format!(
                "setting value must be at most {MAX_VALUE_LENGTH} characters"
            )));
        }
        if BOOLEAN_SETTINGS.contains(&key) && parse_bool(value).is_none() {
            return Err(AdminError::InvalidOperation(format!(
                "{key} must be true or false, got {value:?}"
            )));
        }

        SettingsRepository::new(self.pool).set(key, value).await?;
        info!(key = %key, admin = %admin.username, "Setting changed");
        Ok(Setting {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::test_support::create_user;
    use crate::auth::PermissionError;
    use crate::db::{Role, ANNOUNCEMENT, POSTING_ENABLED};
    use crate::Database;

    #[tokio::test]
    async fn test_set_and_list() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = create_user(&db, "admin", Role::Admin).await;
        let service = SettingsAdminService::new(db.pool());

        service.set(ANNOUNCEMENT, "Welcome!", &admin).await.unwrap();
        let settings = service.list(&admin).await.unwrap();
        assert!(settings
            .iter()
            .any(|s| s.key == ANNOUNCEMENT && s.value == "Welcome!"));
    }

    #[tokio::test]
    async fn test_invalid_key() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = create_user(&db, "admin", Role::Admin).await;
        let service = SettingsAdminService::new(db.pool());

        assert!(matches!(
            service.set("Bad Key", "x", &admin).await,
            Err(AdminError::InvalidOperation(_))
        ));
    }

    #[tokio::test]
    async fn test_boolean_setting_values() {
        let db = Database::open_in_memory().await.unwrap();
        let admin = create_user(&db, "admin", Role::Admin).await;
        let service = SettingsAdminService::new(db.pool());
        let repo = SettingsRepository::new(db.pool());

        for value in ["flase", "", "enabled", "2"] {
            assert!(matches!(
                service.set(POSTING_ENABLED, value, &admin).await,
                Err(AdminError::InvalidOperation(_))
            ));
        }
        assert!(repo.get_bool(POSTING_ENABLED, false).await.unwrap());

        service.set(POSTING_ENABLED, "off", &admin).await.unwrap();
        assert!(!repo.get_bool(POSTING_ENABLED, true).await.unwrap());

        // Free-text keys take anything
        service.set(ANNOUNCEMENT, "flase", &admin).await.unwrap();
    }

    #[tokio::test]
    async fn test_moderator_denied() {
        let db = Database::open_in_memory().await.unwrap();
        let moderator = create_user(&db, "mod", Role::Moderator).await;
        let service = SettingsAdminService::new(db.pool());

        assert!(matches!(
            service.list(&moderator).await,
            Err(AdminError::Permission(PermissionError::InsufficientRole(_)))
        ));
    }
}
