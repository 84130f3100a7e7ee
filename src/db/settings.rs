//! Key/value site settings.

use super::{DbPool, SQL_NOW};
use crate::{ChanError, Result};

/// Setting key toggling anonymous posting site-wide.
pub const POSTING_ENABLED: &str = "posting_enabled";

/// Setting key for the announcement banner text.
pub const ANNOUNCEMENT: &str = "announcement";

/// Setting keys that hold a boolean.
pub const BOOLEAN_SETTINGS: &[&str] = &[POSTING_ENABLED];

/// Parse a boolean setting value.
///
/// Accepts `true`/`false`, `1`/`0`, `yes`/`no` and `on`/`off`, ignoring case.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// A single setting row.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Setting {
    /// Setting key.
    pub key: String,
    /// Setting value.
    pub value: String,
}

/// Repository for the `settings` table.
pub struct SettingsRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get a setting value.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let value: Option<String> = sqlx::query_scalar("SELECT value FROM settings WHERE key = $1")
            .bind(key)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(value)
    }

    /// Get a boolean setting, falling back to `default` when unset or
    /// not a recognised boolean.
    pub async fn get_bool(&self, key: &str, default: bool) -> Result<bool> {
        Ok(self
            .get(key)
            .await?
            .as_deref()
            .and_then(parse_bool)
            .unwrap_or(default))
    }

    /// Insert or replace a setting.
    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO settings (key, value) VALUES ($1, $2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = {SQL_NOW}"
        );
        sqlx::query(&sql)
            .bind(key)
            .bind(value)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all settings ordered by key.
    pub async fn list(&self) -> Result<Vec<Setting>> {
        let rows = sqlx::query_as::<_, Setting>("SELECT key, value FROM settings ORDER BY key")
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(rows)
    }
}
