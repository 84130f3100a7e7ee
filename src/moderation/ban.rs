//! IP bans.

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::db::{DbPool, SQL_FALSE, SQL_NOW, SQL_TRUE, TIMESTAMP_FORMAT};
use crate::{ChanError, Result};

/// Longest timed ban, ten years. Longer bans should be permanent.
pub const MAX_BAN_HOURS: i64 = 10 * 365 * 24;

/// A ban on a single IP address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Ban {
    /// Unique ban ID.
    pub id: i64,
    /// Banned IP address.
    pub ip_address: String,
    /// Reason shown to the banned poster.
    pub reason: String,
    /// Expiry timestamp, None for a permanent ban.
    pub expires_at: Option<String>,
    /// Whether the ban is in force (lifted bans are inactive).
    pub is_active: bool,
    /// ID of the staff member who issued the ban.
    pub banned_by: Option<i64>,
    /// Creation timestamp.
    pub created_at: String,
}

impl Ban {
    /// Check if the ban never expires.
    pub fn is_permanent(&self) -> bool {
        self.expires_at.is_none()
    }
}

/// Data for creating a new ban.
#[derive(Debug, Clone)]
pub struct NewBan {
    /// IP address to ban.
    pub ip_address: String,
    /// Reason.
    pub reason: String,
    /// Expiry timestamp.
    pub expires_at: Option<String>,
    /// Issuing staff member.
    pub banned_by: Option<i64>,
}

impl NewBan {
    /// Create a new permanent ban.
    pub fn new(ip_address: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            ip_address: ip_address.into(),
            reason: reason.into(),
            expires_at: None,
            banned_by: None,
        }
    }

    /// Expire the ban `hours` from now.
    ///
    /// `hours` must be within `1..=MAX_BAN_HOURS`.
    pub fn with_duration_hours(mut self, hours: i64) -> Result<Self> {
        if !(1..=MAX_BAN_HOURS).contains(&hours) {
            return Err(ChanError::Validation(format!(
                "ban duration must be 1-{MAX_BAN_HOURS} hours"
            )));
        }
        let expires = Duration::try_hours(hours)
            .and_then(|d| Utc::now().checked_add_signed(d))
            .ok_or_else(|| ChanError::Validation("ban expiry is out of range".to_string()))?;
        self.expires_at = Some(expires.format(TIMESTAMP_FORMAT).to_string());
        Ok(self)
    }

    /// Set an explicit expiry timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub fn with_expires_at(mut self, expires_at: impl Into<String>) -> Self {
        self.expires_at = Some(expires_at.into());
        self
    }

    /// Record the issuing staff member.
    pub fn with_banned_by(mut self, user_id: i64) -> Self {
        self.banned_by = Some(user_id);
        self
    }
}

const BAN_COLUMNS: &str =
    "id, ip_address, reason, expires_at, is_active, banned_by, created_at";

/// Repository for the `bans` table.
pub struct BanRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BanRepository<'a> {
    /// Create a new BanRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new ban.
    pub async fn create(&self, new_ban: &NewBan) -> Result<Ban> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO bans (ip_address, reason, expires_at, banned_by)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&new_ban.ip_address)
        .bind(&new_ban.reason)
        .bind(&new_ban.expires_at)
        .bind(new_ban.banned_by)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("ban".to_string()))
    }

    /// Get a ban by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Ban>> {
        let sql = format!("SELECT {BAN_COLUMNS} FROM bans WHERE id = $1");
        let ban = sqlx::query_as::<_, Ban>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(ban)
    }

    /// List bans currently in force, newest first.
    pub async fn list_active(&self) -> Result<Vec<Ban>> {
        let sql = format!(
            "SELECT {BAN_COLUMNS} FROM bans
             WHERE is_active = {SQL_TRUE} AND (expires_at IS NULL OR expires_at > {SQL_NOW})
             ORDER BY id DESC"
        );
        let bans = sqlx::query_as::<_, Ban>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(bans)
    }

    /// List every ban, newest first.
    pub async fn list_all(&self) -> Result<Vec<Ban>> {
        let sql = format!("SELECT {BAN_COLUMNS} FROM bans ORDER BY id DESC");
        let bans = sqlx::query_as::<_, Ban>(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(bans)
    }

    /// Find the ban in force for an IP address, if any.
    ///
    /// Permanent bans take precedence, then the one expiring last.
    pub async fn active_for_ip(&self, ip_address: &str) -> Result<Option<Ban>> {
        let sql = format!(
            "SELECT {BAN_COLUMNS} FROM bans
             WHERE ip_address = $1 AND is_active = {SQL_TRUE}
               AND (expires_at IS NULL OR expires_at > {SQL_NOW})
             ORDER BY expires_at IS NULL DESC, expires_at DESC
             LIMIT 1"
        );
        let ban = sqlx::query_as::<_, Ban>(&sql)
            .bind(ip_address)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(ban)
    }

    /// Lift a ban. Returns false if the ban does not exist.
    pub async fn lift(&self, id: i64) -> Result<bool> {
        let sql = format!("UPDATE bans SET is_active = {SQL_FALSE} WHERE id = $1");
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Deactivate bans whose expiry has passed.
    ///
    /// Returns the number of bans deactivated.
    pub async fn expire_stale(&self) -> Result<u64> {
        let sql = format!(
            "UPDATE bans SET is_active = {SQL_FALSE}
             WHERE is_active = {SQL_TRUE} AND expires_at IS NOT NULL AND expires_at <= {SQL_NOW}"
        );
        let result = sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

/// Ban enforcement for posting.
pub struct BanCheck<'a> {
    pool: &'a DbPool,
}

impl<'a> BanCheck<'a> {
    /// Create a new ban check over the given pool.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Fail with `ChanError::Banned` if the address is banned.
    pub async fn check(&self, ip_address: &str) -> Result<()> {
        match BanRepository::new(self.pool).active_for_ip(ip_address).await? {
            Some(ban) => {
                tracing::info!(ip = %ip_address, ban_id = ban.id, "Rejected post from banned address");
                Err(ChanError::Banned {
                    reason: ban.reason,
                    expires_at: ban.expires_at,
                })
            }
            None => Ok(()),
        }
    }

    /// The ban in force for an address, if any.
    pub async fn status(&self, ip_address: &str) -> Result<Option<Ban>> {
        BanRepository::new(self.pool).active_for_ip(ip_address).await
    }
}
