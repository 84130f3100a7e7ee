//! Admin session repository.
//!
//! Only the SHA-256 hash of a session token is stored; the plain token
//! lives with the client.

use super::{DbPool, SQL_NOW};
use crate::{ChanError, Result};

/// Stored admin session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    /// Session ID.
    pub id: i64,
    /// Owning user ID.
    pub user_id: i64,
    /// SHA-256 hex digest of the token.
    pub token_hash: String,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// New session for creation.
pub struct NewSession {
    /// Owning user ID.
    pub user_id: i64,
    /// SHA-256 hex digest of the token.
    pub token_hash: String,
    /// Expiration timestamp (`YYYY-MM-DD HH:MM:SS`, UTC).
    pub expires_at: String,
}

/// Repository for session operations.
pub struct SessionRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SessionRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Store a new session.
    pub async fn create(&self, new_session: &NewSession) -> Result<Session> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sessions (user_id, token_hash, expires_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(new_session.user_id)
        .bind(&new_session.token_hash)
        .bind(&new_session.expires_at)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        let session = sqlx::query_as::<_, Session>(
            "SELECT id, user_id, token_hash, expires_at, created_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        session.ok_or_else(|| ChanError::NotFound("session".to_string()))
    }

    /// Get a non-expired session by token hash.
    pub async fn get_valid(&self, token_hash: &str) -> Result<Option<Session>> {
        let sql = format!(
            "SELECT id, user_id, token_hash, expires_at, created_at
             FROM sessions
             WHERE token_hash = $1 AND expires_at > {SQL_NOW}"
        );
        let session = sqlx::query_as::<_, Session>(&sql)
            .bind(token_hash)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(session)
    }

    /// Delete a session by token hash.
    pub async fn delete_by_hash(&self, token_hash: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session of a user.
    pub async fn delete_for_user(&self, user_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Delete expired sessions.
    ///
    /// Returns the number of deleted rows.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let sql = format!("DELETE FROM sessions WHERE expires_at <= {SQL_NOW}");
        let result = sqlx::query(&sql)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }
}
