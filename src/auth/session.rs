//! Admin login sessions.
//!
//! This module provides session tokens, login/logout functionality,
//! and login attempt rate limiting. Tokens are random UUIDs handed to the
//! client; only their SHA-256 digest is stored.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::Utc;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::db::{
    Database, NewSession, SessionRepository, User, UserRepository, TIMESTAMP_FORMAT,
};
use crate::{ChanError, Result};

/// Session-related errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Invalid credentials (wrong username or password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account is locked due to too many failed attempts.
    #[error("account locked for {0} seconds")]
    AccountLocked(u64),

    /// Session has expired or does not exist.
    #[error("session expired")]
    SessionExpired,

    /// Account is inactive.
    #[error("account is inactive")]
    AccountInactive,
}

impl From<SessionError> for ChanError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::AccountLocked(secs) => ChanError::RateLimited(secs),
            _ => ChanError::Auth(e.to_string()),
        }
    }
}

/// Maximum login attempts before lockout.
pub const MAX_LOGIN_ATTEMPTS: u32 = 5;

/// Lockout duration (5 minutes).
pub const LOCKOUT_DURATION_SECS: u64 = 5 * 60;

/// Result of a login attempt rate limit check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LimitResult {
    /// Login attempt is allowed.
    Allowed,
    /// Account is locked for the specified duration.
    Locked(Duration),
}

/// Login attempt rate limiter.
///
/// Tracks failed login attempts per username and enforces lockout
/// after too many failures.
#[derive(Debug)]
pub struct LoginLimiter {
    /// Failed attempts per lowercased username.
    attempts: HashMap<String, Vec<Instant>>,
    max_attempts: u32,
    window: Duration,
    lockout: Duration,
}

impl Default for LoginLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginLimiter {
    /// Create a new limiter with default settings.
    pub fn new() -> Self {
        Self::with_config(MAX_LOGIN_ATTEMPTS, LOCKOUT_DURATION_SECS, LOCKOUT_DURATION_SECS)
    }

    /// Create a limiter with custom settings.
    pub fn with_config(max_attempts: u32, window_secs: u64, lockout_secs: u64) -> Self {
        Self {
            attempts: HashMap::new(),
            max_attempts,
            window: Duration::from_secs(window_secs),
            lockout: Duration::from_secs(lockout_secs),
        }
    }

    /// Check if a login attempt is allowed for the given username.
    pub fn check(&mut self, username: &str) -> LimitResult {
        let now = Instant::now();
        let attempts = self.attempts.entry(username.to_lowercase()).or_default();

        attempts.retain(|t| now.duration_since(*t) < self.window);

        if attempts.len() >= self.max_attempts as usize {
            if let Some(oldest) = attempts.first() {
                let elapsed = now.duration_since(*oldest);
                if elapsed < self.lockout {
                    return LimitResult::Locked(self.lockout - elapsed);
                }
                attempts.clear();
            }
        }

        LimitResult::Allowed
    }

    /// Record a failed login attempt.
    pub fn record_failure(&mut self, username: &str) {
        let now = Instant::now();
        let attempts = self.attempts.entry(username.to_lowercase()).or_default();

        attempts.retain(|t| now.duration_since(*t) < self.window);
        attempts.push(now);

        debug!(
            username = %username,
            attempt_count = attempts.len(),
            "Recorded failed login attempt"
        );
    }

    /// Clear all attempts for a username (call on successful login).
    pub fn clear(&mut self, username: &str) {
        self.attempts.remove(&username.to_lowercase());
    }

    /// Get the number of recent failed attempts for a username.
    pub fn attempt_count(&mut self, username: &str) -> usize {
        let now = Instant::now();
        match self.attempts.get_mut(&username.to_lowercase()) {
            Some(attempts) => {
                attempts.retain(|t| now.duration_since(*t) < self.window);
                attempts.len()
            }
            None => 0,
        }
    }

    /// Drop expired entries.
    pub fn cleanup(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.attempts.retain(|_, attempts| {
            attempts.retain(|t| now.duration_since(*t) < window);
            !attempts.is_empty()
        });
    }
}

/// SHA-256 hex digest of a session token.
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

/// Database-backed admin sessions.
pub struct SessionService<'a> {
    db: &'a Database,
    limiter: &'a Mutex<LoginLimiter>,
    duration_hours: u64,
}

impl<'a> SessionService<'a> {
    /// Create a session service.
    pub fn new(db: &'a Database, limiter: &'a Mutex<LoginLimiter>, duration_hours: u64) -> Self {
        Self {
            db,
            limiter,
            duration_hours,
        }
    }

    /// Log in with a username and password.
    ///
    /// Returns the plain session token and the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<(String, User)> {
        if let LimitResult::Locked(remaining) = self.limiter.lock().await.check(username) {
            warn!(
                username = %username,
                remaining_secs = remaining.as_secs(),
                "Login attempt blocked: account locked"
            );
            return Err(SessionError::AccountLocked(remaining.as_secs().max(1)).into());
        }

        let users = UserRepository::new(self.db.pool());
        let user = match users.get_by_username(username).await? {
            Some(user) => user,
            None => {
                self.limiter.lock().await.record_failure(username);
                warn!(username = %username, "Login failed: user not found");
                return Err(SessionError::InvalidCredentials.into());
            }
        };

        if crate::auth::verify_password(password, &user.password).is_err() {
            self.limiter.lock().await.record_failure(username);
            warn!(username = %username, "Login failed: wrong password");
            return Err(SessionError::InvalidCredentials.into());
        }

        if !user.is_active {
            warn!(username = %username, "Login failed: account inactive");
            return Err(SessionError::AccountInactive.into());
        }

        self.limiter.lock().await.clear(username);

        let token = Uuid::new_v4().to_string();
        let expires_at = Utc::now() + chrono::Duration::hours(self.duration_hours as i64);
        SessionRepository::new(self.db.pool())
            .create(&NewSession {
                user_id: user.id,
                token_hash: hash_token(&token),
                expires_at: expires_at.format(TIMESTAMP_FORMAT).to_string(),
            })
            .await?;
        users.update_last_login(user.id).await?;

        info!(username = %user.username, user_id = user.id, "Login successful");
        Ok((token, user))
    }

    /// Resolve a token to its active user.
    pub async fn authenticate(&self, token: &str) -> Result<User> {
        let session = SessionRepository::new(self.db.pool())
            .get_valid(&hash_token(token))
            .await?
            .ok_or(SessionError::SessionExpired)?;

        let user = UserRepository::new(self.db.pool())
            .get_by_id(session.user_id)
            .await?
            .ok_or(SessionError::SessionExpired)?;

        if !user.is_active {
            return Err(SessionError::AccountInactive.into());
        }
        Ok(user)
    }

    /// End a session. Returns false if the token was unknown.
    pub async fn logout(&self, token: &str) -> Result<bool> {
        let removed = SessionRepository::new(self.db.pool())
            .delete_by_hash(&hash_token(token))
            .await?;
        if removed {
            info!("Session logged out");
        }
        Ok(removed)
    }

    /// Remove expired sessions and stale limiter entries.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        self.limiter.lock().await.cleanup();
        SessionRepository::new(self.db.pool()).cleanup_expired().await
    }
}
