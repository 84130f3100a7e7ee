//! Error types for chanboard.

use thiserror::Error;

/// Common error type for chanboard.
#[derive(Error, Debug)]
pub enum ChanError {
    /// Database error.
    ///
    /// Errors from sqlx are converted into this variant.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication error.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Resource already exists or conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The client IP is banned.
    #[error("banned: {reason}")]
    Banned {
        /// Reason given by the moderator.
        reason: String,
        /// Expiry timestamp, `None` for permanent bans.
        expires_at: Option<String>,
    },

    /// The client is posting too quickly.
    #[error("rate limited: retry in {0} seconds")]
    RateLimited(u64),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ChanError {
    fn from(e: sqlx::Error) -> Self {
        ChanError::Database(e.to_string())
    }
}

/// Result type alias for chanboard operations.
pub type Result<T> = std::result::Result<T, ChanError>;
