//! Authentication module for chanboard.
//!
//! This module provides password hashing, role checks and database-backed
//! admin login sessions.

mod password;
mod permission;
mod session;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use permission::{check_permission, require_admin, require_moderator, PermissionError};
pub use session::{
    hash_token, LimitResult, LoginLimiter, SessionError, SessionService, LOCKOUT_DURATION_SECS,
    MAX_LOGIN_ATTEMPTS,
};
