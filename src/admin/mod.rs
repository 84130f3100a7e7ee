//! Administration module for chanboard.
//!
//! This module provides administrative functionality including:
//! - Board management (create, update, delete, reorder)
//! - Post moderation (delete, restore, pin, lock, per-IP cleanup)
//! - Bans and reports
//! - Staff account management
//! - Site settings
//!
//! Access is controlled by role:
//! - Moderator: content, bans, reports and board edits
//! - Admin: additionally board deletion, users and settings

mod ban;
mod board;
mod content;
mod report;
mod settings;
mod user;

pub use ban::{BanAdminService, BanRequest};
pub use board::BoardAdminService;
pub use content::{ContentAdminService, PostDeletionMode};
pub use report::ReportAdminService;
pub use settings::SettingsAdminService;
pub use user::{ensure_bootstrap_admin, validate_username, UserAdminService, UserChanges};

use thiserror::Error;

use crate::auth::PermissionError;
use crate::ChanError;

/// Admin-related errors.
#[derive(Error, Debug)]
pub enum AdminError {
    /// Permission denied for the operation.
    #[error("{0}")]
    Permission(#[from] PermissionError),

    /// Target resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Invalid operation.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// Target conflicts with existing data.
    #[error("{0}")]
    Conflict(String),

    /// Cannot modify own account in certain ways.
    #[error("cannot perform this action on your own account")]
    CannotModifySelf,

    /// Cannot remove the last active administrator.
    #[error("cannot remove the last active administrator")]
    LastAdmin,

    /// Error from the lower layers.
    #[error("{0}")]
    Chan(#[from] ChanError),
}

impl From<AdminError> for ChanError {
    fn from(e: AdminError) -> Self {
        match e {
            AdminError::Permission(p) => p.into(),
            AdminError::NotFound(what) => ChanError::NotFound(what),
            AdminError::InvalidOperation(msg) => ChanError::Validation(msg),
            AdminError::Conflict(msg) => ChanError::Conflict(msg),
            AdminError::CannotModifySelf | AdminError::LastAdmin => {
                ChanError::Conflict(e.to_string())
            }
            AdminError::Chan(inner) => inner,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Role;

    #[test]
    fn test_admin_error_mapping() {
        assert!(matches!(
            ChanError::from(AdminError::NotFound("board".to_string())),
            ChanError::NotFound(_)
        ));
        assert!(matches!(
            ChanError::from(AdminError::LastAdmin),
            ChanError::Conflict(_)
        ));
        assert!(matches!(
            ChanError::from(AdminError::Permission(PermissionError::InsufficientRole(
                Role::Admin
            ))),
            ChanError::Permission(_)
        ));
        assert!(matches!(
            ChanError::from(AdminError::InvalidOperation("x".to_string())),
            ChanError::Validation(_)
        ));
    }
}
