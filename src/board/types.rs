//! Board model for chanboard.

use crate::{ChanError, Result};

/// Default upload size limit per board (4 MiB).
pub const DEFAULT_MAX_FILE_SIZE: i64 = 4 * 1024 * 1024;

/// MIME types accepted by a board unless configured otherwise.
pub const DEFAULT_ALLOWED_FILE_TYPES: &str = "image/jpeg,image/png,image/gif,image/webp";

/// Maximum length of a board short ID.
pub const MAX_SHORT_ID_LENGTH: usize = 16;

/// Topic board such as `/g/ - Technology`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Unique board ID.
    pub id: i64,
    /// URL slug, unique (e.g. `g`).
    pub short_id: String,
    /// Display name (e.g. `Technology`).
    pub name: String,
    /// Board description.
    pub description: Option<String>,
    /// Category used to group boards on the front page.
    pub category: String,
    /// Whether the board is not safe for work.
    pub nsfw: bool,
    /// Maximum attachment size in bytes.
    pub max_file_size: i64,
    /// Comma-separated list of accepted MIME types.
    pub allowed_file_types: String,
    /// Display order (ascending).
    pub sort_order: i32,
    /// Whether the board is visible and accepts posts.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: String,
}

impl Board {
    /// Human-readable title, e.g. `/g/ - Technology`.
    pub fn title(&self) -> String {
        format!("/{}/ - {}", self.short_id, self.name)
    }

    /// Check whether an attachment MIME type is accepted by this board.
    pub fn accepts_mime(&self, mime: &str) -> bool {
        self.allowed_file_types
            .split(',')
            .map(str::trim)
            .any(|allowed| allowed.eq_ignore_ascii_case(mime))
    }

    /// The accepted MIME types as a list.
    pub fn allowed_types(&self) -> Vec<String> {
        self.allowed_file_types
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Validate a board short ID: 1-16 lowercase ASCII letters or digits.
pub fn validate_short_id(short_id: &str) -> Result<()> {
    if short_id.is_empty() || short_id.len() > MAX_SHORT_ID_LENGTH {
        return Err(ChanError::Validation(format!(
            "board id must be 1-{MAX_SHORT_ID_LENGTH} characters"
        )));
    }
    if !short_id
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(ChanError::Validation(
            "board id may only contain lowercase letters and digits".to_string(),
        ));
    }
    Ok(())
}

/// Data for creating a new board.
#[derive(Debug, Clone)]
pub struct NewBoard {
    /// URL slug.
    pub short_id: String,
    /// Display name.
    pub name: String,
    /// Board description.
    pub description: Option<String>,
    /// Category.
    pub category: String,
    /// NSFW flag.
    pub nsfw: bool,
    /// Maximum attachment size in bytes.
    pub max_file_size: i64,
    /// Comma-separated accepted MIME types.
    pub allowed_file_types: String,
    /// Display order.
    pub sort_order: i32,
}

impl NewBoard {
    /// Create a new board with default settings.
    pub fn new(short_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            short_id: short_id.into(),
            name: name.into(),
            description: None,
            category: "General".to_string(),
            nsfw: false,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            allowed_file_types: DEFAULT_ALLOWED_FILE_TYPES.to_string(),
            sort_order: 0,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the NSFW flag.
    pub fn with_nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = nsfw;
        self
    }

    /// Set the maximum attachment size.
    pub fn with_max_file_size(mut self, bytes: i64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the accepted MIME types.
    pub fn with_allowed_file_types(mut self, types: impl Into<String>) -> Self {
        self.allowed_file_types = types.into();
        self
    }

    /// Set the display order.
    pub fn with_sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = sort_order;
        self
    }
}

/// Data for updating an existing board.
#[derive(Debug, Clone, Default)]
pub struct BoardUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New category.
    pub category: Option<String>,
    /// New NSFW flag.
    pub nsfw: Option<bool>,
    /// New maximum attachment size.
    pub max_file_size: Option<i64>,
    /// New accepted MIME types.
    pub allowed_file_types: Option<String>,
    /// New display order.
    pub sort_order: Option<i32>,
    /// New active status.
    pub is_active: Option<bool>,
}

impl BoardUpdate {
    /// Create an empty update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set new name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set new description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Set new category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set new NSFW flag.
    pub fn nsfw(mut self, nsfw: bool) -> Self {
        self.nsfw = Some(nsfw);
        self
    }

    /// Set new maximum attachment size.
    pub fn max_file_size(mut self, bytes: i64) -> Self {
        self.max_file_size = Some(bytes);
        self
    }

    /// Set new accepted MIME types.
    pub fn allowed_file_types(mut self, types: impl Into<String>) -> Self {
        self.allowed_file_types = Some(types.into());
        self
    }

    /// Set new display order.
    pub fn sort_order(mut self, sort_order: i32) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Set active status.
    pub fn is_active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Check if any fields are set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.nsfw.is_none()
            && self.max_file_size.is_none()
            && self.allowed_file_types.is_none()
            && self.sort_order.is_none()
            && self.is_active.is_none()
    }
}
