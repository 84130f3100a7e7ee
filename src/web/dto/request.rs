//! Request DTOs for the JSON API.

use std::collections::BTreeMap;

use serde::Deserialize;
use validator::Validate;

use crate::board::{ImageInfo, NewPostInput};
use crate::db::Role;
use crate::moderation::ReportReason;

use super::validation::{no_control_chars, not_empty_trimmed, sanitize_string};

// ============================================================================
// Public
// ============================================================================

/// Image metadata attached to a post.
///
/// Only metadata is stored; the file itself is handled elsewhere.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageRequest {
    /// Original file name.
    pub name: String,
    /// Name under which the file was stored, defaults to `name`.
    #[serde(default)]
    pub stored: Option<String>,
    /// MIME type, inferred from the name when absent.
    #[serde(default)]
    pub mime: Option<String>,
    /// File size in bytes.
    pub size: i64,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
}

impl From<ImageRequest> for ImageInfo {
    fn from(req: ImageRequest) -> Self {
        ImageInfo {
            stored: req.stored.unwrap_or_default(),
            name: req.name,
            mime: req.mime.unwrap_or_default(),
            size: req.size,
            width: req.width,
            height: req.height,
        }
    }
}

/// New thread or reply.
#[derive(Debug, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Poster name; blank means the site default.
    #[serde(default)]
    #[validate(length(max = 50), custom(function = "no_control_chars"))]
    pub name: Option<String>,
    /// Subject line, threads only.
    #[serde(default)]
    #[validate(length(max = 100), custom(function = "no_control_chars"))]
    pub subject: Option<String>,
    /// Message body.
    #[serde(default)]
    pub message: String,
    /// Options field (`sage`).
    #[serde(default)]
    #[validate(length(max = 32))]
    pub options: Option<String>,
    /// Optional image metadata.
    #[serde(default)]
    pub image: Option<ImageRequest>,
}

impl From<CreatePostRequest> for NewPostInput {
    fn from(req: CreatePostRequest) -> Self {
        NewPostInput {
            name: req.name,
            subject: req.subject,
            message: sanitize_string(&req.message),
            options: req.options,
            image: req.image.map(ImageInfo::from),
        }
    }
}

/// Report against a post.
#[derive(Debug, Deserialize, Validate)]
pub struct ReportRequest {
    pub reason: ReportReason,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub details: Option<String>,
}

/// Page query for board indexes.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_page() -> u32 {
    1
}

// ============================================================================
// Admin
// ============================================================================

/// Staff login.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// New board.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBoardRequest {
    /// Short ID used in URLs, e.g. `g`.
    #[validate(length(min = 1, max = 16))]
    pub short_id: String,
    #[validate(custom(function = "not_empty_trimmed"), length(max = 64))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    #[serde(default)]
    pub nsfw: bool,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_file_size: Option<i64>,
    /// Comma-separated MIME types.
    #[serde(default)]
    pub allowed_file_types: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
}

/// Board changes; absent fields are left alone.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateBoardRequest {
    #[serde(default)]
    #[validate(custom(function = "not_empty_trimmed"), length(max = 64))]
    pub name: Option<String>,
    /// An empty string clears the description.
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub category: Option<String>,
    #[serde(default)]
    pub nsfw: Option<bool>,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub max_file_size: Option<i64>,
    #[serde(default)]
    pub allowed_file_types: Option<String>,
    #[serde(default)]
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// New board order, every board ID exactly once.
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderBoardsRequest {
    #[validate(length(min = 1))]
    pub board_ids: Vec<i64>,
}

/// Post deletion query.
#[derive(Debug, Default, Deserialize)]
pub struct DeletePostQuery {
    /// `soft` (default) or `hard`.
    #[serde(default)]
    pub mode: Option<String>,
}

/// Query selecting posts by address.
#[derive(Debug, Deserialize)]
pub struct IpQuery {
    pub ip: String,
}

/// New ban.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateBanRequest {
    #[validate(custom(function = "not_empty_trimmed"))]
    pub ip_address: String,
    #[validate(custom(function = "not_empty_trimmed"), length(max = 500))]
    pub reason: String,
    /// Ban length in hours; absent for a permanent ban.
    #[serde(default)]
    #[validate(range(min = 1, max = 87_600))]
    pub duration_hours: Option<i64>,
    /// Also delete every post from the address.
    #[serde(default)]
    pub delete_posts: bool,
}

/// Ban list query.
#[derive(Debug, Default, Deserialize)]
pub struct BanListQuery {
    /// Include lifted and expired bans.
    #[serde(default)]
    pub all: bool,
}

/// Report list query.
#[derive(Debug, Default, Deserialize)]
pub struct ReportListQuery {
    /// `open`, `resolved` or `dismissed`; all reports when absent.
    #[serde(default)]
    pub status: Option<String>,
}

/// New staff account.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 32))]
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Account changes; absent fields are left alone.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Settings to write.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(length(min = 1))]
    pub settings: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_post_request_into_input() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "message": "hello\u{0007}",
            "options": "sage",
            "image": { "name": "cat.png", "size": 1024 }
        }))
        .unwrap();
        assert!(req.validate().is_ok());

        let input = NewPostInput::from(req);
        assert_eq!(input.message, "hello");
        assert!(input.is_sage());
        let image = input.image.unwrap();
        assert_eq!(image.name, "cat.png");
        assert!(image.mime.is_empty());
    }

    #[test]
    fn test_create_post_request_rejects_long_name() {
        let req: CreatePostRequest = serde_json::from_value(serde_json::json!({
            "name": "x".repeat(51),
            "message": "hi"
        }))
        .unwrap();
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn test_report_request_reason() {
        let req: ReportRequest =
            serde_json::from_value(serde_json::json!({ "reason": "off_topic" })).unwrap();
        assert_eq!(req.reason, ReportReason::OffTopic);
        assert!(serde_json::from_value::<ReportRequest>(serde_json::json!({ "reason": "meh" }))
            .is_err());
    }

    #[test]
    fn test_ban_request_validation() {
        let req: CreateBanRequest = serde_json::from_value(serde_json::json!({
            "ip_address": "10.0.0.1",
            "reason": "spam",
            "duration_hours": 0
        }))
        .unwrap();
        assert!(req.validate().is_err());
    }
}
