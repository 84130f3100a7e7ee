//! Response DTOs for the JSON API.

use serde::Serialize;

use crate::board::{Board, CatalogEntry, ImageInfo, Post, ThreadPreview, ThreadView};
use crate::db::{Setting, User};
use crate::markup::format_message;
use crate::moderation::{Ban, Report};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paginated response wrapper.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: u32, per_page: u32, total: u64, total_pages: u32) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page,
                per_page,
                total,
                total_pages,
            },
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    /// Current page number, 1-based.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items.
    pub total: u64,
    /// Number of pages, never less than 1.
    pub total_pages: u32,
}

/// Count of rows affected by a bulk operation.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

// ============================================================================
// Board DTOs
// ============================================================================

/// Board.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub id: i64,
    pub short_id: String,
    pub name: String,
    /// Display title, e.g. `/g/ - Technology`.
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category: String,
    pub nsfw: bool,
    pub max_file_size: i64,
    pub allowed_file_types: Vec<String>,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: String,
}

impl From<Board> for BoardResponse {
    fn from(b: Board) -> Self {
        Self {
            title: b.title(),
            allowed_file_types: b.allowed_types(),
            id: b.id,
            short_id: b.short_id,
            name: b.name,
            description: b.description,
            category: b.category,
            nsfw: b.nsfw,
            max_file_size: b.max_file_size,
            sort_order: b.sort_order,
            is_active: b.is_active,
            created_at: b.created_at,
        }
    }
}

/// Image metadata.
#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub name: String,
    pub stored: String,
    pub mime: String,
    pub size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
}

impl From<ImageInfo> for ImageResponse {
    fn from(i: ImageInfo) -> Self {
        Self {
            name: i.name,
            stored: i.stored,
            mime: i.mime,
            size: i.size,
            width: i.width,
            height: i.height,
        }
    }
}

/// Public view of a post. The poster's address is never included.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub board_id: i64,
    /// ID of the thread the post belongs to (its own ID for openers).
    pub thread_id: i64,
    pub is_thread: bool,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Raw message text.
    pub message: String,
    /// Escaped and formatted message.
    pub message_html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageResponse>,
    pub is_pinned: bool,
    pub is_locked: bool,
    pub created_at: String,
    pub bumped_at: String,
}

impl From<Post> for PostResponse {
    fn from(p: Post) -> Self {
        Self {
            thread_id: p.thread_id(),
            is_thread: p.is_thread(),
            message_html: format_message(&p.message),
            id: p.id,
            board_id: p.board_id,
            name: p.name,
            subject: p.subject,
            message: p.message,
            image: p.image.map(ImageResponse::from),
            is_pinned: p.is_pinned,
            is_locked: p.is_locked,
            created_at: p.created_at,
            bumped_at: p.bumped_at,
        }
    }
}

/// Staff view of a post.
#[derive(Debug, Serialize)]
pub struct AdminPostResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub ip_address: String,
    pub is_deleted: bool,
}

impl From<Post> for AdminPostResponse {
    fn from(p: Post) -> Self {
        let ip_address = p.ip_address.clone();
        let is_deleted = p.is_deleted;
        Self {
            post: p.into(),
            ip_address,
            is_deleted,
        }
    }
}

/// Thread on a board index page.
#[derive(Debug, Serialize)]
pub struct ThreadPreviewResponse {
    pub op: PostResponse,
    pub reply_count: i64,
    /// Replies not shown in the preview.
    pub omitted: i64,
    pub replies: Vec<PostResponse>,
}

impl From<ThreadPreview> for ThreadPreviewResponse {
    fn from(t: ThreadPreview) -> Self {
        Self {
            op: t.op.into(),
            reply_count: t.reply_count,
            omitted: t.omitted,
            replies: t.replies.into_iter().map(PostResponse::from).collect(),
        }
    }
}

/// Catalog entry.
#[derive(Debug, Serialize)]
pub struct CatalogEntryResponse {
    pub op: PostResponse,
    pub reply_count: i64,
}

impl From<CatalogEntry> for CatalogEntryResponse {
    fn from(e: CatalogEntry) -> Self {
        Self {
            op: e.op.into(),
            reply_count: e.reply_count,
        }
    }
}

/// Board catalog.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub board: BoardResponse,
    pub threads: Vec<CatalogEntryResponse>,
}

/// Full thread.
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub board: BoardResponse,
    pub op: PostResponse,
    pub replies: Vec<PostResponse>,
}

impl From<ThreadView> for ThreadResponse {
    fn from(t: ThreadView) -> Self {
        Self {
            board: t.board.into(),
            op: t.op.into(),
            replies: t.replies.into_iter().map(PostResponse::from).collect(),
        }
    }
}

// ============================================================================
// Moderation DTOs
// ============================================================================

/// Ban status of the calling address.
#[derive(Debug, Serialize)]
pub struct BanStatusResponse {
    pub banned: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Absent for permanent bans.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

impl From<Option<Ban>> for BanStatusResponse {
    fn from(ban: Option<Ban>) -> Self {
        match ban {
            Some(ban) => Self {
                banned: true,
                reason: Some(ban.reason),
                expires_at: ban.expires_at,
            },
            None => Self {
                banned: false,
                reason: None,
                expires_at: None,
            },
        }
    }
}

/// Report as seen by the reporter.
#[derive(Debug, Serialize)]
pub struct ReportCreatedResponse {
    pub id: i64,
    pub post_id: i64,
    pub reason: String,
    pub created_at: String,
}

impl From<Report> for ReportCreatedResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            post_id: r.post_id,
            reason: r.reason.as_str().to_string(),
            created_at: r.created_at,
        }
    }
}

/// Report as seen by staff.
#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub id: i64,
    pub post_id: i64,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub reporter_ip: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<i64>,
    pub created_at: String,
}

impl From<Report> for ReportResponse {
    fn from(r: Report) -> Self {
        Self {
            id: r.id,
            post_id: r.post_id,
            reason: r.reason.as_str().to_string(),
            details: r.details,
            reporter_ip: r.reporter_ip,
            status: r.status.as_str().to_string(),
            resolved_by: r.resolved_by,
            created_at: r.created_at,
        }
    }
}

/// Ban as seen by staff.
#[derive(Debug, Serialize)]
pub struct BanResponse {
    pub id: i64,
    pub ip_address: String,
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    pub is_permanent: bool,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banned_by: Option<i64>,
    pub created_at: String,
}

impl From<Ban> for BanResponse {
    fn from(b: Ban) -> Self {
        Self {
            is_permanent: b.is_permanent(),
            id: b.id,
            ip_address: b.ip_address,
            reason: b.reason,
            expires_at: b.expires_at,
            is_active: b.is_active,
            banned_by: b.banned_by,
            created_at: b.created_at,
        }
    }
}

/// Result of creating a ban.
#[derive(Debug, Serialize)]
pub struct BanCreatedResponse {
    pub ban: BanResponse,
    /// Posts removed along with the ban.
    pub deleted_posts: u64,
}

// ============================================================================
// Staff DTOs
// ============================================================================

/// Staff account. The password hash is never included.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            role: u.role.as_str().to_string(),
            is_active: u.is_active,
            created_at: u.created_at,
            last_login: u.last_login,
        }
    }
}

/// Login response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Session token, also set as the `chan_session` cookie.
    pub token: String,
    /// Session lifetime in seconds.
    pub expires_in: u64,
    pub user: UserResponse,
}

/// Site setting.
#[derive(Debug, Serialize)]
pub struct SettingResponse {
    pub key: String,
    pub value: String,
}

impl From<Setting> for SettingResponse {
    fn from(s: Setting) -> Self {
        Self {
            key: s.key,
            value: s.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(parent_id: Option<i64>, message: &str) -> Post {
        Post {
            id: 7,
            board_id: 1,
            parent_id,
            name: "Anonymous".to_string(),
            subject: None,
            message: message.to_string(),
            image: None,
            ip_address: "10.0.0.1".to_string(),
            is_pinned: false,
            is_locked: false,
            is_deleted: false,
            created_at: "2024-01-01 00:00:00".to_string(),
            bumped_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_post_response_hides_ip_and_formats() {
        let response = PostResponse::from(post(Some(3), "<b>hi</b>"));
        assert_eq!(response.thread_id, 3);
        assert!(!response.is_thread);
        assert!(response.message_html.contains("&lt;b&gt;"));

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("ip_address").is_none());
    }

    #[test]
    fn test_admin_post_response_includes_ip() {
        let json = serde_json::to_value(AdminPostResponse::from(post(None, "op"))).unwrap();
        assert_eq!(json["ip_address"], "10.0.0.1");
        assert_eq!(json["thread_id"], 7);
        assert_eq!(json["is_deleted"], false);
    }

    #[test]
    fn test_ban_status_response() {
        let json = serde_json::to_value(BanStatusResponse::from(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "banned": false }));
    }

    #[test]
    fn test_paginated_response() {
        let response = PaginatedResponse::new(vec![1, 2], 1, 2, 5, 3);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["meta"]["total_pages"], 3);
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }
}
