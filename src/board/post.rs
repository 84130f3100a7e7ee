//! Post model for chanboard.
//!
//! A thread is a post without a parent; replies point at the thread's
//! opening post. There is only one level of nesting.

/// Image attachment metadata.
///
/// Only metadata is stored; the image bytes live elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// Original file name as uploaded.
    pub name: String,
    /// Name under which the file is stored.
    pub stored: String,
    /// MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: i64,
    /// Width in pixels.
    pub width: Option<i32>,
    /// Height in pixels.
    pub height: Option<i32>,
}

/// Post entity: a thread opener or a reply.
#[derive(Debug, Clone)]
pub struct Post {
    /// Unique post ID (the post number shown to users).
    pub id: i64,
    /// Board this post belongs to.
    pub board_id: i64,
    /// Thread opener ID for replies, None for thread openers.
    pub parent_id: Option<i64>,
    /// Poster name.
    pub name: String,
    /// Subject line.
    pub subject: Option<String>,
    /// Raw message text with markup.
    pub message: String,
    /// Attached image metadata.
    pub image: Option<ImageInfo>,
    /// Poster IP address.
    pub ip_address: String,
    /// Thread is pinned to the top of the board.
    pub is_pinned: bool,
    /// Thread no longer accepts replies.
    pub is_locked: bool,
    /// Soft-deleted by a moderator.
    pub is_deleted: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last bump timestamp (only meaningful for thread openers).
    pub bumped_at: String,
}

impl Post {
    /// Check if this post opens a thread.
    pub fn is_thread(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if this post is a reply.
    pub fn is_reply(&self) -> bool {
        self.parent_id.is_some()
    }

    /// ID of the thread this post belongs to.
    pub fn thread_id(&self) -> i64 {
        self.parent_id.unwrap_or(self.id)
    }
}

/// Data for inserting a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Board ID.
    pub board_id: i64,
    /// Thread opener ID for replies.
    pub parent_id: Option<i64>,
    /// Poster name.
    pub name: String,
    /// Subject line.
    pub subject: Option<String>,
    /// Raw message text.
    pub message: String,
    /// Attached image metadata.
    pub image: Option<ImageInfo>,
    /// Poster IP address.
    pub ip_address: String,
}

impl NewPost {
    /// Create a new thread opener.
    pub fn thread(
        board_id: i64,
        name: impl Into<String>,
        message: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            board_id,
            parent_id: None,
            name: name.into(),
            subject: None,
            message: message.into(),
            image: None,
            ip_address: ip_address.into(),
        }
    }

    /// Create a new reply to the given thread.
    pub fn reply(
        board_id: i64,
        thread_id: i64,
        name: impl Into<String>,
        message: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        Self {
            parent_id: Some(thread_id),
            ..Self::thread(board_id, name, message, ip_address)
        }
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Attach image metadata.
    pub fn with_image(mut self, image: ImageInfo) -> Self {
        self.image = Some(image);
        self
    }
}

/// Moderation flag updates for a post.
#[derive(Debug, Clone, Default)]
pub struct PostFlags {
    /// New pinned state.
    pub is_pinned: Option<bool>,
    /// New locked state.
    pub is_locked: Option<bool>,
    /// New deleted state.
    pub is_deleted: Option<bool>,
}

impl PostFlags {
    /// Create an empty flag update.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set pinned state.
    pub fn pinned(mut self, pinned: bool) -> Self {
        self.is_pinned = Some(pinned);
        self
    }

    /// Set locked state.
    pub fn locked(mut self, locked: bool) -> Self {
        self.is_locked = Some(locked);
        self
    }

    /// Set deleted state.
    pub fn deleted(mut self, deleted: bool) -> Self {
        self.is_deleted = Some(deleted);
        self
    }

    /// Check if any flag is set.
    pub fn is_empty(&self) -> bool {
        self.is_pinned.is_none() && self.is_locked.is_none() && self.is_deleted.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(parent_id: Option<i64>) -> Post {
        Post {
            id: 7,
            board_id: 1,
            parent_id,
            name: "Anonymous".to_string(),
            subject: None,
            message: "hello".to_string(),
            image: None,
            ip_address: "127.0.0.1".to_string(),
            is_pinned: false,
            is_locked: false,
            is_deleted: false,
            created_at: "2024-01-01 00:00:00".to_string(),
            bumped_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_thread_and_reply() {
        let op = post(None);
        assert!(op.is_thread());
        assert_eq!(op.thread_id(), 7);

        let reply = post(Some(3));
        assert!(reply.is_reply());
        assert_eq!(reply.thread_id(), 3);
    }

    #[test]
    fn test_new_reply_keeps_fields() {
        let reply = NewPost::reply(1, 5, "Anonymous", "text", "10.0.0.1").with_subject("re");
        assert_eq!(reply.parent_id, Some(5));
        assert_eq!(reply.board_id, 1);
        assert_eq!(reply.subject.as_deref(), Some("re"));
        assert_eq!(reply.ip_address, "10.0.0.1");
    }

    #[test]
    fn test_post_flags() {
        assert!(PostFlags::new().is_empty());
        let flags = PostFlags::new().pinned(true).locked(false);
        assert_eq!(flags.is_pinned, Some(true));
        assert_eq!(flags.is_locked, Some(false));
        assert!(flags.is_deleted.is_none());
    }
}
