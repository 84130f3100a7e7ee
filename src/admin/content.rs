//! Post moderation for staff.
//!
//! This module provides administrative functions for managing posts:
//! - Soft delete (hide) and restore posts
//! - Hard delete posts (replies and reports go with them)
//! - Pin and lock threads
//! - Review and purge everything posted from an IP address

use std::str::FromStr;

use tracing::info;

use crate::auth::require_moderator;
use crate::board::{Post, PostFlags, PostRepository};
use crate::db::{DbPool, User};

use super::AdminError;

/// Deletion mode for posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostDeletionMode {
    /// Soft delete: hide the post but keep the row.
    #[default]
    Soft,
    /// Hard delete: physically delete the post.
    Hard,
}

impl FromStr for PostDeletionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "soft" => Ok(PostDeletionMode::Soft),
            "hard" => Ok(PostDeletionMode::Hard),
            _ => Err(format!("unknown deletion mode: {s}")),
        }
    }
}

/// Admin service for content management.
pub struct ContentAdminService<'a> {
    pool: &'a DbPool,
}

impl<'a> ContentAdminService<'a> {
    /// Create a new ContentAdminService.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Get a post by ID, including deleted posts.
    pub async fn get_post(&self, post_id: i64, admin: &User) -> Result<Post, AdminError> {
        require_moderator(Some(admin))?;
        self.find(post_id).await
    }

    /// Delete a post.
    pub async fn delete_post(
        &self,
        post_id: i64,
        mode: PostDeletionMode,
        admin: &User,
    ) -> Result<(), AdminError> {
        require_moderator(Some(admin))?;

        let repo = PostRepository::new(self.pool);
        self.find(post_id).await?;

        match mode {
            PostDeletionMode::Soft => {
                repo.set_flags(post_id, &PostFlags::new().deleted(true))
                    .await?;
            }
            PostDeletionMode::Hard => {
                repo.delete(post_id).await?;
            }
        }

        info!(post_id, mode = ?mode, admin = %admin.username, "Post deleted");
        Ok(())
    }

    /// Restore a soft-deleted post.
    pub async fn restore_post(&self, post_id: i64, admin: &User) -> Result<Post, AdminError> {
        self.apply_flags(post_id, PostFlags::new().deleted(false), false, admin)
            .await
    }

    /// Pin or unpin a thread.
    pub async fn set_pinned(
        &self,
        thread_id: i64,
        pinned: bool,
        admin: &User,
    ) -> Result<Post, AdminError> {
        self.apply_flags(thread_id, PostFlags::new().pinned(pinned), true, admin)
            .await
    }

    /// Lock or unlock a thread.
    pub async fn set_locked(
        &self,
        thread_id: i64,
        locked: bool,
        admin: &User,
    ) -> Result<Post, AdminError> {
        self.apply_flags(thread_id, PostFlags::new().locked(locked), true, admin)
            .await
    }

    /// List every post from an IP address, including deleted ones.
    pub async fn list_posts_by_ip(
        &self,
        ip_address: &str,
        admin: &User,
    ) -> Result<Vec<Post>, AdminError> {
        require_moderator(Some(admin))?;
        Ok(PostRepository::new(self.pool).list_by_ip(ip_address).await?)
    }

    /// Permanently delete every post from an IP address.
    pub async fn delete_posts_by_ip(&self, ip_address: &str, admin: &User) -> Result<u64, AdminError> {
        require_moderator(Some(admin))?;
        let count = PostRepository::new(self.pool)
            .delete_by_ip(ip_address)
            .await?;
        info!(ip = %ip_address, count, admin = %admin.username, "Deleted posts by IP");
        Ok(count)
    }

    async fn find(&self, post_id: i64) -> Result<Post, AdminError> {
        PostRepository::new(self.pool)
            .get_by_id(post_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("post".to_string()))
    }

    async fn apply_flags(
        &self,
        post_id: i64,
        flags: PostFlags,
        thread_only: bool,
        admin: &User,
    ) -> Result<Post, AdminError> {
        require_moderator(Some(admin))?;

        let post = self.find(post_id).await?;
        if thread_only && !post.is_thread() {
            return Err(AdminError::InvalidOperation(
                "only thread openers can be pinned or locked".to_string(),
            ));
        }

        let updated = PostRepository::new(self.pool)
            .set_flags(post_id, &flags)
            .await?
            .ok_or_else(|| AdminError::NotFound("post".to_string()))?;

        info!(post_id, flags = ?flags, admin = %admin.username, "Post flags updated");
        Ok(updated)
    }
}
