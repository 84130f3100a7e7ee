//! Post repository for chanboard.
//!
//! This module provides CRUD operations for posts in the database.
//! Threads are posts without a parent; replies reference the opener.

use sqlx::QueryBuilder;

use super::post::{ImageInfo, NewPost, Post, PostFlags};
use crate::db::{DbPool, SQL_FALSE, SQL_NOW};
use crate::{ChanError, Result};

const POST_COLUMNS: &str = "id, board_id, parent_id, name, subject, message,
     image_name, image_stored, image_mime, image_size, image_width, image_height,
     ip_address, is_pinned, is_locked, is_deleted, created_at, bumped_at";

/// Ordering used for board indexes and the catalog.
const THREAD_ORDER: &str = "ORDER BY is_pinned DESC, bump_order DESC";

/// Repository for post CRUD operations.
pub struct PostRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new PostRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a new post.
    ///
    /// Thread openers start with `bumped_at = created_at`.
    pub async fn create(&self, new_post: &NewPost) -> Result<Post> {
        let image = new_post.image.as_ref();
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (board_id, parent_id, name, subject, message,
                                image_name, image_stored, image_mime, image_size,
                                image_width, image_height, ip_address)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
        )
        .bind(new_post.board_id)
        .bind(new_post.parent_id)
        .bind(&new_post.name)
        .bind(&new_post.subject)
        .bind(&new_post.message)
        .bind(image.map(|i| i.name.clone()))
        .bind(image.map(|i| i.stored.clone()))
        .bind(image.map(|i| i.mime.clone()))
        .bind(image.map(|i| i.size))
        .bind(image.and_then(|i| i.width))
        .bind(image.and_then(|i| i.height))
        .bind(&new_post.ip_address)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        sqlx::query("UPDATE posts SET bumped_at = created_at, bump_order = id WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("post".to_string()))
    }

    /// Get a post by ID, including soft-deleted posts.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1");
        let row: Option<PostRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(row.map(PostRow::into_post))
    }

    /// List live threads on a board with their live reply counts.
    ///
    /// Pinned threads come first, then threads by most recent bump.
    pub async fn list_threads(
        &self,
        board_id: i64,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<(Post, i64)>> {
        let sql = format!(
            "SELECT {POST_COLUMNS},
                    (SELECT COUNT(*) FROM posts r
                     WHERE r.parent_id = posts.id AND r.is_deleted = {SQL_FALSE}) AS reply_count
             FROM posts
             WHERE board_id = $1 AND parent_id IS NULL AND is_deleted = {SQL_FALSE}
             {THREAD_ORDER}
             LIMIT $2 OFFSET $3"
        );
        let rows: Vec<ThreadRow> = sqlx::query_as(&sql)
            .bind(board_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows
            .into_iter()
            .map(|row| (row.post.into_post(), row.reply_count))
            .collect())
    }

    /// List every live thread on a board with reply counts (catalog view).
    pub async fn list_all_threads(&self, board_id: i64) -> Result<Vec<(Post, i64)>> {
        self.list_threads(board_id, 0, -1).await
    }

    /// Count live threads on a board.
    pub async fn count_threads(&self, board_id: i64) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM posts
             WHERE board_id = $1 AND parent_id IS NULL AND is_deleted = {SQL_FALSE}"
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(board_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// List live replies in a thread, oldest first.
    pub async fn list_replies(&self, thread_id: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts
             WHERE parent_id = $1 AND is_deleted = {SQL_FALSE}
             ORDER BY id ASC"
        );
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(thread_id)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    /// List the last `limit` live replies in a thread, oldest first.
    pub async fn list_last_replies(&self, thread_id: i64, limit: i64) -> Result<Vec<Post>> {
        let sql = format!(
            "SELECT * FROM (
                 SELECT {POST_COLUMNS} FROM posts
                 WHERE parent_id = $1 AND is_deleted = {SQL_FALSE}
                 ORDER BY id DESC LIMIT $2
             ) ORDER BY id ASC"
        );
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(thread_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    /// Count live replies in a thread.
    pub async fn count_replies(&self, thread_id: i64) -> Result<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM posts WHERE parent_id = $1 AND is_deleted = {SQL_FALSE}"
        );
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(thread_id)
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Bump a thread to the top of its board on behalf of a reply.
    pub async fn bump(&self, thread_id: i64, reply: &Post) -> Result<()> {
        sqlx::query("UPDATE posts SET bumped_at = $1, bump_order = $2 WHERE id = $3")
            .bind(&reply.created_at)
            .bind(reply.id)
            .bind(thread_id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(())
    }

    /// Update moderation flags on a post.
    ///
    /// Returns the updated post, or None if not found.
    pub async fn set_flags(&self, id: i64, flags: &PostFlags) -> Result<Option<Post>> {
        if flags.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE posts SET ");
        let mut separated = query.separated(", ");

        if let Some(pinned) = flags.is_pinned {
            separated.push("is_pinned = ");
            separated.push_bind_unseparated(pinned);
        }
        if let Some(locked) = flags.is_locked {
            separated.push("is_locked = ");
            separated.push_bind_unseparated(locked);
        }
        if let Some(deleted) = flags.is_deleted {
            separated.push("is_deleted = ");
            separated.push_bind_unseparated(deleted);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Permanently delete a post.
    ///
    /// Deleting a thread opener removes its replies through the cascade.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// List every post from an IP address, newest first, including deleted ones.
    pub async fn list_by_ip(&self, ip_address: &str) -> Result<Vec<Post>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE ip_address = $1 ORDER BY id DESC");
        let rows: Vec<PostRow> = sqlx::query_as(&sql)
            .bind(ip_address)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(PostRow::into_post).collect())
    }

    /// Permanently delete every post from an IP address.
    ///
    /// Returns the number of rows removed directly (cascaded replies are
    /// not counted).
    pub async fn delete_by_ip(&self, ip_address: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM posts WHERE ip_address = $1")
            .bind(ip_address)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected())
    }

    /// Seconds elapsed since the most recent post from an IP address.
    ///
    /// Returns None if the address has never posted.
    pub async fn seconds_since_last_post(&self, ip_address: &str) -> Result<Option<i64>> {
        let sql = format!(
            "SELECT CAST(strftime('%s', {SQL_NOW}) - strftime('%s', MAX(created_at)) AS INTEGER)
             FROM posts WHERE ip_address = $1"
        );
        let elapsed: Option<i64> = sqlx::query_scalar(&sql)
            .bind(ip_address)
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(elapsed)
    }

    /// Delete the oldest non-pinned threads so that at most `keep` live
    /// threads remain on the board.
    ///
    /// The thread `spare` is never removed, even when pinned threads alone
    /// fill the cap. Returns the IDs of the removed thread openers.
    pub async fn prune_threads(&self, board_id: i64, keep: i64, spare: i64) -> Result<Vec<i64>> {
        let sql = format!(
            "SELECT id FROM (
                 SELECT id, is_pinned FROM posts
                 WHERE board_id = $1 AND parent_id IS NULL AND is_deleted = {SQL_FALSE}
                 {THREAD_ORDER}
                 LIMIT -1 OFFSET $2
             ) WHERE is_pinned = {SQL_FALSE} AND id != $3"
        );
        let ids: Vec<i64> = sqlx::query_scalar(&sql)
            .bind(board_id)
            .bind(keep)
            .bind(spare)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        for id in &ids {
            self.delete(*id).await?;
        }

        Ok(ids)
    }
}

/// Internal struct for mapping database rows to Post.
#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    board_id: i64,
    parent_id: Option<i64>,
    name: String,
    subject: Option<String>,
    message: String,
    image_name: Option<String>,
    image_stored: Option<String>,
    image_mime: Option<String>,
    image_size: Option<i64>,
    image_width: Option<i32>,
    image_height: Option<i32>,
    ip_address: String,
    is_pinned: bool,
    is_locked: bool,
    is_deleted: bool,
    created_at: String,
    bumped_at: String,
}

impl PostRow {
    fn into_post(self) -> Post {
        let image = match (self.image_name, self.image_stored, self.image_mime) {
            (Some(name), Some(stored), Some(mime)) => Some(ImageInfo {
                name,
                stored,
                mime,
                size: self.image_size.unwrap_or(0),
                width: self.image_width,
                height: self.image_height,
            }),
            _ => None,
        };

        Post {
            id: self.id,
            board_id: self.board_id,
            parent_id: self.parent_id,
            name: self.name,
            subject: self.subject,
            message: self.message,
            image,
            ip_address: self.ip_address,
            is_pinned: self.is_pinned,
            is_locked: self.is_locked,
            is_deleted: self.is_deleted,
            created_at: self.created_at,
            bumped_at: self.bumped_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ThreadRow {
    #[sqlx(flatten)]
    post: PostRow,
    reply_count: i64,
}
