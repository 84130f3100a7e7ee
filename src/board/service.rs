//! Board service for chanboard.
//!
//! This module provides the public read and posting operations: board
//! indexes, the catalog, thread views, new threads, replies and reports.

use tracing::{debug, info};

use crate::config::Config;
use crate::db::{Database, SettingsRepository, POSTING_ENABLED};
use crate::moderation::{
    Ban, BanCheck, NewReport, Report, ReportReason, ReportRepository,
};
use crate::{ChanError, Result};

use super::post::{ImageInfo, NewPost, Post};
use super::post_repository::PostRepository;
use super::repository::BoardRepository;
use super::types::Board;

/// Maximum length for subjects (in characters).
pub const MAX_SUBJECT_LENGTH: usize = 100;

/// Maximum length for poster names (in characters).
pub const MAX_NAME_LENGTH: usize = 50;

/// Maximum length for report details (in characters).
pub const MAX_REPORT_DETAILS_LENGTH: usize = 500;

/// Option value that posts without bumping the thread.
const SAGE: &str = "sage";

/// Poster-supplied fields for a new thread or reply.
#[derive(Debug, Clone, Default)]
pub struct NewPostInput {
    /// Poster name; blank falls back to the site default.
    pub name: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Raw message text.
    pub message: String,
    /// Email-style options field (`sage`).
    pub options: Option<String>,
    /// Attached image metadata. An empty MIME type is inferred from the name.
    pub image: Option<ImageInfo>,
}

impl NewPostInput {
    /// Create input with only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Set the poster name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the options field.
    pub fn with_options(mut self, options: impl Into<String>) -> Self {
        self.options = Some(options.into());
        self
    }

    /// Attach image metadata.
    pub fn with_image(mut self, image: ImageInfo) -> Self {
        self.image = Some(image);
        self
    }

    /// Whether the options field asks not to bump.
    pub fn is_sage(&self) -> bool {
        self.options
            .as_deref()
            .is_some_and(|o| o.trim().eq_ignore_ascii_case(SAGE))
    }
}

/// Page of a board index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1-based page number.
    pub page: u32,
    /// Threads per page.
    pub per_page: u32,
}

impl Pagination {
    /// Create pagination for a 1-based page; page 0 is treated as page 1.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Number of items to skip.
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.per_page)
    }

    /// Number of pages needed for `total` items (at least 1).
    pub fn total_pages(&self, total: i64) -> u32 {
        let per_page = i64::from(self.per_page);
        let pages = (total + per_page - 1) / per_page;
        u32::try_from(pages.max(1)).unwrap_or(u32::MAX)
    }
}

/// A thread as shown on a board index page.
#[derive(Debug, Clone)]
pub struct ThreadPreview {
    /// Opening post.
    pub op: Post,
    /// Number of live replies.
    pub reply_count: i64,
    /// Replies not included in the preview.
    pub omitted: i64,
    /// The most recent replies, oldest first.
    pub replies: Vec<Post>,
}

/// One page of a board index.
#[derive(Debug, Clone)]
pub struct BoardIndex {
    pub board: Board,
    pub threads: Vec<ThreadPreview>,
    pub page: u32,
    pub total_pages: u32,
    pub total_threads: i64,
}

/// A catalog entry.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    pub op: Post,
    pub reply_count: i64,
}

/// A full thread.
#[derive(Debug, Clone)]
pub struct ThreadView {
    pub board: Board,
    pub op: Post,
    pub replies: Vec<Post>,
}

/// Service for public board operations.
pub struct BoardService<'a> {
    db: &'a Database,
    config: &'a Config,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService with the given database and configuration.
    pub fn new(db: &'a Database, config: &'a Config) -> Self {
        Self { db, config }
    }

    // ========== Read Operations ==========

    /// List active boards.
    pub async fn list_boards(&self) -> Result<Vec<Board>> {
        BoardRepository::new(self.db.pool()).list_active().await
    }

    /// Get an active board by short ID.
    pub async fn get_board(&self, short_id: &str) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get_by_short_id(short_id)
            .await?
            .filter(|b| b.is_active)
            .ok_or_else(|| ChanError::NotFound("board".to_string()))
    }

    /// Get one page of a board index.
    ///
    /// Pages past the end return no threads with the real page count.
    pub async fn board_index(&self, short_id: &str, page: u32) -> Result<BoardIndex> {
        let board = self.get_board(short_id).await?;
        let posting = &self.config.posting;
        let pagination = Pagination::new(page, posting.threads_per_page);
        let post_repo = PostRepository::new(self.db.pool());

        let total_threads = post_repo.count_threads(board.id).await?;
        let total_pages = pagination.total_pages(total_threads);

        let threads = post_repo
            .list_threads(board.id, pagination.offset(), i64::from(pagination.per_page))
            .await?;

        let mut previews = Vec::with_capacity(threads.len());
        for (op, reply_count) in threads {
            let replies = post_repo
                .list_last_replies(op.id, i64::from(posting.preview_replies))
                .await?;
            let omitted = reply_count - replies.len() as i64;
            previews.push(ThreadPreview {
                op,
                reply_count,
                omitted,
                replies,
            });
        }

        Ok(BoardIndex {
            board,
            threads: previews,
            page: pagination.page,
            total_pages,
            total_threads,
        })
    }

    /// Every live thread on a board, in index order.
    pub async fn catalog(&self, short_id: &str) -> Result<(Board, Vec<CatalogEntry>)> {
        let board = self.get_board(short_id).await?;
        let entries = PostRepository::new(self.db.pool())
            .list_all_threads(board.id)
            .await?
            .into_iter()
            .map(|(op, reply_count)| CatalogEntry { op, reply_count })
            .collect();
        Ok((board, entries))
    }

    /// Get a thread with all live replies.
    pub async fn thread(&self, thread_id: i64) -> Result<ThreadView> {
        let op = self.get_live_thread(thread_id).await?;
        let board = self.get_active_board_by_id(op.board_id).await?;
        let replies = PostRepository::new(self.db.pool())
            .list_replies(op.id)
            .await?;
        Ok(ThreadView { board, op, replies })
    }

    /// Ban in force for an address, if any.
    pub async fn ban_status(&self, ip_address: &str) -> Result<Option<Ban>> {
        BanCheck::new(self.db.pool()).status(ip_address).await
    }

    // ========== Create Operations ==========

    /// Start a new thread on a board.
    pub async fn create_thread(
        &self,
        short_id: &str,
        input: NewPostInput,
        ip_address: &str,
    ) -> Result<Post> {
        let board = self.get_board(short_id).await?;
        let (new_post, _) = self.prepare(&board, None, input, ip_address).await?;

        let post_repo = PostRepository::new(self.db.pool());
        let op = post_repo.create(&new_post).await?;
        info!(board = %board.short_id, post_id = op.id, ip = %ip_address, "New thread");

        let keep = i64::from(self.config.posting.max_threads_per_board);
        if keep > 0 {
            let pruned = post_repo.prune_threads(board.id, keep, op.id).await?;
            if !pruned.is_empty() {
                info!(board = %board.short_id, count = pruned.len(), "Pruned old threads");
            }
        }

        Ok(op)
    }

    /// Reply to a thread.
    ///
    /// The thread is bumped unless the options field says `sage` or the
    /// thread has reached the bump limit.
    pub async fn create_reply(
        &self,
        thread_id: i64,
        input: NewPostInput,
        ip_address: &str,
    ) -> Result<Post> {
        let op = self.get_live_thread(thread_id).await?;
        let board = self.get_active_board_by_id(op.board_id).await?;

        if op.is_locked {
            return Err(ChanError::Permission("thread is locked".to_string()));
        }

        let (new_post, sage) = self.prepare(&board, Some(op.id), input, ip_address).await?;

        let post_repo = PostRepository::new(self.db.pool());
        let reply_count = post_repo.count_replies(op.id).await?;
        let reply = post_repo.create(&new_post).await?;

        let under_limit = reply_count < i64::from(self.config.posting.bump_limit);
        if !sage && under_limit {
            post_repo.bump(op.id, &reply).await?;
        } else {
            debug!(thread_id = op.id, sage, "Reply did not bump");
        }

        info!(board = %board.short_id, thread_id = op.id, post_id = reply.id, ip = %ip_address, "New reply");
        Ok(reply)
    }

    /// File a report against a live post.
    ///
    /// An address may hold only one open report per post.
    pub async fn report_post(
        &self,
        post_id: i64,
        reason: ReportReason,
        details: Option<String>,
        ip_address: &str,
    ) -> Result<Report> {
        let post = PostRepository::new(self.db.pool())
            .get_by_id(post_id)
            .await?
            .filter(|p| !p.is_deleted)
            .ok_or_else(|| ChanError::NotFound("post".to_string()))?;

        let details = details
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        if let Some(ref d) = details {
            if d.chars().count() > MAX_REPORT_DETAILS_LENGTH {
                return Err(ChanError::Validation(format!(
                    "details must be at most {MAX_REPORT_DETAILS_LENGTH} characters"
                )));
            }
        }

        let report_repo = ReportRepository::new(self.db.pool());
        if report_repo.has_open_report(post.id, ip_address).await? {
            return Err(ChanError::Conflict(
                "you have already reported this post".to_string(),
            ));
        }

        let mut new_report = NewReport::new(post.id, reason, ip_address);
        new_report.details = details;
        let report = report_repo.create(&new_report).await?;
        info!(post_id = post.id, reason = %reason, ip = %ip_address, "Post reported");
        Ok(report)
    }

    // ========== Helpers ==========

    async fn get_live_thread(&self, thread_id: i64) -> Result<Post> {
        PostRepository::new(self.db.pool())
            .get_by_id(thread_id)
            .await?
            .filter(|p| p.is_thread() && !p.is_deleted)
            .ok_or_else(|| ChanError::NotFound("thread".to_string()))
    }

    async fn get_active_board_by_id(&self, board_id: i64) -> Result<Board> {
        BoardRepository::new(self.db.pool())
            .get_by_id(board_id)
            .await?
            .filter(|b| b.is_active)
            .ok_or_else(|| ChanError::NotFound("board".to_string()))
    }

    /// Run every pre-insert check and build the row to insert.
    ///
    /// Returns the new post and whether it was marked sage.
    async fn prepare(
        &self,
        board: &Board,
        parent_id: Option<i64>,
        input: NewPostInput,
        ip_address: &str,
    ) -> Result<(NewPost, bool)> {
        let settings = SettingsRepository::new(self.db.pool());
        if !settings.get_bool(POSTING_ENABLED, true).await? {
            return Err(ChanError::Permission("posting is disabled".to_string()));
        }

        let sage = input.is_sage();
        let mut new_post = validate_post(board, parent_id, input, self.config)?;
        new_post.ip_address = ip_address.to_string();

        BanCheck::new(self.db.pool()).check(ip_address).await?;
        self.check_cooldown(ip_address).await?;

        Ok((new_post, sage))
    }

    async fn check_cooldown(&self, ip_address: &str) -> Result<()> {
        let cooldown = self.config.posting.cooldown_secs as i64;
        if cooldown == 0 {
            return Ok(());
        }

        let elapsed = PostRepository::new(self.db.pool())
            .seconds_since_last_post(ip_address)
            .await?;
        match elapsed {
            Some(elapsed) if elapsed < cooldown => {
                let retry = (cooldown - elapsed.max(0)) as u64;
                debug!(ip = %ip_address, retry, "Post cooldown active");
                Err(ChanError::RateLimited(retry))
            }
            _ => Ok(()),
        }
    }
}

/// Validate poster input against the board and site limits.
///
/// Blank names fall back to the site default, blank subjects are dropped
/// and a missing image MIME type is inferred from the file name.
pub fn validate_post(
    board: &Board,
    parent_id: Option<i64>,
    input: NewPostInput,
    config: &Config,
) -> Result<NewPost> {
    let max_message = config.posting.max_message_length;

    let name = input
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| config.site.default_name.clone());
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ChanError::Validation(format!(
            "name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    let subject = input
        .subject
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    if let Some(ref subject) = subject {
        if subject.chars().count() > MAX_SUBJECT_LENGTH {
            return Err(ChanError::Validation(format!(
                "subject must be at most {MAX_SUBJECT_LENGTH} characters"
            )));
        }
    }

    let message = input.message.trim_end().to_string();
    if message.chars().count() > max_message {
        return Err(ChanError::Validation(format!(
            "message must be at most {max_message} characters"
        )));
    }

    let image = input.image.map(normalize_image).transpose()?;
    if let Some(ref image) = image {
        if !board.accepts_mime(&image.mime) {
            return Err(ChanError::Validation(format!(
                "file type {} is not allowed on /{}/",
                image.mime, board.short_id
            )));
        }
        if image.size > board.max_file_size {
            return Err(ChanError::Validation(format!(
                "file is larger than {} bytes",
                board.max_file_size
            )));
        }
    }

    if message.trim().is_empty() && image.is_none() {
        return Err(ChanError::Validation(
            "a message or an image is required".to_string(),
        ));
    }

    Ok(NewPost {
        board_id: board.id,
        parent_id,
        name,
        subject,
        message,
        image,
        ip_address: String::new(),
    })
}

fn normalize_image(mut image: ImageInfo) -> Result<ImageInfo> {
    image.name = image.name.trim().to_string();
    if image.name.is_empty() {
        return Err(ChanError::Validation("image name is required".to_string()));
    }
    if image.size <= 0 {
        return Err(ChanError::Validation("image size must be positive".to_string()));
    }
    if image.stored.trim().is_empty() {
        image.stored = image.name.clone();
    }
    if image.mime.trim().is_empty() {
        image.mime = mime_guess::from_path(&image.name)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
    }
    Ok(image)
}
