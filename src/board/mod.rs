//! Board module for chanboard.
//!
//! This module provides imageboard functionality including:
//! - Board management (create, read, update, delete, reorder)
//! - Threads and replies, stored as posts with an optional parent
//! - Board index pages, the catalog and thread views
//! - Posting rules: validation, bans, cooldown, bumping and pruning

mod post;
mod post_repository;
mod repository;
mod service;
mod types;

pub use post::{ImageInfo, NewPost, Post, PostFlags};
pub use post_repository::PostRepository;
pub use repository::BoardRepository;
pub use service::{
    validate_post, BoardIndex, BoardService, CatalogEntry, NewPostInput, Pagination,
    ThreadPreview, ThreadView, MAX_NAME_LENGTH, MAX_REPORT_DETAILS_LENGTH, MAX_SUBJECT_LENGTH,
};
pub use types::{
    validate_short_id, Board, BoardUpdate, NewBoard, DEFAULT_ALLOWED_FILE_TYPES,
    DEFAULT_MAX_FILE_SIZE, MAX_SHORT_ID_LENGTH,
};
