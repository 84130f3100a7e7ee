//! chanboard - an anonymous imageboard
//!
//! Boards hold threads, threads hold replies, and nobody needs an account
//! to post. Staff moderate through a JSON admin API: post removal, bans,
//! reports, board management and site settings.

pub mod admin;
pub mod auth;
pub mod board;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod markup;
pub mod moderation;
pub mod web;

pub use config::Config;
pub use db::{Database, Role, User};
pub use error::{ChanError, Result};
