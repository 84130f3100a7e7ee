//! Moderation module for chanboard.
//!
//! This module provides:
//! - IP bans and the ban check applied before posting
//! - Reports filed by visitors against posts

mod ban;
mod report;

pub use ban::{Ban, BanCheck, BanRepository, NewBan, MAX_BAN_HOURS};
pub use report::{NewReport, Report, ReportReason, ReportRepository, ReportStatus};
