//! User reports against posts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::DbPool;
use crate::{ChanError, Result};

/// Why a post was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportReason {
    /// Advertising or flooding.
    Spam,
    /// Illegal content.
    Illegal,
    /// Wrong board.
    OffTopic,
    /// Anything else; details should explain.
    Other,
}

impl ReportReason {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportReason::Spam => "spam",
            ReportReason::Illegal => "illegal",
            ReportReason::OffTopic => "off_topic",
            ReportReason::Other => "other",
        }
    }
}

impl FromStr for ReportReason {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "spam" => Ok(ReportReason::Spam),
            "illegal" => Ok(ReportReason::Illegal),
            "off_topic" => Ok(ReportReason::OffTopic),
            "other" => Ok(ReportReason::Other),
            _ => Err(format!("unknown report reason: {s}")),
        }
    }
}

impl fmt::Display for ReportReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Report workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    /// Awaiting review.
    Open,
    /// Acted upon.
    Resolved,
    /// Reviewed, no action.
    Dismissed,
}

impl ReportStatus {
    /// Database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Open => "open",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Dismissed => "dismissed",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(ReportStatus::Open),
            "resolved" => Ok(ReportStatus::Resolved),
            "dismissed" => Ok(ReportStatus::Dismissed),
            _ => Err(format!("unknown report status: {s}")),
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report filed against a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub id: i64,
    pub post_id: i64,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub reporter_ip: String,
    pub status: ReportStatus,
    pub resolved_by: Option<i64>,
    pub created_at: String,
}

/// Data for filing a new report.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub post_id: i64,
    pub reason: ReportReason,
    pub details: Option<String>,
    pub reporter_ip: String,
}

impl NewReport {
    /// Create a new report without details.
    pub fn new(post_id: i64, reason: ReportReason, reporter_ip: impl Into<String>) -> Self {
        Self {
            post_id,
            reason,
            details: None,
            reporter_ip: reporter_ip.into(),
        }
    }

    /// Attach free-form details.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

const REPORT_COLUMNS: &str =
    "id, post_id, reason, details, reporter_ip, status, resolved_by, created_at";

/// Repository for the `reports` table.
pub struct ReportRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> ReportRepository<'a> {
    /// Create a new ReportRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// File a new report.
    pub async fn create(&self, new_report: &NewReport) -> Result<Report> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO reports (post_id, reason, details, reporter_ip)
             VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(new_report.post_id)
        .bind(new_report.reason.as_str())
        .bind(&new_report.details)
        .bind(&new_report.reporter_ip)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("report".to_string()))
    }

    /// Get a report by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Report>> {
        let sql = format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1");
        let row: Option<ReportRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        row.map(ReportRow::into_report).transpose()
    }

    /// List reports, optionally filtered by status, oldest first.
    pub async fn list(&self, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        let rows: Vec<ReportRow> = match status {
            Some(status) => {
                let sql = format!(
                    "SELECT {REPORT_COLUMNS} FROM reports WHERE status = $1 ORDER BY id ASC"
                );
                sqlx::query_as(&sql)
                    .bind(status.as_str())
                    .fetch_all(self.pool)
                    .await
            }
            None => {
                let sql = format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY id ASC");
                sqlx::query_as(&sql).fetch_all(self.pool).await
            }
        }
        .map_err(|e| ChanError::Database(e.to_string()))?;

        rows.into_iter().map(ReportRow::into_report).collect()
    }

    /// Move a report to a new status, recording who handled it.
    ///
    /// Returns the updated report, or None if not found.
    pub async fn set_status(
        &self,
        id: i64,
        status: ReportStatus,
        resolved_by: Option<i64>,
    ) -> Result<Option<Report>> {
        let result = sqlx::query("UPDATE reports SET status = $1, resolved_by = $2 WHERE id = $3")
            .bind(status.as_str())
            .bind(resolved_by)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Delete a report.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM reports WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// Count open reports for a post.
    pub async fn count_open_for_post(&self, post_id: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM reports WHERE post_id = $1 AND status = 'open'",
        )
        .bind(post_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Check whether an address already has an open report on a post.
    pub async fn has_open_report(&self, post_id: i64, reporter_ip: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM reports
                           WHERE post_id = $1 AND reporter_ip = $2 AND status = 'open')",
        )
        .bind(post_id)
        .bind(reporter_ip)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }
}

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    post_id: i64,
    reason: String,
    details: Option<String>,
    reporter_ip: String,
    status: String,
    resolved_by: Option<i64>,
    created_at: String,
}

impl ReportRow {
    fn into_report(self) -> Result<Report> {
        Ok(Report {
            id: self.id,
            post_id: self.post_id,
            reason: self.reason.parse().map_err(ChanError::Database)?,
            details: self.details,
            reporter_ip: self.reporter_ip,
            status: self.status.parse().map_err(ChanError::Database)?,
            resolved_by: self.resolved_by,
            created_at: self.created_at,
        })
    }
}
