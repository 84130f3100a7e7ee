//! Report review for staff.

use tracing::info;

use crate::auth::require_moderator;
use crate::db::{DbPool, User};
use crate::moderation::{Report, ReportRepository, ReportStatus};

use super::AdminError;

/// Admin service for reports.
pub struct ReportAdminService<'a> {
    pool: &'a DbPool,
}

impl<'a> ReportAdminService<'a> {
    /// Create a new ReportAdminService.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// List reports with the given status (all when None).
    pub async fn list(
        &self,
        status: Option<ReportStatus>,
        admin: &User,
    ) -> Result<Vec<Report>, AdminError> {
        require_moderator(Some(admin))?;
        Ok(ReportRepository::new(self.pool).list(status).await?)
    }

    /// Mark a report as acted upon.
    pub async fn resolve(&self, report_id: i64, admin: &User) -> Result<Report, AdminError> {
        self.close(report_id, ReportStatus::Resolved, admin).await
    }

    /// Dismiss a report without action.
    pub async fn dismiss(&self, report_id: i64, admin: &User) -> Result<Report, AdminError> {
        self.close(report_id, ReportStatus::Dismissed, admin).await
    }

    async fn close(
        &self,
        report_id: i64,
        status: ReportStatus,
        admin: &User,
    ) -> Result<Report, AdminError> {
        require_moderator(Some(admin))?;

        let repo = ReportRepository::new(self.pool);
        let report = repo
            .get_by_id(report_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("report".to_string()))?;
        if report.status != ReportStatus::Open {
            return Err(AdminError::Conflict(format!(
                "report is already {}",
                report.status
            )));
        }

        let report = repo
            .set_status(report_id, status, Some(admin.id))
            .await?
            .ok_or_else(|| AdminError::NotFound("report".to_string()))?;

        info!(report_id, status = %status, admin = %admin.username, "Report closed");
        Ok(report)
    }
}
