//! Ban management for staff.

use std::net::IpAddr;

use tracing::info;

use crate::auth::require_moderator;
use crate::board::PostRepository;
use crate::db::{DbPool, User};
use crate::moderation::{Ban, BanRepository, NewBan, MAX_BAN_HOURS};

use super::AdminError;

/// Maximum length of a ban reason.
const MAX_REASON_LENGTH: usize = 500;

/// A request to ban an address.
#[derive(Debug, Clone)]
pub struct BanRequest {
    /// Address to ban.
    pub ip_address: String,
    /// Reason shown to the poster.
    pub reason: String,
    /// Ban length in hours; None bans permanently.
    pub duration_hours: Option<i64>,
    /// Also delete every post from the address.
    pub delete_posts: bool,
}

/// Admin service for bans.
pub struct BanAdminService<'a> {
    pool: &'a DbPool,
}

impl<'a> BanAdminService<'a> {
    /// Create a new BanAdminService.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Ban an address.
    ///
    /// Returns the ban and how many posts were deleted with it.
    pub async fn ban(&self, request: &BanRequest, admin: &User) -> Result<(Ban, u64), AdminError> {
        require_moderator(Some(admin))?;

        let ip: IpAddr = request.ip_address.trim().parse().map_err(|_| {
            AdminError::InvalidOperation(format!("invalid IP address: {}", request.ip_address))
        })?;
        let reason = request.reason.trim();
        if reason.is_empty() || reason.chars().count() > MAX_REASON_LENGTH {
            return Err(AdminError::InvalidOperation(format!(
                "reason must be 1-{MAX_REASON_LENGTH} characters"
            )));
        }

        let mut new_ban =
            NewBan::new(ip.to_canonical().to_string(), reason).with_banned_by(admin.id);
        if let Some(hours) = request.duration_hours {
            if !(1..=MAX_BAN_HOURS).contains(&hours) {
                return Err(AdminError::InvalidOperation(format!(
                    "ban duration must be 1-{MAX_BAN_HOURS} hours"
                )));
            }
            new_ban = new_ban.with_duration_hours(hours)?;
        }

        let ban = BanRepository::new(self.pool).create(&new_ban).await?;

        let deleted = if request.delete_posts {
            PostRepository::new(self.pool)
                .delete_by_ip(&ban.ip_address)
                .await?
        } else {
            0
        };

        info!(
            ip = %ban.ip_address,
            ban_id = ban.id,
            permanent = ban.is_permanent(),
            deleted_posts = deleted,
            admin = %admin.username,
            "Address banned"
        );
        Ok((ban, deleted))
    }

    /// Lift a ban.
    pub async fn lift(&self, ban_id: i64, admin: &User) -> Result<(), AdminError> {
        require_moderator(Some(admin))?;

        if !BanRepository::new(self.pool).lift(ban_id).await? {
            return Err(AdminError::NotFound("ban".to_string()));
        }
        info!(ban_id, admin = %admin.username, "Ban lifted");
        Ok(())
    }

    /// List bans; only those in force unless `include_inactive` is set.
    pub async fn list(&self, include_inactive: bool, admin: &User) -> Result<Vec<Ban>, AdminError> {
        require_moderator(Some(admin))?;

        let repo = BanRepository::new(self.pool);
        let bans = if include_inactive {
            repo.list_all().await?
        } else {
            repo.list_active().await?
        };
        Ok(bans)
    }
}
