//! API handlers.

pub mod admin;
pub mod auth;
pub mod board;
pub mod thread;

pub use admin::*;
pub use auth::*;
pub use board::*;
pub use thread::*;

use std::sync::Arc;

use axum::Json;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::auth::{LoginLimiter, SessionService};
use crate::board::BoardService;
use crate::{Config, Database};

use super::middleware::RateLimitState;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database pool.
    pub db: Database,
    /// Loaded configuration.
    pub config: Arc<Config>,
    /// Failed-login tracker for staff accounts.
    pub login_limiter: Arc<Mutex<LoginLimiter>>,
    /// Per-address request limiters.
    pub rate_limits: Arc<RateLimitState>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(db: Database, config: Config) -> Self {
        let rate_limits = RateLimitState::new(
            config.server.login_rate_limit,
            config.server.api_rate_limit,
        );
        Self {
            db,
            config: Arc::new(config),
            login_limiter: Arc::new(Mutex::new(LoginLimiter::new())),
            rate_limits: Arc::new(rate_limits),
        }
    }

    /// Public board operations.
    pub fn boards(&self) -> BoardService<'_> {
        BoardService::new(&self.db, &self.config)
    }

    /// Staff session operations.
    pub fn sessions(&self) -> SessionService<'_> {
        SessionService::new(
            &self.db,
            &self.login_limiter,
            self.config.admin.session_duration_hours,
        )
    }
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// GET /health - Liveness check.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
