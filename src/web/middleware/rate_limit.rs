//! Per-address rate limiting middleware.

use axum::{body::Body, http::Request, middleware::Next, response::{IntoResponse, Response}};
use governor::{
    clock::{Clock, DefaultClock},
    DefaultKeyedRateLimiter, Quota, RateLimiter,
};
use std::{num::NonZeroU32, sync::Arc};

use super::client_ip::client_ip;
use crate::web::error::ApiError;

/// Governor limiters keyed by client address.
pub struct RateLimitState {
    /// Limiter for the staff login endpoint.
    login: DefaultKeyedRateLimiter<String>,
    /// Limiter for every API endpoint.
    api: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl RateLimitState {
    /// Create limiters allowing the given number of requests per minute.
    pub fn new(login_per_minute: u32, api_per_minute: u32) -> Self {
        Self {
            login: RateLimiter::keyed(per_minute(login_per_minute)),
            api: RateLimiter::keyed(per_minute(api_per_minute)),
            clock: DefaultClock::default(),
        }
    }

    /// Check a login attempt. Returns the seconds to wait when limited.
    pub fn check_login(&self, ip: &str) -> Option<u64> {
        self.check(&self.login, ip)
    }

    /// Check an API request. Returns the seconds to wait when limited.
    pub fn check_api(&self, ip: &str) -> Option<u64> {
        self.check(&self.api, ip)
    }

    fn check(&self, limiter: &DefaultKeyedRateLimiter<String>, ip: &str) -> Option<u64> {
        match limiter.check_key(&ip.to_string()) {
            Ok(()) => None,
            Err(not_until) => Some(
                not_until
                    .wait_time_from(self.clock.now())
                    .as_secs()
                    .max(1),
            ),
        }
    }

    /// Drop state for addresses that are back to a full quota.
    pub fn cleanup(&self) {
        self.login.retain_recent();
        self.api.retain_recent();
    }

    /// Number of addresses currently tracked.
    pub fn tracked(&self) -> usize {
        self.login.len() + self.api.len()
    }
}

fn per_minute(requests: u32) -> Quota {
    Quota::per_minute(NonZeroU32::new(requests).unwrap_or(NonZeroU32::MIN))
}

/// Rate limiting middleware for the login endpoint.
pub async fn login_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(req.headers(), req.extensions());

    if let Some(wait) = state.check_login(&ip) {
        tracing::warn!(ip = %ip, "Login rate limit exceeded");
        return ApiError::rate_limited("Too many login attempts. Please try again later.", wait)
            .into_response();
    }

    next.run(req).await
}

/// Rate limiting middleware for the API.
pub async fn api_rate_limit(
    state: Arc<RateLimitState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let ip = client_ip(req.headers(), req.extensions());

    if let Some(wait) = state.check_api(&ip) {
        tracing::warn!(ip = %ip, "API rate limit exceeded");
        return ApiError::rate_limited("Too many requests. Please try again later.", wait)
            .into_response();
    }

    next.run(req).await
}
