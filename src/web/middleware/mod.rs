//! Middleware and extractors for the JSON API.

pub mod auth;
pub mod client_ip;
pub mod cors;
pub mod rate_limit;
pub mod security;

pub use auth::{session_token, AdminUser, SESSION_COOKIE};
pub use client_ip::{canonical_ip, client_ip, ClientIp, UNKNOWN_IP};
pub use cors::create_cors_layer;
pub use rate_limit::{api_rate_limit, login_rate_limit, RateLimitState};
pub use security::security_headers;
