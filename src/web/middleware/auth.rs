//! Staff session authentication.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::db::User;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "chan_session";

/// Find the session token in the request.
///
/// A `Bearer` Authorization header wins over the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    let bearer = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

/// Extractor for a logged-in staff member.
///
/// Rejects with 401 when the token is missing, unknown or expired, or when
/// the account has been deactivated. Role checks are left to the services.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("Missing session token"))?;

        let user = state.sessions().authenticate(&token).await.map_err(|e| {
            tracing::debug!(error = %e, "Session rejected");
            ApiError::unauthorized("Invalid or expired session")
        })?;

        Ok(AdminUser(user))
    }
}
