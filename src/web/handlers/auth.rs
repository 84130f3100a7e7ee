//! Staff authentication handlers.

use axum::{extract::State, http::HeaderMap, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;

use crate::web::dto::{ApiResponse, LoginRequest, LoginResponse, UserResponse, ValidatedJson};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{session_token, AdminUser, ClientIp, SESSION_COOKIE};

/// POST /api/admin/login - Staff login.
///
/// Returns the session token and sets it as an HttpOnly cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<LoginResponse>>), ApiError> {
    let (token, user) = state
        .sessions()
        .login(req.username.trim(), &req.password)
        .await
        .map_err(|e| {
            tracing::info!(ip = %ip, username = %req.username, "Staff login rejected");
            ApiError::from(e)
        })?;

    let expires_in = state.config.admin.session_duration_hours * 3600;
    let cookie = Cookie::build((SESSION_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();

    let response = LoginResponse {
        token,
        expires_in,
        user: user.into(),
    };
    Ok((jar.add(cookie), Json(ApiResponse::new(response))))
}

/// POST /api/admin/logout - End the current session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<()>>), ApiError> {
    if let Some(token) = session_token(&headers) {
        state.sessions().logout(&token).await?;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));
    Ok((jar, Json(ApiResponse::new(()))))
}

/// GET /api/admin/me - The logged-in staff member.
pub async fn me(AdminUser(user): AdminUser) -> Json<ApiResponse<UserResponse>> {
    Json(ApiResponse::new(user.into()))
}
