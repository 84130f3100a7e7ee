//! Thread, reply and report handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::web::dto::{
    ApiResponse, BanStatusResponse, CreatePostRequest, PostResponse, ReportCreatedResponse,
    ReportRequest, ThreadResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::ClientIp;

/// GET /api/threads/:id - A thread with all replies.
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<i64>,
) -> Result<Json<ApiResponse<ThreadResponse>>, ApiError> {
    let view = state.boards().thread(thread_id).await?;
    Ok(Json(ApiResponse::new(view.into())))
}

/// POST /api/threads/:id/replies - Reply to a thread.
pub async fn create_reply(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Path(thread_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let post = state
        .boards()
        .create_reply(thread_id, req.into(), &ip)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(post.into()))))
}

/// POST /api/posts/:id/report - Report a post.
pub async fn report_post(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Path(post_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ReportRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReportCreatedResponse>>), ApiError> {
    let report = state
        .boards()
        .report_post(post_id, req.reason, req.details, &ip)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(report.into()))))
}

/// GET /api/ban - Ban status of the calling address.
pub async fn ban_status(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
) -> Result<Json<ApiResponse<BanStatusResponse>>, ApiError> {
    let ban = state.boards().ban_status(&ip).await?;
    Ok(Json(ApiResponse::new(ban.into())))
}
