//! Admin panel handlers.
//!
//! Every handler requires a staff session. Role checks happen in the
//! admin services so that moderators get 403 rather than 401.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::admin::{
    BanAdminService, BanRequest, BoardAdminService, ContentAdminService, PostDeletionMode,
    ReportAdminService, SettingsAdminService, UserAdminService, UserChanges,
};
use crate::board::{BoardUpdate, NewBoard};
use crate::moderation::ReportStatus;
use crate::web::dto::{
    AdminPostResponse, ApiResponse, BanCreatedResponse, BanListQuery, BanResponse,
    BoardResponse, CountResponse, CreateBanRequest, CreateBoardRequest, CreateUserRequest,
    DeletePostQuery, IpQuery, ReorderBoardsRequest, ReportListQuery, ReportResponse,
    SettingResponse, UpdateBoardRequest, UpdateSettingsRequest, UpdateUserRequest,
    UserResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{canonical_ip, AdminUser, UNKNOWN_IP};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T: serde::Serialize>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::new(data)))
}

// ============================================================================
// Boards
// ============================================================================

/// GET /api/admin/boards - List every board, including inactive ones.
pub async fn admin_list_boards(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<BoardResponse>>>, ApiError> {
    let boards = BoardAdminService::new(state.db.pool())
        .list_boards(&admin)
        .await?;
    Ok(Json(ApiResponse::new(
        boards.into_iter().map(BoardResponse::from).collect(),
    )))
}

/// POST /api/admin/boards - Create a board.
pub async fn admin_create_board(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(req): ValidatedJson<CreateBoardRequest>,
) -> Result<Created<BoardResponse>, ApiError> {
    let mut new_board = NewBoard::new(req.short_id.trim(), req.name.trim()).with_nsfw(req.nsfw);
    if let Some(description) = req.description.filter(|d| !d.trim().is_empty()) {
        new_board = new_board.with_description(description);
    }
    if let Some(category) = req.category {
        new_board = new_board.with_category(category);
    }
    if let Some(size) = req.max_file_size {
        new_board = new_board.with_max_file_size(size);
    }
    if let Some(types) = req.allowed_file_types {
        new_board = new_board.with_allowed_file_types(types);
    }
    if let Some(order) = req.sort_order {
        new_board = new_board.with_sort_order(order);
    }

    let board = BoardAdminService::new(state.db.pool())
        .create_board(&new_board, &admin)
        .await?;
    Ok(created(board.into()))
}

/// PUT /api/admin/boards/:id - Update a board.
pub async fn admin_update_board(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(board_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateBoardRequest>,
) -> Result<Json<ApiResponse<BoardResponse>>, ApiError> {
    let mut update = BoardUpdate::new();
    if let Some(name) = req.name {
        update = update.name(name.trim());
    }
    if let Some(description) = req.description {
        let description = Some(description).filter(|d| !d.trim().is_empty());
        update = update.description(description);
    }
    if let Some(category) = req.category {
        update = update.category(category);
    }
    if let Some(nsfw) = req.nsfw {
        update = update.nsfw(nsfw);
    }
    if let Some(size) = req.max_file_size {
        update = update.max_file_size(size);
    }
    if let Some(types) = req.allowed_file_types {
        update = update.allowed_file_types(types);
    }
    if let Some(order) = req.sort_order {
        update = update.sort_order(order);
    }
    if let Some(active) = req.is_active {
        update = update.is_active(active);
    }

    let board = BoardAdminService::new(state.db.pool())
        .update_board(board_id, &update, &admin)
        .await?;
    Ok(Json(ApiResponse::new(board.into())))
}

/// DELETE /api/admin/boards/:id - Delete a board and everything on it.
pub async fn admin_delete_board(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(board_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    BoardAdminService::new(state.db.pool())
        .delete_board(board_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(())))
}

/// POST /api/admin/boards/reorder - Set the display order of all boards.
pub async fn admin_reorder_boards(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(req): ValidatedJson<ReorderBoardsRequest>,
) -> Result<Json<ApiResponse<Vec<BoardResponse>>>, ApiError> {
    let boards = BoardAdminService::new(state.db.pool())
        .reorder_boards(&req.board_ids, &admin)
        .await?;
    Ok(Json(ApiResponse::new(
        boards.into_iter().map(BoardResponse::from).collect(),
    )))
}

// ============================================================================
// Posts
// ============================================================================

/// GET /api/admin/posts/:id - Get any post, deleted or not.
pub async fn admin_get_post(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    let post = ContentAdminService::new(state.db.pool())
        .get_post(post_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(post.into())))
}

/// DELETE /api/admin/posts/:id?mode=soft|hard - Delete a post.
pub async fn admin_delete_post(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(post_id): Path<i64>,
    Query(query): Query<DeletePostQuery>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let mode = match query.mode.as_deref() {
        None => PostDeletionMode::default(),
        Some(mode) => mode.parse().map_err(ApiError::bad_request)?,
    };
    ContentAdminService::new(state.db.pool())
        .delete_post(post_id, mode, &admin)
        .await?;
    Ok(Json(ApiResponse::new(())))
}

/// POST /api/admin/posts/:id/restore - Undo a soft delete.
pub async fn admin_restore_post(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(post_id): Path<i64>,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    let post = ContentAdminService::new(state.db.pool())
        .restore_post(post_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(post.into())))
}

/// POST /api/admin/posts/:id/pin
pub async fn admin_pin_thread(
    state: State<Arc<AppState>>,
    admin: AdminUser,
    path: Path<i64>,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    set_pinned(state, admin, path, true).await
}

/// POST /api/admin/posts/:id/unpin
pub async fn admin_unpin_thread(
    state: State<Arc<AppState>>,
    admin: AdminUser,
    path: Path<i64>,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    set_pinned(state, admin, path, false).await
}

/// POST /api/admin/posts/:id/lock
pub async fn admin_lock_thread(
    state: State<Arc<AppState>>,
    admin: AdminUser,
    path: Path<i64>,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    set_locked(state, admin, path, true).await
}

/// POST /api/admin/posts/:id/unlock
pub async fn admin_unlock_thread(
    state: State<Arc<AppState>>,
    admin: AdminUser,
    path: Path<i64>,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    set_locked(state, admin, path, false).await
}

async fn set_pinned(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(thread_id): Path<i64>,
    pinned: bool,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    let post = ContentAdminService::new(state.db.pool())
        .set_pinned(thread_id, pinned, &admin)
        .await?;
    Ok(Json(ApiResponse::new(post.into())))
}

async fn set_locked(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(thread_id): Path<i64>,
    locked: bool,
) -> Result<Json<ApiResponse<AdminPostResponse>>, ApiError> {
    let post = ContentAdminService::new(state.db.pool())
        .set_locked(thread_id, locked, &admin)
        .await?;
    Ok(Json(ApiResponse::new(post.into())))
}

/// Canonical form of an `?ip=` filter, matching how posts are stored.
fn ip_filter(query: &IpQuery) -> Result<String, ApiError> {
    let raw = query.ip.trim();
    if raw == UNKNOWN_IP {
        return Ok(UNKNOWN_IP.to_string());
    }
    canonical_ip(raw).ok_or_else(|| ApiError::unprocessable(format!("invalid IP address: {raw}")))
}

/// GET /api/admin/posts?ip= - Every post from an address.
pub async fn admin_posts_by_ip(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Query(query): Query<IpQuery>,
) -> Result<Json<ApiResponse<Vec<AdminPostResponse>>>, ApiError> {
    let ip = ip_filter(&query)?;
    let posts = ContentAdminService::new(state.db.pool())
        .list_posts_by_ip(&ip, &admin)
        .await?;
    Ok(Json(ApiResponse::new(
        posts.into_iter().map(AdminPostResponse::from).collect(),
    )))
}

/// DELETE /api/admin/posts?ip= - Purge every post from an address.
pub async fn admin_delete_posts_by_ip(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Query(query): Query<IpQuery>,
) -> Result<Json<ApiResponse<CountResponse>>, ApiError> {
    let ip = ip_filter(&query)?;
    let count = ContentAdminService::new(state.db.pool())
        .delete_posts_by_ip(&ip, &admin)
        .await?;
    Ok(Json(ApiResponse::new(CountResponse { count })))
}

// ============================================================================
// Bans
// ============================================================================

/// GET /api/admin/bans?all=true - List bans.
pub async fn admin_list_bans(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Query(query): Query<BanListQuery>,
) -> Result<Json<ApiResponse<Vec<BanResponse>>>, ApiError> {
    let bans = BanAdminService::new(state.db.pool())
        .list(query.all, &admin)
        .await?;
    Ok(Json(ApiResponse::new(
        bans.into_iter().map(BanResponse::from).collect(),
    )))
}

/// POST /api/admin/bans - Ban an address.
pub async fn admin_create_ban(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(req): ValidatedJson<CreateBanRequest>,
) -> Result<Created<BanCreatedResponse>, ApiError> {
    let request = BanRequest {
        ip_address: req.ip_address,
        reason: req.reason,
        duration_hours: req.duration_hours,
        delete_posts: req.delete_posts,
    };
    let (ban, deleted_posts) = BanAdminService::new(state.db.pool())
        .ban(&request, &admin)
        .await?;
    Ok(created(BanCreatedResponse {
        ban: ban.into(),
        deleted_posts,
    }))
}

/// DELETE /api/admin/bans/:id - Lift a ban.
pub async fn admin_lift_ban(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(ban_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    BanAdminService::new(state.db.pool())
        .lift(ban_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(())))
}

// ============================================================================
// Reports
// ============================================================================

/// GET /api/admin/reports?status= - List reports.
pub async fn admin_list_reports(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Query(query): Query<ReportListQuery>,
) -> Result<Json<ApiResponse<Vec<ReportResponse>>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ReportStatus>)
        .transpose()
        .map_err(ApiError::bad_request)?;
    let reports = ReportAdminService::new(state.db.pool())
        .list(status, &admin)
        .await?;
    Ok(Json(ApiResponse::new(
        reports.into_iter().map(ReportResponse::from).collect(),
    )))
}

/// POST /api/admin/reports/:id/resolve
pub async fn admin_resolve_report(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(report_id): Path<i64>,
) -> Result<Json<ApiResponse<ReportResponse>>, ApiError> {
    let report = ReportAdminService::new(state.db.pool())
        .resolve(report_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(report.into())))
}

/// POST /api/admin/reports/:id/dismiss
pub async fn admin_dismiss_report(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(report_id): Path<i64>,
) -> Result<Json<ApiResponse<ReportResponse>>, ApiError> {
    let report = ReportAdminService::new(state.db.pool())
        .dismiss(report_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(report.into())))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/admin/users - List staff accounts.
pub async fn admin_list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, ApiError> {
    let users = UserAdminService::new(&state.db).list_users(&admin).await?;
    Ok(Json(ApiResponse::new(
        users.into_iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/admin/users - Create a staff account.
pub async fn admin_create_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<Created<UserResponse>, ApiError> {
    let user = UserAdminService::new(&state.db)
        .create_user(req.username.trim(), &req.password, req.role, &admin)
        .await?;
    Ok(created(user.into()))
}

/// PUT /api/admin/users/:id - Change role, status or password.
pub async fn admin_update_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<ApiResponse<UserResponse>>, ApiError> {
    let changes = UserChanges {
        role: req.role,
        is_active: req.is_active,
        password: req.password,
    };
    let user = UserAdminService::new(&state.db)
        .update_user(user_id, &changes, &admin)
        .await?;
    Ok(Json(ApiResponse::new(user.into())))
}

/// DELETE /api/admin/users/:id - Delete a staff account.
pub async fn admin_delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    UserAdminService::new(&state.db)
        .delete_user(user_id, &admin)
        .await?;
    Ok(Json(ApiResponse::new(())))
}

// ============================================================================
// Settings
// ============================================================================

/// GET /api/admin/settings - List site settings.
pub async fn admin_list_settings(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
) -> Result<Json<ApiResponse<Vec<SettingResponse>>>, ApiError> {
    let settings = SettingsAdminService::new(state.db.pool())
        .list(&admin)
        .await?;
    Ok(Json(ApiResponse::new(
        settings.into_iter().map(SettingResponse::from).collect(),
    )))
}

/// PUT /api/admin/settings - Write one or more settings.
///
/// Returns every setting after the change.
pub async fn admin_update_settings(
    State(state): State<Arc<AppState>>,
    AdminUser(admin): AdminUser,
    ValidatedJson(req): ValidatedJson<UpdateSettingsRequest>,
) -> Result<Json<ApiResponse<Vec<SettingResponse>>>, ApiError> {
    let service = SettingsAdminService::new(state.db.pool());
    for (key, value) in &req.settings {
        service.set(key, value, &admin).await?;
    }
    let settings = service.list(&admin).await?;
    Ok(Json(ApiResponse::new(
        settings.into_iter().map(SettingResponse::from).collect(),
    )))
}
