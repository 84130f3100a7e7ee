//! Board handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::web::dto::{
    ApiResponse, BoardResponse, CatalogEntryResponse, CatalogResponse, CreatePostRequest,
    PageQuery, PaginatedResponse, PostResponse, ThreadPreviewResponse, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::ClientIp;

/// GET /api/boards - List active boards.
pub async fn list_boards(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<BoardResponse>>>, ApiError> {
    let boards = state.boards().list_boards().await?;
    Ok(Json(ApiResponse::new(
        boards.into_iter().map(BoardResponse::from).collect(),
    )))
}

/// GET /api/boards/:short_id - Get a board.
pub async fn get_board(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Result<Json<ApiResponse<BoardResponse>>, ApiError> {
    let board = state.boards().get_board(&short_id).await?;
    Ok(Json(ApiResponse::new(board.into())))
}

/// GET /api/boards/:short_id/threads?page=N - One page of the board index.
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PaginatedResponse<ThreadPreviewResponse>>, ApiError> {
    let index = state.boards().board_index(&short_id, query.page).await?;
    let per_page = state.config.posting.threads_per_page;

    Ok(Json(PaginatedResponse::new(
        index
            .threads
            .into_iter()
            .map(ThreadPreviewResponse::from)
            .collect(),
        index.page,
        per_page,
        index.total_threads.max(0) as u64,
        index.total_pages,
    )))
}

/// GET /api/boards/:short_id/catalog - Every live thread on a board.
pub async fn catalog(
    State(state): State<Arc<AppState>>,
    Path(short_id): Path<String>,
) -> Result<Json<ApiResponse<CatalogResponse>>, ApiError> {
    let (board, entries) = state.boards().catalog(&short_id).await?;
    Ok(Json(ApiResponse::new(CatalogResponse {
        board: board.into(),
        threads: entries
            .into_iter()
            .map(CatalogEntryResponse::from)
            .collect(),
    })))
}

/// POST /api/boards/:short_id/threads - Start a thread.
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    ClientIp(ip): ClientIp,
    Path(short_id): Path<String>,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let post = state
        .boards()
        .create_thread(&short_id, req.into(), &ip)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::new(post.into()))))
}
