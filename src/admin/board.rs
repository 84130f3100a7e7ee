//! Board management for staff.
//!
//! - Create, update, list and reorder boards (Moderator and above)
//! - Delete board (Admin only)

use tracing::info;

use crate::auth::{require_admin, require_moderator};
use crate::board::{validate_short_id, Board, BoardRepository, BoardUpdate, NewBoard};
use crate::db::{DbPool, User};

use super::AdminError;

/// Admin service for board management.
pub struct BoardAdminService<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardAdminService<'a> {
    /// Create a new BoardAdminService.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board.
    pub async fn create_board(&self, board: &NewBoard, admin: &User) -> Result<Board, AdminError> {
        require_moderator(Some(admin))?;
        validate_short_id(&board.short_id)?;
        validate_board_fields(Some(&board.name), Some(board.max_file_size))?;

        let repo = BoardRepository::new(self.pool);
        if repo.short_id_exists(&board.short_id).await? {
            return Err(AdminError::Conflict(format!(
                "board /{}/ already exists",
                board.short_id
            )));
        }

        let created = repo.create(board).await?;
        info!(board = %created.short_id, admin = %admin.username, "Board created");
        Ok(created)
    }

    /// Update an existing board.
    pub async fn update_board(
        &self,
        board_id: i64,
        update: &BoardUpdate,
        admin: &User,
    ) -> Result<Board, AdminError> {
        require_moderator(Some(admin))?;
        validate_board_fields(update.name.as_deref(), update.max_file_size)?;

        let updated = BoardRepository::new(self.pool)
            .update(board_id, update)
            .await?
            .ok_or_else(|| AdminError::NotFound("board".to_string()))?;

        info!(board = %updated.short_id, admin = %admin.username, "Board updated");
        Ok(updated)
    }

    /// Delete a board with all of its posts.
    pub async fn delete_board(&self, board_id: i64, admin: &User) -> Result<(), AdminError> {
        require_admin(Some(admin))?;

        let repo = BoardRepository::new(self.pool);
        let board = repo
            .get_by_id(board_id)
            .await?
            .ok_or_else(|| AdminError::NotFound("board".to_string()))?;

        repo.delete(board_id).await?;
        info!(board = %board.short_id, admin = %admin.username, "Board deleted");
        Ok(())
    }

    /// List every board, including inactive ones.
    pub async fn list_boards(&self, admin: &User) -> Result<Vec<Board>, AdminError> {
        require_moderator(Some(admin))?;
        Ok(BoardRepository::new(self.pool).list_all().await?)
    }

    /// Assign display order from a list of board IDs.
    ///
    /// The list must name every board exactly once.
    pub async fn reorder_boards(
        &self,
        ordered_ids: &[i64],
        admin: &User,
    ) -> Result<Vec<Board>, AdminError> {
        require_moderator(Some(admin))?;

        let repo = BoardRepository::new(self.pool);
        let mut expected: Vec<i64> = repo.list_all().await?.iter().map(|b| b.id).collect();
        let mut given = ordered_ids.to_vec();
        expected.sort_unstable();
        given.sort_unstable();
        if expected != given {
            return Err(AdminError::InvalidOperation(
                "board order must list every board exactly once".to_string(),
            ));
        }

        repo.reorder(ordered_ids).await?;
        info!(admin = %admin.username, "Boards reordered");
        Ok(repo.list_all().await?)
    }
}

fn validate_board_fields(name: Option<&str>, max_file_size: Option<i64>) -> Result<(), AdminError> {
    if let Some(name) = name {
        let len = name.trim().chars().count();
        if len == 0 || len > 64 {
            return Err(AdminError::InvalidOperation(
                "board name must be 1-64 characters".to_string(),
            ));
        }
    }
    if let Some(size) = max_file_size {
        if size <= 0 {
            return Err(AdminError::InvalidOperation(
                "max file size must be positive".to_string(),
            ));
        }
    }
    Ok(())
}
