//! Board repository for chanboard.
//!
//! This module provides CRUD operations for boards in the database.

use sqlx::QueryBuilder;

use super::types::{Board, BoardUpdate, NewBoard};
use crate::db::{DbPool, SQL_TRUE};
use crate::{ChanError, Result};

const BOARD_COLUMNS: &str = "id, short_id, name, description, category, nsfw, max_file_size,
     allowed_file_types, sort_order, is_active, created_at";

/// Repository for board CRUD operations.
pub struct BoardRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> BoardRepository<'a> {
    /// Create a new BoardRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new board in the database.
    ///
    /// Returns the created board with the assigned ID.
    pub async fn create(&self, new_board: &NewBoard) -> Result<Board> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO boards (short_id, name, description, category, nsfw, max_file_size,
                                 allowed_file_types, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING id",
        )
        .bind(&new_board.short_id)
        .bind(&new_board.name)
        .bind(&new_board.description)
        .bind(&new_board.category)
        .bind(new_board.nsfw)
        .bind(new_board.max_file_size)
        .bind(&new_board.allowed_file_types)
        .bind(new_board.sort_order)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("board".to_string()))
    }

    /// Get a board by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Board>> {
        let sql = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1");
        let row: Option<BoardRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(row.map(BoardRow::into_board))
    }

    /// Get a board by its short ID (slug).
    pub async fn get_by_short_id(&self, short_id: &str) -> Result<Option<Board>> {
        let sql = format!("SELECT {BOARD_COLUMNS} FROM boards WHERE short_id = $1");
        let row: Option<BoardRow> = sqlx::query_as(&sql)
            .bind(short_id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(row.map(BoardRow::into_board))
    }

    /// Update a board by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated board, or None if not found.
    pub async fn update(&self, id: i64, update: &BoardUpdate) -> Result<Option<Board>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE boards SET ");
        let mut separated = query.separated(", ");

        if let Some(ref name) = update.name {
            separated.push("name = ");
            separated.push_bind_unseparated(name.clone());
        }
        if let Some(ref description) = update.description {
            separated.push("description = ");
            separated.push_bind_unseparated(description.clone());
        }
        if let Some(ref category) = update.category {
            separated.push("category = ");
            separated.push_bind_unseparated(category.clone());
        }
        if let Some(nsfw) = update.nsfw {
            separated.push("nsfw = ");
            separated.push_bind_unseparated(nsfw);
        }
        if let Some(max_file_size) = update.max_file_size {
            separated.push("max_file_size = ");
            separated.push_bind_unseparated(max_file_size);
        }
        if let Some(ref types) = update.allowed_file_types {
            separated.push("allowed_file_types = ");
            separated.push_bind_unseparated(types.clone());
        }
        if let Some(sort_order) = update.sort_order {
            separated.push("sort_order = ");
            separated.push_bind_unseparated(sort_order);
        }
        if let Some(is_active) = update.is_active {
            separated.push("is_active = ");
            separated.push_bind_unseparated(is_active);
        }

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query
            .build()
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }

        self.get_by_id(id).await
    }

    /// Delete a board by ID.
    ///
    /// Posts on the board are removed by the foreign key cascade.
    /// Returns true if a board was deleted, false if not found.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// List active boards, ordered by sort_order then ID.
    pub async fn list_active(&self) -> Result<Vec<Board>> {
        let sql = format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE is_active = {SQL_TRUE}
             ORDER BY sort_order ASC, id ASC"
        );
        let rows: Vec<BoardRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(BoardRow::into_board).collect())
    }

    /// List all boards (including inactive), ordered by sort_order then ID.
    pub async fn list_all(&self) -> Result<Vec<Board>> {
        let sql = format!("SELECT {BOARD_COLUMNS} FROM boards ORDER BY sort_order ASC, id ASC");
        let rows: Vec<BoardRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(BoardRow::into_board).collect())
    }

    /// Reassign `sort_order` so boards appear in the given ID order.
    ///
    /// Runs in a single transaction; if any ID does not exist nothing is
    /// changed and a NotFound error is returned.
    pub async fn reorder(&self, ordered_ids: &[i64]) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        for (position, id) in ordered_ids.iter().enumerate() {
            let result = sqlx::query("UPDATE boards SET sort_order = $1 WHERE id = $2")
                .bind(position as i32)
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(|e| ChanError::Database(e.to_string()))?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(|e| ChanError::Database(e.to_string()))?;
                return Err(ChanError::NotFound(format!("board {id}")));
            }
        }

        tx.commit()
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count all boards.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM boards")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Check if a short ID is already taken.
    pub async fn short_id_exists(&self, short_id: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM boards WHERE short_id = $1)")
                .bind(short_id)
                .fetch_one(self.pool)
                .await
                .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }
}

/// Internal struct for mapping database rows to Board.
#[derive(sqlx::FromRow)]
struct BoardRow {
    id: i64,
    short_id: String,
    name: String,
    description: Option<String>,
    category: String,
    nsfw: bool,
    max_file_size: i64,
    allowed_file_types: String,
    sort_order: i32,
    is_active: bool,
    created_at: String,
}

impl BoardRow {
    fn into_board(self) -> Board {
        Board {
            id: self.id,
            short_id: self.short_id,
            name: self.name,
            description: self.description,
            category: self.category,
            nsfw: self.nsfw,
            max_file_size: self.max_file_size,
            allowed_file_types: self.allowed_file_types,
            sort_order: self.sort_order,
            is_active: self.is_active,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::types::DEFAULT_MAX_FILE_SIZE;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_board() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        let board = repo.create(&NewBoard::new("g", "Technology")).await.unwrap();

        assert_eq!(board.id, 1);
        assert_eq!(board.short_id, "g");
        assert_eq!(board.name, "Technology");
        assert_eq!(board.category, "General");
        assert_eq!(board.max_file_size, DEFAULT_MAX_FILE_SIZE);
        assert!(board.accepts_mime("image/png"));
        assert!(!board.nsfw);
        assert!(board.is_active);
    }

    #[tokio::test]
    async fn test_create_duplicate_short_id() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        repo.create(&NewBoard::new("g", "Technology")).await.unwrap();
        let result = repo.create(&NewBoard::new("g", "Other")).await;
        assert!(result.is_err());
        assert!(repo.short_id_exists("g").await.unwrap());
        assert!(!repo.short_id_exists("v").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_short_id() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());
        repo.create(&NewBoard::new("b", "Random").with_nsfw(true))
            .await
            .unwrap();

        let board = repo.get_by_short_id("b").await.unwrap().unwrap();
        assert_eq!(board.name, "Random");
        assert!(board.nsfw);
        assert!(repo.get_by_short_id("zz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_board() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());
        let board = repo.create(&NewBoard::new("g", "Technology")).await.unwrap();

        let update = BoardUpdate::new()
            .name("Tech")
            .description(Some("Computers".to_string()))
            .max_file_size(1024)
            .is_active(false);
        let updated = repo.update(board.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.name, "Tech");
        assert_eq!(updated.description.as_deref(), Some("Computers"));
        assert_eq!(updated.max_file_size, 1024);
        assert!(!updated.is_active);

        assert!(repo.update(999, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_active_ordering() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        repo.create(&NewBoard::new("c", "C").with_sort_order(2))
            .await
            .unwrap();
        repo.create(&NewBoard::new("a", "A").with_sort_order(0))
            .await
            .unwrap();
        let hidden = repo
            .create(&NewBoard::new("h", "Hidden").with_sort_order(1))
            .await
            .unwrap();
        repo.update(hidden.id, &BoardUpdate::new().is_active(false))
            .await
            .unwrap();

        let active: Vec<String> = repo
            .list_active()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.short_id)
            .collect();
        assert_eq!(active, vec!["a", "c"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_reorder() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        let a = repo.create(&NewBoard::new("a", "A")).await.unwrap();
        let b = repo.create(&NewBoard::new("b", "B")).await.unwrap();
        let c = repo.create(&NewBoard::new("c", "C")).await.unwrap();

        repo.reorder(&[c.id, a.id, b.id]).await.unwrap();

        let order: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.short_id)
            .collect();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_reorder_unknown_id_rolls_back() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());

        let a = repo.create(&NewBoard::new("a", "A")).await.unwrap();
        let b = repo
            .create(&NewBoard::new("b", "B").with_sort_order(1))
            .await
            .unwrap();

        let result = repo.reorder(&[b.id, 999, a.id]).await;
        assert!(matches!(result, Err(ChanError::NotFound(_))));

        let b = repo.get_by_id(b.id).await.unwrap().unwrap();
        assert_eq!(b.sort_order, 1);
    }

    #[tokio::test]
    async fn test_delete_board() {
        let db = setup_db().await;
        let repo = BoardRepository::new(db.pool());
        let board = repo.create(&NewBoard::new("g", "Technology")).await.unwrap();

        assert!(repo.delete(board.id).await.unwrap());
        assert!(!repo.delete(board.id).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }
}
