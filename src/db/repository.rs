//! User repository for chanboard.
//!
//! This module provides CRUD operations for staff accounts.

use sqlx::QueryBuilder;

use super::user::{NewUser, Role, User, UserUpdate};
use super::{DbPool, SQL_NOW, SQL_TRUE};
use crate::{ChanError, Result};

const USER_COLUMNS: &str = "id, username, password, role, is_active, created_at, last_login";

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given database pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Returns the created user with the assigned ID.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO users (username, password, role) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&new_user.username)
        .bind(&new_user.password)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| ChanError::NotFound("user".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(row.map(UserRow::into_user))
    }

    /// Get a user by username (case-insensitive).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1 COLLATE NOCASE");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(row.map(UserRow::into_user))
    }

    /// Update a user by ID.
    ///
    /// Only fields that are set in the update will be modified.
    /// Returns the updated user, or None if not found.
    pub async fn update(&self, id: i64, update: &UserUpdate) -> Result<Option<User>> {
        if update.is_empty() {
            return self.get_by_id(id).await;
        }

        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE users SET ");
        let mut separated = query.separated(", ");

        if let Some(ref password) = update.password {
            separated.push("password = ");
            separated.push_bind_unseparated(password.clone());
        }
        if let Some(role) = update.role {
            separated.push("role = ");
            separated.push_bind_unseparated(role.as_str().to_string());
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

    /// Update the last login timestamp for a user.
    pub async fn update_last_login(&self, id: i64) -> Result<()> {
        let sql = format!("UPDATE users SET last_login = {SQL_NOW} WHERE id = $1");
        sqlx::query(&sql)
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a user by ID.
    ///
    /// Returns true if a user was deleted.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(result.rows_affected() > 0)
    }

    /// List all users ordered by ID.
    pub async fn list(&self) -> Result<Vec<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id ASC");
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .fetch_all(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(UserRow::into_user).collect())
    }

    /// Count active users with the given role.
    pub async fn count_active_by_role(&self, role: Role) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM users WHERE role = $1 AND is_active = {SQL_TRUE}");
        let count: i64 = sqlx::query_scalar(&sql)
            .bind(role.as_str())
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await
            .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(count)
    }

    /// Check if a username is already taken (case-insensitive).
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1 COLLATE NOCASE)",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await
        .map_err(|e| ChanError::Database(e.to_string()))?;
        Ok(exists)
    }
}

/// Internal struct for mapping database rows to User.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    role: String,
    is_active: bool,
    created_at: String,
    last_login: Option<String>,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password: self.password,
            role: self.role.parse().unwrap_or(Role::Moderator),
            is_active: self.is_active,
            created_at: self.created_at,
            last_login: self.last_login,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup_db() -> Database {
        Database::open_in_memory().await.unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        let user = repo.create(&NewUser::new("janitor", "hash")).await.unwrap();

        assert_eq!(user.id, 1);
        assert_eq!(user.username, "janitor");
        assert_eq!(user.role, Role::Moderator);
        assert!(user.is_active);
        assert!(user.last_login.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_case_insensitive() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("Admin", "hash")).await.unwrap();
        let result = repo.create(&NewUser::new("admin", "hash")).await;
        assert!(result.is_err());
        assert!(repo.username_exists("ADMIN").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_by_username_case_insensitive() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        repo.create(&NewUser::new("Moot", "hash")).await.unwrap();

        let user = repo.get_by_username("moot").await.unwrap().unwrap();
        assert_eq!(user.username, "Moot");
        assert!(repo.get_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        let user = repo.create(&NewUser::new("mod", "hash")).await.unwrap();

        let update = UserUpdate::new().role(Role::Admin).is_active(false);
        let updated = repo.update(user.id, &update).await.unwrap().unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert!(!updated.is_active);
        assert!(repo.update(999, &update).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        let user = repo.create(&NewUser::new("mod", "hash")).await.unwrap();

        repo.update_last_login(user.id).await.unwrap();

        let user = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert!(user.last_login.is_some());
    }

    #[tokio::test]
    async fn test_count_active_by_role() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());

        repo.create(&NewUser::new("a1", "h").with_role(Role::Admin))
            .await
            .unwrap();
        let a2 = repo
            .create(&NewUser::new("a2", "h").with_role(Role::Admin))
            .await
            .unwrap();
        repo.create(&NewUser::new("m1", "h")).await.unwrap();

        assert_eq!(repo.count_active_by_role(Role::Admin).await.unwrap(), 2);
        repo.update(a2.id, &UserUpdate::new().is_active(false))
            .await
            .unwrap();
        assert_eq!(repo.count_active_by_role(Role::Admin).await.unwrap(), 1);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_delete_user() {
        let db = setup_db().await;
        let repo = UserRepository::new(db.pool());
        let user = repo.create(&NewUser::new("gone", "hash")).await.unwrap();

        assert!(repo.delete(user.id).await.unwrap());
        assert!(!repo.delete(user.id).await.unwrap());
        assert!(repo.list().await.unwrap().is_empty());
    }
}
