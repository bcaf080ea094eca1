//! User table operations

use anyhow::Result;
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::User;

/// Database row for user table
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    is_admin: bool,
}

impl UserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            password: self.password,
            is_admin: self.is_admin,
        }
    }
}

/// User table operations
pub struct UserTable;

impl UserTable {
    /// Get all users in creation order
    pub async fn all(db: &DbEngine) -> Result<Vec<User>> {
        let rows: Vec<UserRow> =
            sqlx::query_as("SELECT id, username, password, is_admin FROM user ORDER BY id")
                .fetch_all(db.pool())
                .await?;

        Ok(rows.into_iter().map(|r| r.into_user()).collect())
    }

    /// Get user by ID
    pub async fn get_by_id(db: &DbEngine, id: i64) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, password, is_admin FROM user WHERE id = ?")
                .bind(id)
                .fetch_optional(db.pool())
                .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Get user by username
    pub async fn get_by_username(db: &DbEngine, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT id, username, password, is_admin FROM user WHERE username = ?")
                .bind(username)
                .fetch_optional(db.pool())
                .await?;

        Ok(row.map(|r| r.into_user()))
    }

    /// Insert a user, returning the new id
    ///
    /// Errors with a unique violation when the username is taken.
    pub async fn insert(
        db: &DbEngine,
        username: &str,
        password_hash: &str,
        is_admin: bool,
    ) -> std::result::Result<i64, sqlx::Error> {
        let result = sqlx::query("INSERT INTO user (username, password, is_admin) VALUES (?, ?, ?)")
            .bind(username)
            .bind(password_hash)
            .bind(is_admin)
            .execute(db.pool())
            .await?;

        Ok(result.last_insert_rowid())
    }

    /// Update only the password for a user
    pub async fn update_password(db: &DbEngine, id: i64, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE user SET password = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete user by ID
    pub async fn delete(db: &DbEngine, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Get user count
    pub async fn count(db: &DbEngine) -> Result<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
            .fetch_one(db.pool())
            .await?;

        Ok(row.0)
    }

    /// Check if any users exist
    pub async fn has_users(db: &DbEngine) -> Result<bool> {
        Ok(Self::count(db).await? > 0)
    }
}
