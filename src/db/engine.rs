//! Database engine and connection management

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;

/// Database engine wrapper, cheap to clone and shared through app state
#[derive(Debug, Clone)]
pub struct DbEngine {
    pool: SqlitePool,
}

impl DbEngine {
    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Private in-memory database with the full schema
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?
            .pragma("foreign_keys", "ON");

        // one connection that never recycles, otherwise the database vanishes
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .context("Failed to open in-memory database")?;

        let engine = DbEngine { pool };
        create_tables(&engine).await?;
        Ok(engine)
    }
}

/// Open (creating if missing) the SQLite database file
pub async fn setup_sqlite(db_path: &Path) -> Result<DbEngine> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30))
        .pragma("foreign_keys", "ON");

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_timeout(std::time::Duration::from_secs(30))
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    let engine = DbEngine { pool };
    create_tables(&engine).await?;

    Ok(engine)
}

/// Create all database tables
async fn create_tables(engine: &DbEngine) -> Result<()> {
    let pool = engine.pool();

    // User table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS user (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            is_admin INTEGER NOT NULL DEFAULT 0
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_user_username ON user(username);
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create user table")?;

    // Song table; the partial indexes carry the queue invariants
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS song (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            playing INTEGER NOT NULL DEFAULT 0,
            submitter_id INTEGER,
            submitted_at TEXT NOT NULL,
            FOREIGN KEY (submitter_id) REFERENCES user(id) ON DELETE SET NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_song_one_pending
            ON song(submitter_id) WHERE playing = 0;
        CREATE UNIQUE INDEX IF NOT EXISTS idx_song_one_playing
            ON song(playing) WHERE playing = 1;
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create song table")?;

    Ok(())
}
