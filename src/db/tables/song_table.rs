//! Song table operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::db::DbEngine;
use crate::models::Song;

/// Database row for song table
#[derive(Debug, FromRow)]
struct SongRow {
    id: i64,
    name: String,
    playing: bool,
    submitter_id: Option<i64>,
    submitted_at: DateTime<Utc>,
}

impl SongRow {
    fn into_song(self) -> Song {
        Song {
            id: self.id,
            name: self.name,
            playing: self.playing,
            submitter_id: self.submitter_id,
            submitted_at: self.submitted_at,
        }
    }
}

const SONG_COLUMNS: &str = "id, name, playing, submitter_id, submitted_at";

/// Song table operations
pub struct SongTable;

impl SongTable {
    /// Get song by ID
    pub async fn get_by_id(db: &DbEngine, id: i64) -> Result<Option<Song>> {
        let row: Option<SongRow> =
            sqlx::query_as(&format!("SELECT {} FROM song WHERE id = ?", SONG_COLUMNS))
                .bind(id)
                .fetch_optional(db.pool())
                .await?;

        Ok(row.map(|r| r.into_song()))
    }

    /// Get the song flagged as playing
    pub async fn get_playing(db: &DbEngine) -> Result<Option<Song>> {
        let row: Option<SongRow> = sqlx::query_as(&format!(
            "SELECT {} FROM song WHERE playing = 1 LIMIT 1",
            SONG_COLUMNS
        ))
        .fetch_optional(db.pool())
        .await?;

        Ok(row.map(|r| r.into_song()))
    }

    /// Get up to `limit` pending songs, oldest first
    pub async fn get_pending(db: &DbEngine, limit: i64) -> Result<Vec<Song>> {
        let rows: Vec<SongRow> = sqlx::query_as(&format!(
            "SELECT {} FROM song WHERE playing = 0 ORDER BY id LIMIT ?",
            SONG_COLUMNS
        ))
        .bind(limit.max(0))
        .fetch_all(db.pool())
        .await?;

        Ok(rows.into_iter().map(|r| r.into_song()).collect())
    }

    /// Get the pending song of one submitter, if any
    pub async fn get_pending_by_submitter(db: &DbEngine, submitter_id: i64) -> Result<Option<Song>> {
        let row: Option<SongRow> = sqlx::query_as(&format!(
            "SELECT {} FROM song WHERE playing = 0 AND submitter_id = ?",
            SONG_COLUMNS
        ))
        .bind(submitter_id)
        .fetch_optional(db.pool())
        .await?;

        Ok(row.map(|r| r.into_song()))
    }

    /// Insert a pending song unless the submitter already has one
    ///
    /// Returns the new id, or None when the one-pending index rejected it.
    pub async fn insert_pending(
        db: &DbEngine,
        name: &str,
        submitter_id: i64,
        submitted_at: DateTime<Utc>,
    ) -> Result<Option<i64>> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO song (name, playing, submitter_id, submitted_at) VALUES (?, 0, ?, ?)",
        )
        .bind(name)
        .bind(submitter_id)
        .bind(submitted_at)
        .execute(db.pool())
        .await?;

        if result.rows_affected() == 0 {
            Ok(None)
        } else {
            Ok(Some(result.last_insert_rowid()))
        }
    }

    /// Flag a song as playing, dropping the one that played before it
    ///
    /// Returns false when the song does not exist.
    pub async fn set_playing(db: &DbEngine, id: i64) -> Result<bool> {
        let mut tx = db.pool().begin().await?;

        let playing: Option<(bool,)> = sqlx::query_as("SELECT playing FROM song WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;

        match playing {
            None => return Ok(false),
            Some((true,)) => return Ok(true),
            Some((false,)) => {}
        }

        sqlx::query("DELETE FROM song WHERE playing = 1")
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE song SET playing = 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Delete song by ID
    pub async fn delete(db: &DbEngine, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM song WHERE id = ?")
            .bind(id)
            .execute(db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
