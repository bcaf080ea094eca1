//! Queue store: song requests waiting for playback

use chrono::Utc;
use tracing::{debug, info};

use crate::db::{DbEngine, SongTable};
use crate::error::{AppError, Result};
use crate::models::Song;

/// Song requests backed by the song table
#[derive(Debug, Clone)]
pub struct QueueStore {
    db: DbEngine,
}

impl QueueStore {
    pub fn new(db: DbEngine) -> Self {
        Self { db }
    }

    /// Queue a request for a submitter
    ///
    /// A submitter with a song still pending gets `None` back and nothing is
    /// stored. The check and the insert are one statement, so concurrent
    /// submissions from the same user cannot both land.
    pub async fn submit(&self, song_name: &str, submitter_id: i64) -> Result<Option<Song>> {
        let name = song_name.trim();
        if name.is_empty() {
            debug!("Ignoring empty song request from user {}", submitter_id);
            return Ok(None);
        }

        let submitted_at = Utc::now();
        match SongTable::insert_pending(&self.db, name, submitter_id, submitted_at).await? {
            Some(id) => {
                info!("Queued '{}' for user {} (song {})", name, submitter_id, id);
                Ok(SongTable::get_by_id(&self.db, id).await?)
            }
            None => {
                debug!("User {} already has a pending song; ignoring '{}'", submitter_id, name);
                Ok(None)
            }
        }
    }

    /// The song flagged as playing, if any
    pub async fn current_playing(&self) -> Result<Option<Song>> {
        Ok(SongTable::get_playing(&self.db).await?)
    }

    /// Up to `limit` pending songs in submission order
    pub async fn pending(&self, limit: i64) -> Result<Vec<Song>> {
        Ok(SongTable::get_pending(&self.db, limit).await?)
    }

    /// The submitter's pending song, if any
    pub async fn pending_for(&self, submitter_id: i64) -> Result<Option<Song>> {
        Ok(SongTable::get_pending_by_submitter(&self.db, submitter_id).await?)
    }

    /// Start playing a song; the previously playing one is finished and removed
    pub async fn start_playing(&self, song_id: i64) -> Result<Song> {
        if !SongTable::set_playing(&self.db, song_id).await? {
            return Err(AppError::NotFound("Song"));
        }
        info!("Now playing song {}", song_id);

        SongTable::get_by_id(&self.db, song_id)
            .await?
            .ok_or(AppError::NotFound("Song"))
    }

    /// Drop a song from the queue
    pub async fn remove(&self, song_id: i64) -> Result<bool> {
        let removed = SongTable::delete(&self.db, song_id).await?;
        if removed {
            info!("Removed song {}", song_id);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CredentialStore;

    async fn setup() -> (QueueStore, CredentialStore) {
        let db = DbEngine::in_memory().await.unwrap();
        (QueueStore::new(db.clone()), CredentialStore::new(db))
    }

    #[tokio::test]
    async fn test_second_pending_submission_ignored() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();

        let first = queue.submit("SongA", alice.id).await.unwrap();
        assert_eq!(first.as_ref().map(|s| s.name.as_str()), Some("SongA"));

        let second = queue.submit("SongB", alice.id).await.unwrap();
        assert!(second.is_none());

        let pending = queue.pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "SongA");
        assert_eq!(pending[0].submitter_id, Some(alice.id));
    }

    #[tokio::test]
    async fn test_each_user_gets_one_slot() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();
        let bob = users.create("bob", "pw2", false).await.unwrap();

        assert!(queue.submit("SongA", alice.id).await.unwrap().is_some());
        assert!(queue.submit("SongB", bob.id).await.unwrap().is_some());

        let names: Vec<String> = queue
            .pending(10)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["SongA", "SongB"]);
    }

    #[tokio::test]
    async fn test_pending_respects_limit_and_excludes_playing() {
        let (queue, users) = setup().await;
        let mut first_song = None;
        for i in 0..13 {
            let user = users.create(&format!("user{}", i), "pw", false).await.unwrap();
            let song = queue.submit(&format!("Song{}", i), user.id).await.unwrap();
            first_song.get_or_insert(song.unwrap().id);
        }
        queue.start_playing(first_song.unwrap()).await.unwrap();

        let pending = queue.pending(10).await.unwrap();
        assert_eq!(pending.len(), 10);
        assert!(pending.iter().all(|s| !s.playing));
        assert_eq!(pending[0].name, "Song1");
        assert!(pending.windows(2).all(|w| w[0].id < w[1].id));

        assert!(queue.pending(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_playing_song() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();
        let bob = users.create("bob", "pw2", false).await.unwrap();

        let a = queue.submit("SongA", alice.id).await.unwrap().unwrap();
        let b = queue.submit("SongB", bob.id).await.unwrap().unwrap();

        assert!(queue.current_playing().await.unwrap().is_none());

        queue.start_playing(a.id).await.unwrap();
        assert_eq!(queue.current_playing().await.unwrap().unwrap().id, a.id);

        queue.start_playing(b.id).await.unwrap();
        let playing = queue.current_playing().await.unwrap().unwrap();
        assert_eq!(playing.id, b.id);
        // the finished song is gone
        assert!(queue.pending(10).await.unwrap().is_empty());

        // starting the playing song again changes nothing
        queue.start_playing(b.id).await.unwrap();
        assert_eq!(queue.current_playing().await.unwrap().unwrap().id, b.id);
    }

    #[tokio::test]
    async fn test_can_submit_again_once_playing() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();

        let a = queue.submit("SongA", alice.id).await.unwrap().unwrap();
        queue.start_playing(a.id).await.unwrap();

        let b = queue.submit("SongB", alice.id).await.unwrap();
        assert!(b.is_some());
        assert_eq!(queue.pending_for(alice.id).await.unwrap().unwrap().name, "SongB");
    }

    #[tokio::test]
    async fn test_start_playing_unknown_song() {
        let (queue, _) = setup().await;
        assert!(matches!(
            queue.start_playing(42).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_name_ignored() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();

        assert!(queue.submit("   ", alice.id).await.unwrap().is_none());
        assert!(queue.pending(10).await.unwrap().is_empty());
        // the slot is still free
        assert!(queue.submit("SongA", alice.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_songs_survive_submitter_deletion() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();
        let song = queue.submit("SongA", alice.id).await.unwrap().unwrap();

        users.delete(alice.id).await.unwrap();

        let pending = queue.pending(10).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, song.id);
        assert_eq!(pending[0].submitter_id, None);
    }

    #[tokio::test]
    async fn test_remove() {
        let (queue, users) = setup().await;
        let alice = users.create("alice", "pw1", false).await.unwrap();
        let song = queue.submit("SongA", alice.id).await.unwrap().unwrap();

        assert!(queue.remove(song.id).await.unwrap());
        assert!(!queue.remove(song.id).await.unwrap());
        assert!(queue.submit("SongB", alice.id).await.unwrap().is_some());
    }
}
