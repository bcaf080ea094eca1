//! Song request model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A queued song request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Database ID, also the queue position
    pub id: i64,
    /// Free-text name as typed by the submitter
    pub name: String,
    /// Whether this is the song currently playing
    pub playing: bool,
    /// Submitting user; cleared when that user is deleted
    pub submitter_id: Option<i64>,
    /// When the request was accepted
    pub submitted_at: DateTime<Utc>,
}
