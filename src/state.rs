//! Shared application state handed to every request

use std::sync::Arc;

use crate::config::{AppConfig, Paths};
use crate::core::{CredentialStore, Fetcher, QueueStore};
use crate::db::DbEngine;

/// Request-independent handles, registered as `web::Data<AppState>`
pub struct AppState {
    pub users: CredentialStore,
    pub queue: QueueStore,
    pub config: AppConfig,
    pub paths: Paths,
    /// Present only when accepted submissions should be downloaded
    pub fetcher: Option<Arc<dyn Fetcher>>,
}

impl AppState {
    pub fn new(
        db: DbEngine,
        config: AppConfig,
        paths: Paths,
        fetcher: Option<Arc<dyn Fetcher>>,
    ) -> Self {
        Self {
            users: CredentialStore::new(db.clone()),
            queue: QueueStore::new(db),
            config,
            paths,
            fetcher,
        }
    }
}
