//! Core library functions for jukebox

pub mod credentials;
pub mod fetcher;
pub mod queue;

pub use credentials::CredentialStore;
pub use fetcher::{Fetcher, YtDlpFetcher};
pub use queue::QueueStore;
