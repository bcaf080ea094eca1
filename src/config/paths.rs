//! Path management for jukebox
//!
//! Resolves the configuration directory and everything that lives inside it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Filesystem locations used by the server
#[derive(Debug, Clone)]
pub struct Paths {
    /// Config directory path
    config_dir: PathBuf,
}

impl Paths {
    /// Resolve paths and create the directories that must exist
    pub fn init(config: Option<PathBuf>) -> Result<Self> {
        let paths = Self::new(config);
        paths.create_directories()?;
        Ok(paths)
    }

    fn new(config_override: Option<PathBuf>) -> Self {
        let config_parent = if let Some(path) = config_override {
            path
        } else if let Ok(exe) = std::env::current_exe() {
            exe.parent().unwrap_or(Path::new(".")).to_path_buf()
        } else {
            directories::ProjectDirs::from("", "", "jukebox")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        // hidden folder when living directly under $HOME
        let config_dir_name = if is_home_dir(&config_parent) {
            ".jukebox"
        } else {
            "jukebox"
        };

        let config_dir = config_parent.join(config_dir_name);

        Self { config_dir }
    }

    fn create_directories(&self) -> Result<()> {
        std::fs::create_dir_all(&self.config_dir)
            .with_context(|| format!("Failed to create {}", self.config_dir.display()))?;
        std::fs::create_dir_all(self.downloads_dir())
            .with_context(|| format!("Failed to create {}", self.downloads_dir().display()))?;
        Ok(())
    }

    /// Get the config directory
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the database path
    pub fn app_db_path(&self) -> PathBuf {
        self.config_dir.join("jukebox.db")
    }

    /// Get the settings file path
    pub fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    /// Directory fetched audio is written into
    pub fn downloads_dir(&self) -> PathBuf {
        self.config_dir.join("downloads")
    }

    /// Output stem for a song's download; the fetcher appends the extension
    pub fn song_output_stem(&self, song_id: i64) -> PathBuf {
        self.downloads_dir().join(format!("song-{}", song_id))
    }
}

/// Check if a path is in the user's home directory
fn is_home_dir(path: &Path) -> bool {
    directories::UserDirs::new()
        .map(|dirs| path.starts_with(dirs.home_dir()))
        .unwrap_or(false)
}
