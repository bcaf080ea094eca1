//! Server settings for jukebox
//!
//! This module handles the settings stored in settings.json.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable that switches downloading on submit on or off
pub const FETCH_ON_SUBMIT_ENV: &str = "JUKEBOX_FETCH_ON_SUBMIT";

/// The dashboard never lists more pending songs than this
pub const MAX_DASHBOARD_LIMIT: i64 = 10;

/// Settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Installation id, also the session signing secret
    #[serde(default)]
    pub server_id: String,

    /// Username of the administrator created on first run
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Session cookie lifetime
    #[serde(default = "default_session_max_age")]
    pub session_max_age_secs: i64,

    /// Number of pending songs shown on the dashboard, 1 to 10
    #[serde(default = "default_dashboard_limit")]
    pub dashboard_limit: i64,

    /// Download accepted submissions right away
    #[serde(default)]
    pub fetch_on_submit: bool,

    /// yt-dlp compatible executable
    #[serde(default = "default_fetcher_executable")]
    pub fetcher_executable: String,

    /// Target audio codec
    #[serde(default = "default_audio_format")]
    pub audio_format: String,

    /// Target audio quality (kbps for lossy codecs)
    #[serde(default = "default_audio_quality")]
    pub audio_quality: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_id: String::new(),
            admin_username: default_admin_username(),
            session_max_age_secs: default_session_max_age(),
            dashboard_limit: default_dashboard_limit(),
            fetch_on_submit: false,
            fetcher_executable: default_fetcher_executable(),
            audio_format: default_audio_format(),
            audio_quality: default_audio_quality(),
        }
    }
}

impl AppConfig {
    /// Load settings from file, writing defaults when it does not exist yet
    pub fn load(settings_path: &Path) -> Result<Self> {
        let mut config = if settings_path.exists() {
            let content =
                std::fs::read_to_string(settings_path).context("Failed to read settings file")?;
            serde_json::from_str(&content).context("Failed to parse settings file")?
        } else {
            Self::default()
        };

        if config.server_id.is_empty() {
            config.server_id = uuid::Uuid::new_v4().to_string();
            config.save(settings_path)?;
        } else if !settings_path.exists() {
            config.save(settings_path)?;
        }

        config.clamp_limits();
        config.apply_env();
        Ok(config)
    }

    /// Save settings to file
    pub fn save(&self, settings_path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(settings_path, content).context("Failed to write settings file")?;
        Ok(())
    }

    fn clamp_limits(&mut self) {
        let limit = self.dashboard_limit.clamp(1, MAX_DASHBOARD_LIMIT);
        if limit != self.dashboard_limit {
            tracing::warn!(
                "dashboardLimit {} out of range, using {}",
                self.dashboard_limit,
                limit
            );
            self.dashboard_limit = limit;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(value) = std::env::var(FETCH_ON_SUBMIT_ENV) {
            match parse_flag(&value) {
                Some(flag) => self.fetch_on_submit = flag,
                None => tracing::warn!("Ignoring invalid {} value: {}", FETCH_ON_SUBMIT_ENV, value),
            }
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// Default value functions for serde

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_session_max_age() -> i64 {
    7 * 24 * 3600
}

fn default_dashboard_limit() -> i64 {
    10
}

fn default_fetcher_executable() -> String {
    "yt-dlp".to_string()
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_audio_quality() -> String {
    "192".to_string()
}
