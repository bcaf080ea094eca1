//! Audio fetcher backed by an external yt-dlp compatible executable
//!
//! The executable searches for the query, downloads the best audio stream and
//! transcodes it through its ffmpeg post-processor. Calls block until the
//! tool exits.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run {executable}: {source}")]
    Spawn {
        executable: String,
        source: std::io::Error,
    },

    #[error("download failed ({0})")]
    Download(std::process::ExitStatus),

    #[error("expected output {0} was not written")]
    MissingOutput(PathBuf),
}

/// Retrieves audio for a free-text query
pub trait Fetcher: Send + Sync {
    /// Download the best match for `query` to `output_stem` plus the
    /// fetcher's extension, overwriting it, and return the written path
    fn fetch(&self, query: &str, output_stem: &Path) -> Result<PathBuf, FetchError>;
}

/// Fetcher that shells out to yt-dlp
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    pub executable: String,
    pub audio_format: String,
    pub audio_quality: String,
}

impl YtDlpFetcher {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            executable: config.fetcher_executable.clone(),
            audio_format: config.audio_format.clone(),
            audio_quality: config.audio_quality.clone(),
        }
    }

    /// Path the tool ends up writing for a given stem
    pub fn output_path(&self, output_stem: &Path) -> PathBuf {
        let mut path = output_stem.as_os_str().to_owned();
        path.push(".");
        path.push(&self.audio_format);
        PathBuf::from(path)
    }

    fn build_args(&self, query: &str, output_stem: &Path) -> Vec<OsString> {
        let mut template = output_stem.as_os_str().to_owned();
        template.push(".%(ext)s");

        vec![
            format!("ytsearch1:{}", query).into(),
            "--format".into(),
            "bestaudio/best".into(),
            "--extract-audio".into(),
            "--audio-format".into(),
            self.audio_format.clone().into(),
            "--audio-quality".into(),
            self.audio_quality.clone().into(),
            "--add-metadata".into(),
            "--no-playlist".into(),
            "--force-overwrites".into(),
            "--quiet".into(),
            "--output".into(),
            template,
        ]
    }
}

impl Fetcher for YtDlpFetcher {
    fn fetch(&self, query: &str, output_stem: &Path) -> Result<PathBuf, FetchError> {
        tracing::debug!("Fetching '{}' with {}", query, self.executable);

        let status = Command::new(&self.executable)
            .args(self.build_args(query, output_stem))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .status()
            .map_err(|source| FetchError::Spawn {
                executable: self.executable.clone(),
                source,
            })?;

        if !status.success() {
            return Err(FetchError::Download(status));
        }

        let output = self.output_path(output_stem);
        if !output.exists() {
            return Err(FetchError::MissingOutput(output));
        }

        tracing::info!("Fetched '{}' into {}", query, output.display());
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(executable: &str) -> YtDlpFetcher {
        YtDlpFetcher {
            executable: executable.to_string(),
            audio_format: "mp3".to_string(),
            audio_quality: "192".to_string(),
        }
    }

    #[test]
    fn test_args_search_and_template() {
        let args = fetcher("yt-dlp").build_args("daft punk one more time", Path::new("/tmp/dl/song-7"));
        let args: Vec<String> = args
            .into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();

        assert_eq!(args[0], "ytsearch1:daft punk one more time");
        assert!(args.windows(2).any(|w| w[0] == "--audio-format" && w[1] == "mp3"));
        assert!(args.windows(2).any(|w| w[0] == "--audio-quality" && w[1] == "192"));
        assert_eq!(args.last().unwrap(), "/tmp/dl/song-7.%(ext)s");
    }

    #[test]
    fn test_output_path_per_song() {
        let f = fetcher("yt-dlp");
        assert_eq!(
            f.output_path(Path::new("/tmp/dl/song-7")),
            PathBuf::from("/tmp/dl/song-7.mp3")
        );
        assert_ne!(
            f.output_path(Path::new("/tmp/dl/song-7")),
            f.output_path(Path::new("/tmp/dl/song-8"))
        );
    }

    #[test]
    fn test_missing_executable_is_spawn_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = fetcher("definitely-not-a-real-ytdl-binary")
            .fetch("anything", &dir.path().join("song-1"));
        assert!(matches!(result, Err(FetchError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_tool_is_download_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = fetcher("false").fetch("anything", &dir.path().join("song-1"));
        assert!(matches!(result, Err(FetchError::Download(status)) if !status.success()));
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_tool_is_missing_output() {
        let dir = tempfile::TempDir::new().unwrap();
        let stem = dir.path().join("song-1");
        let result = fetcher("true").fetch("anything", &stem);
        match result {
            Err(FetchError::MissingOutput(path)) => assert_eq!(path, dir.path().join("song-1.mp3")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_output_is_returned() {
        let dir = tempfile::TempDir::new().unwrap();
        let stem = dir.path().join("song-2");
        std::fs::write(dir.path().join("song-2.mp3"), b"audio").unwrap();
        let result = fetcher("true").fetch("anything", &stem).unwrap();
        assert_eq!(result, dir.path().join("song-2.mp3"));
    }
}
