//! Configuration and data directory layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::MatchPolicy;

/// Paths to the static data the service reads at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// One keyword list per topic (`data/topics_keywords/`).
    pub keywords_dir: PathBuf,
    /// Single-object keyword file (`data/topics_keywords.json`).
    pub keywords_file: PathBuf,
    /// Semantic topic labels (`data/metadata/topics.json`).
    pub topic_labels: PathBuf,
    /// Embedding model directory (`data/models/`).
    pub models: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        Self {
            keywords_dir: root.join("topics_keywords"),
            keywords_file: root.join("topics_keywords.json"),
            topic_labels: root.join("metadata").join("topics.json"),
            models: root.join("models"),
            root,
        }
    }

    /// The keyword source to load: the folder layout wins over the
    /// single-file layout when both exist.
    pub fn keyword_source(&self) -> &Path {
        if self.keywords_dir.is_dir() || !self.keywords_file.is_file() {
            &self.keywords_dir
        } else {
            &self.keywords_file
        }
    }
}

/// Top-level DocTopic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTopicConfig {
    /// HTTP server port.
    pub port: u16,
    /// Data directory paths.
    pub data_paths: DataPaths,
    /// Keyword scoring policy used when a request does not pick one.
    pub match_policy: MatchPolicy,
    /// Number of topics returned by semantic classification.
    pub top_k: usize,
    /// Upper bound on extraction or inference for a single request.
    pub request_timeout: Duration,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl DocTopicConfig {
    pub const DEFAULT_PORT: u16 = 8501;
    pub const DEFAULT_TOP_K: usize = 3;
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_lookup(data_dir, |key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reading variables through
    /// `lookup`.
    pub fn from_lookup(
        data_dir: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let port = parse_var(&lookup, "PORT")?.unwrap_or(Self::DEFAULT_PORT);
        let match_policy =
            parse_var(&lookup, "DOCTOPIC_MATCH_POLICY")?.unwrap_or_default();
        let top_k = parse_var(&lookup, "DOCTOPIC_TOP_K")?.unwrap_or(Self::DEFAULT_TOP_K);
        if top_k == 0 {
            return Err(Error::Config("DOCTOPIC_TOP_K must be at least 1".into()));
        }
        let timeout_secs: u64 =
            parse_var(&lookup, "DOCTOPIC_TIMEOUT_SECS")?.unwrap_or(Self::DEFAULT_TIMEOUT_SECS);
        let max_upload_mb: usize =
            parse_var(&lookup, "DOCTOPIC_MAX_UPLOAD_MB")?.unwrap_or(Self::DEFAULT_MAX_UPLOAD_MB);

        let max_upload_bytes = max_upload_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                Error::Config(format!("DOCTOPIC_MAX_UPLOAD_MB is too large: {}", max_upload_mb))
            })?;

        Ok(Self {
            port,
            data_paths: DataPaths::new(data_dir),
            match_policy,
            top_k,
            request_timeout: Duration::from_secs(timeout_secs),
            max_upload_bytes,
        })
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?}: {}", key, raw, e))),
        _ => Ok(None),
    }
}
