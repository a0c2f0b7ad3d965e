//! Topic → keyword list loading and the shared, swappable store.
//!
//! Two layouts are accepted:
//! - a single JSON file holding an object of `topic -> [keywords]`;
//! - a folder with one JSON list per topic, named `<Topic>.json`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use doctopic_core::{Error, Result};
use parking_lot::RwLock;
use tracing::{debug, info, warn};

/// Topic name → keyword list.
pub type TopicKeywords = BTreeMap<String, Vec<String>>;

/// Load keywords from either layout, picking by what `source` is.
pub fn load(source: &Path) -> Result<TopicKeywords> {
    if source.is_dir() {
        load_folder(source)
    } else {
        load_file(source)
    }
}

/// Load a single JSON object of topic → keyword list.
pub fn load_file(path: &Path) -> Result<TopicKeywords> {
    let data = read_to_string(path)?;
    serde_json::from_str(&data).map_err(|e| load_error(path, e))
}

/// Load every `*.json` file in `dir` (non-recursive). Each file holds a
/// flat list of keywords; its stem is the topic name.
pub fn load_folder(dir: &Path) -> Result<TopicKeywords> {
    let entries = std::fs::read_dir(dir).map_err(|e| load_error(dir, e))?;

    let mut topics = TopicKeywords::new();
    for entry in entries {
        let path = entry.map_err(|e| load_error(dir, e))?.path();
        if !path.is_file() || !is_json(&path) {
            continue;
        }
        let Some(topic) = path.file_stem().and_then(|s| s.to_str()) else {
            warn!("Skipping keyword file with non UTF-8 name: {}", path.display());
            continue;
        };

        let data = read_to_string(&path)?;
        let keywords: Vec<String> =
            serde_json::from_str(&data).map_err(|e| load_error(&path, e))?;
        debug!("Loaded {} keywords for topic {}", keywords.len(), topic);
        topics.insert(topic.to_string(), keywords);
    }

    Ok(topics)
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

fn read_to_string(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| load_error(path, e))
}

fn load_error(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::KeywordData(format!("failed to load {}: {}", path.display(), e))
}

/// Read-mostly keyword store. Readers take a snapshot; [`reload`](Self::reload)
/// replaces the whole mapping at once.
pub struct KeywordStore {
    source: PathBuf,
    current: RwLock<Arc<TopicKeywords>>,
}

impl KeywordStore {
    /// Load `source` and build the store. Any load failure is a startup
    /// error.
    pub fn open(source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let topics = load(&source).map_err(|e| match e {
            Error::KeywordData(msg) => Error::Startup(msg),
            other => other,
        })?;
        info!(
            "Loaded {} keyword topics from {}",
            topics.len(),
            source.display()
        );
        Ok(Self {
            source,
            current: RwLock::new(Arc::new(topics)),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// The current mapping. Stays valid across reloads.
    pub fn snapshot(&self) -> Arc<TopicKeywords> {
        self.current.read().clone()
    }

    /// Keywords of one topic, if known.
    pub fn keywords(&self, topic: &str) -> Option<Vec<String>> {
        self.current.read().get(topic).cloned()
    }

    /// Sorted topic names.
    pub fn topic_names(&self) -> Vec<String> {
        self.current.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Re-read the source. On failure the previous mapping is kept and the
    /// error is [`Error::KeywordData`].
    pub fn reload(&self) -> Result<usize> {
        let topics = Arc::new(load(&self.source)?);
        let count = topics.len();
        *self.current.write() = topics;
        info!("Reloaded {} keyword topics from {}", count, self.source.display());
        Ok(count)
    }
}
