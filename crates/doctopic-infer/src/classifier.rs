//! Semantic topic classification.
//!
//! Topic labels are embedded once when the classifier is built; each
//! request embeds the document and ranks labels by cosine similarity.

use std::path::Path;
use std::sync::Arc;

use doctopic_core::{Error, Result, TopTopics, TopicScore, UNKNOWN_TOPIC};
use ndarray::Array1;
use tracing::{debug, info};

use crate::embedder::EmbedderBackend;
use crate::similarity::{argmax, cosine_similarity};

/// Number of topics returned when the caller does not ask for a count.
pub const DEFAULT_TOP_K: usize = 3;

/// Best label plus the ranked top-k for one document.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub topic: String,
    pub top: TopTopics,
}

pub struct TopicClassifier {
    embedder: Arc<dyn EmbedderBackend>,
    labels: Vec<String>,
    label_embeddings: Vec<Array1<f32>>,
}

impl TopicClassifier {
    /// Embed every label up front. Any failure here is fatal: there is no
    /// partially initialized classifier.
    pub fn new(labels: Vec<String>, embedder: Arc<dyn EmbedderBackend>) -> Result<Self> {
        if labels.is_empty() {
            return Err(Error::Startup("no topic labels to classify against".into()));
        }
        if !embedder.is_available() {
            return Err(Error::Startup("embedding model is not available".into()));
        }

        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let label_embeddings = embedder
            .embed_batch(&refs)
            .into_iter()
            .zip(&labels)
            .map(|(result, label)| {
                result.map(|r| r.embedding).ok_or_else(|| {
                    Error::Startup(format!("failed to compute embedding for topic {}", label))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            "Topic classifier ready: {} labels, dim={}",
            labels.len(),
            embedder.dimension()
        );

        Ok(Self {
            embedder,
            labels,
            label_embeddings,
        })
    }

    /// Read a JSON array of labels from `path` and build the classifier.
    pub fn load(path: &Path, embedder: Arc<dyn EmbedderBackend>) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            Error::Startup(format!("failed to load topics {}: {}", path.display(), e))
        })?;
        let labels: Vec<String> = serde_json::from_str(&data).map_err(|e| {
            Error::Startup(format!("failed to parse topics {}: {}", path.display(), e))
        })?;
        Self::new(labels, embedder)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Best matching label, or `"Unknown"` for blank text.
    pub fn classify(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Ok(UNKNOWN_TOPIC.to_string());
        }

        let scores = self.similarities(text)?;
        self.best_label(&scores)
    }

    /// The `k` best labels with similarities normalized to sum to 100.
    ///
    /// Similarities are divided by their sum as-is, so the percentages are
    /// only meaningful when every similarity is non-negative. `k` beyond
    /// the number of labels returns all labels.
    pub fn top_k(&self, text: &str, k: usize) -> Result<TopTopics> {
        if text.trim().is_empty() {
            return Ok(TopTopics::unknown());
        }

        let scores = self.similarities(text)?;
        Ok(self.rank(&scores, k))
    }

    /// [`classify`](Self::classify) and [`top_k`](Self::top_k) from a single
    /// embedding of `text`.
    pub fn analyze(&self, text: &str, k: usize) -> Result<Classification> {
        if text.trim().is_empty() {
            return Ok(Classification {
                topic: UNKNOWN_TOPIC.to_string(),
                top: TopTopics::unknown(),
            });
        }

        let scores = self.similarities(text)?;
        Ok(Classification {
            topic: self.best_label(&scores)?,
            top: self.rank(&scores, k),
        })
    }

    fn best_label(&self, scores: &[f32]) -> Result<String> {
        let best = argmax(scores)
            .ok_or_else(|| Error::Internal("classifier has no labels".into()))?;
        Ok(self.labels[best].clone())
    }

    fn rank(&self, scores: &[f32], k: usize) -> TopTopics {
        let normalized = normalize_to_percent(scores);

        let mut ranked: Vec<usize> = (0..normalized.len()).collect();
        ranked.sort_by(|&a, &b| {
            normalized[b]
                .partial_cmp(&normalized[a])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        TopTopics(
            ranked
                .into_iter()
                .take(k)
                .map(|i| TopicScore {
                    topic: self.labels[i].clone(),
                    score: normalized[i],
                })
                .collect(),
        )
    }

    /// Embeds `text` once; the document embedding is dropped on return.
    fn similarities(&self, text: &str) -> Result<Vec<f32>> {
        let result = self
            .embedder
            .embed(text)
            .ok_or_else(|| Error::Inference("failed to embed document text".into()))?;
        debug!("Embedded {} chars", text.len());

        Ok(self
            .label_embeddings
            .iter()
            .map(|label| cosine_similarity(&result.embedding, label))
            .collect())
    }
}

/// `score / sum * 100`; all zeros when the sum is zero or not finite.
fn normalize_to_percent(scores: &[f32]) -> Vec<f64> {
    let sum: f64 = scores.iter().map(|&s| s as f64).sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; scores.len()];
    }
    scores.iter().map(|&s| s as f64 / sum * 100.0).collect()
}
