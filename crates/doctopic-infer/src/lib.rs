//! DocTopic Infer: sentence embeddings and semantic topic classification.
//!
//! `TopicClassifier` ranks a fixed set of topic labels against a document
//! by cosine similarity of sentence embeddings. With the `onnx` feature,
//! `OnnxEmbedder` runs all-MiniLM-L6-v2 locally for 384-dim embeddings.

pub mod classifier;
pub mod embedder;
pub mod onnx_embedder;
pub mod similarity;

pub use classifier::{Classification, TopicClassifier, DEFAULT_TOP_K};
pub use embedder::{EmbedderBackend, EmbeddingResult};

#[cfg(feature = "onnx")]
pub use onnx_embedder::OnnxEmbedder;

use std::path::Path;
use std::sync::Arc;

use doctopic_core::Result;

/// Create the embedding backend for `model_dir`.
///
/// There is no degraded mode: without a loadable model this fails and the
/// caller is expected to abort startup.
pub fn create_embedder(model_dir: &Path) -> Result<Arc<dyn EmbedderBackend>> {
    #[cfg(feature = "onnx")]
    {
        let embedder = OnnxEmbedder::load(model_dir)?;
        tracing::info!("Using ONNX embedder (dim={})", embedder.dimension());
        Ok(Arc::new(embedder))
    }

    #[cfg(not(feature = "onnx"))]
    {
        Err(doctopic_core::Error::Startup(format!(
            "built without the onnx feature; cannot load model from {}",
            model_dir.display()
        )))
    }
}
