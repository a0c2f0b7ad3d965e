//! Embedding backend trait.
//!
//! `OnnxEmbedder` (feature `onnx`) is the production backend. The trait is
//! the seam the classifier is built against, so tests can supply their own.

use ndarray::Array1;

/// Result of an embedding operation.
pub struct EmbeddingResult {
    /// Float32 embedding vector (384-dim for all-MiniLM-L6-v2).
    pub embedding: Array1<f32>,
}

/// Trait for embedding backends.
pub trait EmbedderBackend: Send + Sync {
    /// Generate an embedding for a text string.
    /// Returns None if the text could not be embedded.
    fn embed(&self, text: &str) -> Option<EmbeddingResult>;

    /// Generate embeddings for a batch of texts.
    fn embed_batch(&self, texts: &[&str]) -> Vec<Option<EmbeddingResult>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Get the embedding dimension.
    fn dimension(&self) -> usize;

    /// Check if the embedder is available (model loaded).
    fn is_available(&self) -> bool;
}
