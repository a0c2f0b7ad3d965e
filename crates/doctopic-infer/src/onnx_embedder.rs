//! ONNX-based sentence embeddings using all-MiniLM-L6-v2.
//!
//! Loads a SentenceTransformers ONNX export and its tokenizer, runs the
//! model, mean-pools token embeddings and L2-normalizes the result. The
//! tokenizer truncates input to the model's 256-token window, keeping the
//! `[CLS]`/`[SEP]` markers. Nothing is retained between calls. Requires
//! the `onnx` feature.

#[cfg(feature = "onnx")]
mod inner {
    use std::path::Path;
    use std::sync::Arc;

    use doctopic_core::{Error, Result};
    use ndarray::Array1;
    use ort::session::Session;
    use ort::value::Tensor;
    use parking_lot::Mutex;
    use tokenizers::{Tokenizer, TruncationParams};
    use tracing::{info, warn};

    use crate::embedder::{EmbedderBackend, EmbeddingResult};

    /// Token window of all-MiniLM-L6-v2 as configured by SentenceTransformers.
    const MAX_SEQ_LEN: usize = 256;

    /// Embedding dimension of all-MiniLM-L6-v2.
    const DEFAULT_DIM: usize = 384;

    pub struct OnnxEmbedder {
        session: Arc<Mutex<Session>>,
        tokenizer: Tokenizer,
        dimension: usize,
    }

    impl OnnxEmbedder {
        /// Load `model.onnx` and `tokenizer.json` from `model_dir`.
        pub fn load(model_dir: &Path) -> Result<Self> {
            let model_path = model_dir.join("model.onnx");
            let tokenizer_path = model_dir.join("tokenizer.json");

            if !model_path.exists() {
                return Err(Error::Startup(format!(
                    "Model not found: {}",
                    model_path.display()
                )));
            }
            if !tokenizer_path.exists() {
                return Err(Error::Startup(format!(
                    "Tokenizer not found: {}",
                    tokenizer_path.display()
                )));
            }

            // With load-dynamic, ORT_DYLIB_PATH must point to libonnxruntime.
            ort::init().commit();

            let session = Session::builder()
                .map_err(|e| startup("create session builder", e))?
                .with_intra_threads(2)
                .map_err(|e| startup("set threads", e))?
                .commit_from_file(&model_path)
                .map_err(|e| startup("load ONNX model", e))?;

            let mut tokenizer = Tokenizer::from_file(&tokenizer_path)
                .map_err(|e| startup("load tokenizer", e))?;
            configure_tokenizer(&mut tokenizer)?;

            info!(
                "ONNX embedder loaded: dim={}, model={}",
                DEFAULT_DIM,
                model_path.display()
            );

            Ok(Self {
                session: Arc::new(Mutex::new(session)),
                tokenizer,
                dimension: DEFAULT_DIM,
            })
        }

        fn infer(&self, text: &str) -> Option<Array1<f32>> {
            let encoding = self
                .tokenizer
                .encode(text, true)
                .map_err(|e| warn!("Tokenization failed: {}", e))
                .ok()?;

            let input_ids = encoding.get_ids();
            let attention_mask = encoding.get_attention_mask();
            let seq_len = input_ids.len();

            let ids_data: Vec<i64> = input_ids.iter().map(|&id| id as i64).collect();
            let mask_data: Vec<i64> = attention_mask.iter().map(|&m| m as i64).collect();
            let type_ids_data: Vec<i64> = vec![0i64; seq_len];

            let ids_tensor = Tensor::from_array(([1usize, seq_len], ids_data))
                .map_err(|e| warn!("Failed to create ids tensor: {}", e))
                .ok()?;
            let mask_tensor = Tensor::from_array(([1usize, seq_len], mask_data))
                .map_err(|e| warn!("Failed to create mask tensor: {}", e))
                .ok()?;
            let type_ids_tensor = Tensor::from_array(([1usize, seq_len], type_ids_data))
                .map_err(|e| warn!("Failed to create type_ids tensor: {}", e))
                .ok()?;

            let mut session = self.session.lock();
            let outputs = session
                .run(ort::inputs![ids_tensor, mask_tensor, type_ids_tensor])
                .map_err(|e| warn!("ONNX inference failed: {}", e))
                .ok()?;

            // Either token embeddings [1, seq_len, dim] or a pooled [1, dim].
            let (shape, data) = outputs[0]
                .try_extract_tensor::<f32>()
                .map_err(|e| warn!("Failed to extract output tensor: {}", e))
                .ok()?;
            let dims: Vec<i64> = shape.iter().copied().collect();

            let pooled = match dims.as_slice() {
                [_, _, dim] => {
                    let dim = *dim as usize;
                    let mask_sum: f32 = attention_mask.iter().map(|&m| m as f32).sum();
                    if mask_sum < 1e-9 {
                        return None;
                    }
                    let mut pooled = Array1::<f32>::zeros(dim);
                    for (i, _) in attention_mask.iter().enumerate().filter(|&(_, &m)| m > 0) {
                        let offset = i * dim;
                        for d in 0..dim {
                            pooled[d] += data[offset + d];
                        }
                    }
                    pooled / mask_sum
                }
                [_, dim] => Array1::from_vec(data[..*dim as usize].to_vec()),
                other => {
                    warn!("Unexpected output shape: {:?}", other);
                    return None;
                }
            };

            let norm = pooled.dot(&pooled).sqrt();
            Some(if norm > 1e-12 { pooled / norm } else { pooled })
        }
    }

    /// Truncate to the model window inside the tokenizer so the special
    /// tokens added by the post-processor survive; no padding for
    /// single-sequence batches.
    pub(crate) fn configure_tokenizer(tokenizer: &mut Tokenizer) -> Result<()> {
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQ_LEN,
                ..Default::default()
            }))
            .map_err(|e| startup("configure truncation", e))?;
        tokenizer.with_padding(None);
        Ok(())
    }

    fn startup(what: &str, e: impl std::fmt::Display) -> Error {
        Error::Startup(format!("Failed to {}: {}", what, e))
    }

    impl EmbedderBackend for OnnxEmbedder {
        fn embed(&self, text: &str) -> Option<EmbeddingResult> {
            self.infer(text).map(|embedding| EmbeddingResult { embedding })
        }

        fn dimension(&self) -> usize {
            self.dimension
        }

        fn is_available(&self) -> bool {
            true
        }
    }
}

#[cfg(feature = "onnx")]
pub use inner::OnnxEmbedder;
