//! Error types for DocTopic.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unsupported file type: {0}. Supported: PDF, DOCX, TXT")]
    UnsupportedFormat(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Startup error: {0}")]
    Startup(String),

    #[error("Keyword data error: {0}")]
    KeywordData(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Short machine-readable name of the variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnsupportedFormat(_) => "unsupported_format",
            Self::Decode(_) => "decode",
            Self::Extraction(_) => "extraction",
            Self::Startup(_) => "startup",
            Self::KeywordData(_) => "keyword_data",
            Self::Inference(_) => "inference",
            Self::Timeout(_) => "timeout",
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
