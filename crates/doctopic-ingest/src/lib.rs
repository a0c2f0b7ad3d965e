//! DocTopic Ingest: document text extraction and normalization.

pub mod docx;
pub mod file;
pub mod normalize;
pub mod pdf;

pub use file::{
    extract_content, extract_images, extract_path, extract_text, extract_text_by_name,
    ExtractOptions, ExtractedContent, FileType,
};
pub use normalize::{is_stop_word, normalize, tokenize, word_count};
