//! File text extraction, dispatched on file extension.

use std::path::Path;

use doctopic_core::{Error, Result};
use tracing::debug;

use crate::{docx, pdf};

/// Supported document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Pdf,
    Docx,
    Txt,
}

impl FileType {
    /// Detect file type from an extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }

    /// Detect file type from a file name, rejecting anything unsupported.
    pub fn from_filename(name: &str) -> Result<Self> {
        Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| Error::UnsupportedFormat(name.to_string()))
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
        }
    }
}

/// What to pull out of a document.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    pub text: bool,
    pub images: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            text: true,
            images: true,
        }
    }
}

/// Text and embedded images of one document.
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// `None` when text was not requested.
    pub text: Option<String>,
    pub images: Vec<Vec<u8>>,
}

/// Extract text and/or images from a document in one pass.
pub fn extract_content(
    bytes: &[u8],
    file_type: FileType,
    options: ExtractOptions,
) -> Result<ExtractedContent> {
    let content = match file_type {
        FileType::Pdf => pdf::extract(bytes, options)?,
        FileType::Docx => docx::extract(bytes, options)?,
        FileType::Txt => ExtractedContent {
            text: if options.text {
                Some(decode_txt(bytes)?)
            } else {
                None
            },
            images: Vec::new(),
        },
    };

    debug!(
        "Extracted {} chars and {} images from {} document",
        content.text.as_ref().map_or(0, |t| t.len()),
        content.images.len(),
        file_type.extension()
    );
    Ok(content)
}

/// Extract all text from a document.
pub fn extract_text(bytes: &[u8], file_type: FileType) -> Result<String> {
    let content = extract_content(
        bytes,
        file_type,
        ExtractOptions {
            text: true,
            images: false,
        },
    )?;
    Ok(content.text.unwrap_or_default())
}

/// Extract embedded images (raw stream bytes) from a document.
pub fn extract_images(bytes: &[u8], file_type: FileType) -> Result<Vec<Vec<u8>>> {
    let content = extract_content(
        bytes,
        file_type,
        ExtractOptions {
            text: false,
            images: true,
        },
    )?;
    Ok(content.images)
}

/// Extract text, choosing the format from `filename`'s extension.
pub fn extract_text_by_name(filename: &str, bytes: &[u8]) -> Result<String> {
    let file_type = FileType::from_filename(filename)?;
    extract_text(bytes, file_type)
}

/// Read a document from disk and extract its text.
pub fn extract_path(path: &Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let file_type = FileType::from_filename(name)?;
    let bytes = std::fs::read(path)?;
    extract_text(&bytes, file_type)
}

fn decode_txt(bytes: &[u8]) -> Result<String> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::Decode(format!("Failed to extract text from TXT file: {}", e)))?;
    Ok(text.trim().to_string())
}
