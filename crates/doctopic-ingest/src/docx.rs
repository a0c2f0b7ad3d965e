//! DOCX (Office Open XML) text extraction.
//!
//! A `.docx` is a zip container; body text lives in `word/document.xml`
//! as `<w:p>` paragraphs made of `<w:t>` runs. Embedded media sits under
//! `word/media/`.

use std::io::{Cursor, Read};

use doctopic_core::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use zip::ZipArchive;

use crate::file::{ExtractOptions, ExtractedContent};

const DOCUMENT_XML: &str = "word/document.xml";
const MEDIA_PREFIX: &str = "word/media/";

/// Self-closing paragraphs come first so they never open a match that
/// runs on into the next paragraph.
static PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:p(?:\s[^>]*)?/>|<w:p[\s>].*?</w:p>").expect("valid regex")
});

/// Text runs plus the tab/break elements that python-docx style readers
/// render as whitespace. An empty `<w:t/>` matches the first alternative
/// and contributes nothing.
static RUN_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?s)<w:t(?:\s[^>]*)?/>|<w:t(?:\s[^>]*)?>(.*?)</w:t>|<w:(tab|br|cr)(?:\s[^>]*)?/>",
    )
    .expect("valid regex")
});

pub(crate) fn extract(bytes: &[u8], options: ExtractOptions) -> Result<ExtractedContent> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| Error::Extraction(format!("Failed to extract text from DOCX: {}", e)))?;

    let text = if options.text {
        let xml = read_entry(&mut archive, DOCUMENT_XML)?;
        Some(paragraph_text(&String::from_utf8_lossy(&xml)))
    } else {
        None
    };

    let images = if options.images {
        media_entries(&mut archive)?
    } else {
        Vec::new()
    };

    Ok(ExtractedContent { text, images })
}

/// Non-empty paragraphs, each trimmed, one per line.
fn paragraph_text(xml: &str) -> String {
    PARAGRAPH
        .find_iter(xml)
        .map(|p| paragraph(p.as_str()))
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn paragraph(xml: &str) -> String {
    let mut out = String::new();
    for caps in RUN_PART.captures_iter(xml) {
        if let Some(text) = caps.get(1) {
            out.push_str(&unescape(text.as_str()));
        } else if let Some(tag) = caps.get(2) {
            out.push(if tag.as_str() == "tab" { '\t' } else { '\n' });
        }
    }
    out
}

/// Resolve the predefined XML entities and numeric character references.
fn unescape(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..end];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=end]),
        }
        rest = &tail[end + 1..];
    }
    out.push_str(rest);
    out
}

fn read_entry(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| Error::Extraction(format!("DOCX is missing {}: {}", name, e)))?;
    let mut buf = Vec::new();
    entry
        .read_to_end(&mut buf)
        .map_err(|e| Error::Extraction(format!("Failed to read {}: {}", name, e)))?;
    Ok(buf)
}

fn media_entries(archive: &mut ZipArchive<Cursor<&[u8]>>) -> Result<Vec<Vec<u8>>> {
    let mut names: Vec<String> = archive
        .file_names()
        .filter(|n| n.starts_with(MEDIA_PREFIX) && !n.ends_with('/'))
        .map(str::to_string)
        .collect();
    names.sort();

    names
        .iter()
        .map(|name| read_entry(archive, name))
        .collect()
}
