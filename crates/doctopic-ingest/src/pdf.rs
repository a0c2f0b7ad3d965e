//! PDF text layer and image extraction via `lopdf`. No OCR.

use doctopic_core::{Error, Result};
use lopdf::Document;
use tracing::{debug, warn};

use crate::file::{ExtractOptions, ExtractedContent};

pub(crate) fn extract(bytes: &[u8], options: ExtractOptions) -> Result<ExtractedContent> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| Error::Extraction(format!("Failed to open PDF: {}", e)))?;

    let pages = doc.get_pages();
    debug!("PDF has {} pages", pages.len());

    let mut text = String::new();
    let mut images = Vec::new();

    // BTreeMap keys are page numbers, so iteration is in document order.
    for (&page_number, &page_id) in &pages {
        if options.text {
            text.push_str(&page_text(&doc, page_number));
        }
        if options.images {
            match doc.get_page_images(page_id) {
                Ok(found) => images.extend(found.into_iter().map(|img| img.content.to_vec())),
                Err(e) => debug!("No images on page {}: {}", page_number, e),
            }
        }
    }

    Ok(ExtractedContent {
        text: options.text.then_some(text),
        images,
    })
}

/// Text layer of one page; empty when the page has none we can decode.
fn page_text(doc: &Document, page_number: u32) -> String {
    match doc.extract_text(&[page_number]) {
        Ok(text) => text,
        Err(e) => {
            warn!("No extractable text on page {}: {}", page_number, e);
            String::new()
        }
    }
}
