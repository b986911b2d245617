//! PDF text extraction.
//!
//! Wraps `pdf-extract` so that a document that cannot be read produces an
//! empty, unsuccessful [`ExtractedText`] instead of an error.

use std::panic::{self, AssertUnwindSafe};

use pdf_extract::{output_doc_page, Document, PlainTextOutput};
use serde::Serialize;

use crate::types::RetrievedDocument;

/// Text of one retrieved document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedText {
    /// URL the document was fetched from.
    pub source_url: String,
    /// Page texts concatenated in page order. Empty on failure.
    pub text: String,
    /// Number of pages read.
    pub pages: usize,
    pub success: bool,
    /// Reason the document could not be opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractedText {
    /// A document that could not be opened as a PDF.
    #[must_use]
    pub fn failed(source_url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            text: String::new(),
            pages: 0,
            success: false,
            error: Some(error.into()),
        }
    }
}

/// Extract the text of a retrieved document, page by page.
///
/// Pages without extractable text contribute an empty string.
pub fn extract(document: &RetrievedDocument) -> ExtractedText {
    let source_url = document.link.url.to_string();

    match extract_pages(&document.bytes) {
        Ok(pages) => {
            let text = pages.concat();
            tracing::debug!(
                url = %source_url,
                pages = pages.len(),
                chars = text.chars().count(),
                "Extracted text"
            );
            ExtractedText {
                source_url,
                text,
                pages: pages.len(),
                success: true,
                error: None,
            }
        }
        Err(error) => {
            tracing::warn!(url = %source_url, %error, "Could not extract text from PDF");
            ExtractedText::failed(source_url, error)
        }
    }
}

/// Per-page text of a PDF held in memory.
///
/// The document must load; after that each page is read on its own, and a
/// page that fails (or panics inside `pdf-extract`) contributes an empty
/// string. Fails only when the document cannot be opened or no page is readable.
fn extract_pages(bytes: &[u8]) -> std::result::Result<Vec<String>, String> {
    let mut doc = guarded(|| Document::load_mem(bytes).map_err(|e| e.to_string()))?;
    if doc.is_encrypted() {
        doc.decrypt("").map_err(|e| format!("encrypted document: {e}"))?;
    }

    let page_numbers: Vec<u32> = doc.get_pages().keys().copied().collect();
    let mut pages = Vec::with_capacity(page_numbers.len());
    let mut unreadable = 0usize;

    for page in page_numbers.iter().copied() {
        match guarded(|| page_text(&doc, page)) {
            Ok(text) => pages.push(text),
            Err(error) => {
                tracing::debug!(page, %error, "Skipping unreadable page");
                unreadable += 1;
                pages.push(String::new());
            }
        }
    }

    if !pages.is_empty() && unreadable == pages.len() {
        return Err(format!("none of {unreadable} page(s) could be read"));
    }
    Ok(pages)
}

fn page_text(doc: &Document, page: u32) -> std::result::Result<String, String> {
    let mut text = String::new();
    {
        let mut output = PlainTextOutput::new(&mut text);
        output_doc_page(doc, &mut output, page).map_err(|e| e.to_string())?;
    }
    Ok(text)
}

/// Run a `pdf-extract` call, turning a panic into an error.
fn guarded<T>(
    f: impl FnOnce() -> std::result::Result<T, String>,
) -> std::result::Result<T, String> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|_| Err("PDF parser panicked on malformed input".to_string()))
}

/// Whether a panic raised at `file` comes from the PDF parser.
fn is_parser_panic(file: &str) -> bool {
    file.contains("pdf-extract") || file.contains("pdf_extract")
}

/// Keep contained parser panics out of terminal output.
///
/// Panics raised inside `pdf-extract` are caught by [`extract`] and reported
/// as unreadable pages; they are logged at debug level instead of going
/// through the default hook. Every other panic is printed as usual.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        match info.location() {
            Some(location) if is_parser_panic(location.file()) => {
                tracing::debug!(%location, "PDF parser panic contained");
            }
            _ => default_hook(info),
        }
    }));
}
