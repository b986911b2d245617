//! Corpus building: joins extracted texts and bounds them for the prompt.

use serde::Serialize;

use crate::config::{DOCUMENT_SEPARATOR, MAX_CORPUS_CHARS};
use crate::error::HarvesterError;
use crate::extract::ExtractedText;

/// Size-bounded text handed to the summarization service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Corpus {
    /// Concatenated text, at most the character budget long.
    pub text: String,
    /// Whether text was cut to fit the budget.
    pub truncated: bool,
    /// Documents that went into the corpus.
    pub documents: usize,
    /// Documents that could not be read.
    pub failed: usize,
    /// Non-fatal problems, e.g. partial extraction failure.
    pub warnings: Vec<String>,
}

impl Corpus {
    /// Whether the corpus has any non-whitespace text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Number of characters in the corpus.
    #[must_use]
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// The partial-failure condition, if some but not all documents failed.
    #[must_use]
    pub fn partial_failure(&self) -> Option<HarvesterError> {
        (self.failed > 0 && self.failed < self.documents).then_some(
            HarvesterError::PartialExtraction {
                failed: self.failed,
                total: self.documents,
            },
        )
    }
}

/// Build a corpus with the default character budget.
pub fn build(texts: &[ExtractedText]) -> Corpus {
    build_with_limit(texts, MAX_CORPUS_CHARS)
}

/// Concatenate texts in input order and cut to `max_chars` characters.
///
/// Successful documents are joined with a blank line; failed documents
/// contribute nothing. The cut is a hard suffix cut on character boundaries.
pub fn build_with_limit(texts: &[ExtractedText], max_chars: usize) -> Corpus {
    let joined = texts
        .iter()
        .filter(|t| t.success)
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR);

    let (text, truncated) = truncate_chars(&joined, max_chars);
    let failed = texts.iter().filter(|t| !t.success).count();

    let mut corpus = Corpus {
        text: text.to_string(),
        truncated,
        documents: texts.len(),
        failed,
        warnings: Vec::new(),
    };

    if let Some(partial) = corpus.partial_failure() {
        tracing::warn!(failed, total = texts.len(), "Partial extraction failure");
        corpus.warnings.push(partial.to_string());
        for text in texts.iter().filter(|t| !t.success) {
            corpus.warnings.push(format!(
                "{}: {}",
                text.source_url,
                text.error.as_deref().unwrap_or("unreadable")
            ));
        }
    }

    if truncated {
        tracing::debug!(
            original_chars = joined.chars().count(),
            max_chars,
            "Corpus truncated"
        );
    }

    corpus
}

/// First `max_chars` characters of `text`, and whether anything was cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}
