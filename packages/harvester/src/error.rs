//! Error types for the harvester.
//!
//! `HarvesterError` covers every fatal condition of a harvest. Failures on
//! individual candidate links are not errors: they surface as
//! [`Rejection`](crate::types::Rejection) values inside a discovery report.

use thiserror::Error;

use crate::types::Jurisdiction;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// Input was empty after trimming.
    #[error("No guidance code or URL given")]
    EmptyInput,

    /// Input looked like a URL but could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// URL host belongs to none of the supported authorities.
    #[error("Unsupported domain '{0}'. Supported: nice.org.uk, g-ba.de, has-sante.fr")]
    UnsupportedDomain(String),

    /// Bare input is not a usable guidance code.
    #[error("Invalid guidance code: '{0}'. Expected letters, digits and hyphens (e.g., ta1044)")]
    InvalidGuidanceCode(String),

    /// Jurisdiction recognized but no validated PDF was discovered.
    #[error("No PDF document found for {target} ({jurisdiction})")]
    NotFound {
        jurisdiction: Jurisdiction,
        target: String,
    },

    /// Some documents could not be read. Reported as a warning, never returned as `Err`.
    #[error("Text extraction failed for {failed} of {total} documents")]
    PartialExtraction { failed: usize, total: usize },

    /// Nothing readable came out of the retrieved documents.
    #[error("No text could be extracted from {documents} retrieved document(s)")]
    EmptyCorpus { documents: usize },

    /// HTTP client failure outside of per-candidate fetching.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// CSS selector in a discovery rule failed to parse.
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarvesterError {
    /// Name of the pipeline stage that produced this error.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::InvalidGuidanceCode(_) => "input",
            Self::InvalidUrl { .. } | Self::UnsupportedDomain(_) => "routing",
            Self::NotFound { .. } | Self::Http(_) | Self::Selector { .. } => "retrieval",
            Self::PartialExtraction { .. } | Self::EmptyCorpus { .. } => "extraction",
            Self::Io(_) => "output",
        }
    }
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
