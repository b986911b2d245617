//! Core data types shared by the harvest stages.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

/// HTA authorities the harvester knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    /// National Institute for Health and Care Excellence.
    Uk,
    /// Gemeinsamer Bundesausschuss.
    De,
    /// Haute Autorité de santé.
    Fr,
}

impl Jurisdiction {
    /// Country code.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uk => "UK",
            Self::De => "DE",
            Self::Fr => "FR",
        }
    }

    /// Name of the publishing authority, used as the source label in prompts.
    #[must_use]
    pub fn authority(&self) -> &'static str {
        match self {
            Self::Uk => "NICE",
            Self::De => "G-BA",
            Self::Fr => "HAS",
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.authority())
    }
}

/// What a request points at once classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestTarget {
    /// A guidance code, resolved through URL templates (UK only).
    Code(String),
    /// A guidance page to be scraped.
    Page(Url),
}

impl fmt::Display for RequestTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => f.write_str(code),
            Self::Page(url) => f.write_str(url.as_str()),
        }
    }
}

/// A classified user submission. Immutable once the router returns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuidanceRequest {
    /// Input exactly as given.
    pub raw: String,
    /// Trimmed, lowercased input.
    pub normalized: String,
    /// Whether the input was a URL (as opposed to a bare code).
    pub from_url: bool,
    pub jurisdiction: Jurisdiction,
    pub target: RequestTarget,
}

impl GuidanceRequest {
    /// Source label for the summarization prompt.
    #[must_use]
    pub fn source_label(&self) -> &'static str {
        self.jurisdiction.authority()
    }

    /// The guidance code, if the request resolves by code.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match &self.target {
            RequestTarget::Code(code) => Some(code),
            RequestTarget::Page(_) => None,
        }
    }
}

/// How much a discovered link can be trusted to be the guidance document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Produced by a rule that targets the guidance document specifically.
    Primary,
    /// Produced by a best-effort heuristic; may be an unrelated document.
    Fallback,
}

/// A link that may point at a guidance PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateLink {
    /// Absolute URL, fragment removed.
    pub url: Url,
    /// Page (or code) the link was derived from.
    pub origin: String,
    /// Name of the discovery rule that produced the link.
    pub rule: &'static str,
    pub confidence: Confidence,
}

/// A fetched response that passed content validation.
#[derive(Debug, Clone)]
pub struct RetrievedDocument {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub link: CandidateLink,
}

impl RetrievedDocument {
    /// Whether the body starts with the `%PDF-` signature.
    #[must_use]
    pub fn has_pdf_signature(&self) -> bool {
        self.bytes.starts_with(b"%PDF-")
    }
}

/// Why a candidate was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Non-200 status.
    Status(u16),
    /// Missing or non-PDF content type.
    ContentType(Option<String>),
    /// Body exceeds the configured maximum.
    TooLarge { size: u64, limit: u64 },
    /// Connection, timeout or body read failure.
    Network(String),
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "HTTP status {status}"),
            Self::ContentType(Some(ct)) => write!(f, "content type '{ct}' is not a PDF"),
            Self::ContentType(None) => f.write_str("missing content type"),
            Self::TooLarge { size, limit } => {
                write!(f, "response of {size} bytes exceeds limit of {limit} bytes")
            }
            Self::Network(message) => write!(f, "network error: {message}"),
        }
    }
}

/// Result of fetching and validating one candidate.
#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    Accepted(RetrievedDocument),
    Rejected {
        link: CandidateLink,
        reason: Rejection,
    },
}
