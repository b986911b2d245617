//! Content validation: decides whether a fetched response is a PDF.

use crate::http::HttpResponse;
use crate::types::{CandidateLink, CandidateOutcome, Rejection, RetrievedDocument};

/// Content type that marks an acceptable document.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Validate a response fetched for `link`.
///
/// Accepts only status 200 with a content type containing `application/pdf`
/// (case-insensitive). The URL is not consulted: an HTML page served at a
/// `.pdf` path is rejected.
pub fn validate(response: HttpResponse, link: CandidateLink) -> CandidateOutcome {
    if response.status != 200 {
        return CandidateOutcome::Rejected {
            link,
            reason: Rejection::Status(response.status),
        };
    }

    let content_type = match response.content_type {
        Some(ct) if ct.to_ascii_lowercase().contains(PDF_CONTENT_TYPE) => ct,
        other => {
            return CandidateOutcome::Rejected {
                link,
                reason: Rejection::ContentType(other),
            };
        }
    };

    let document = RetrievedDocument {
        bytes: response.body,
        content_type,
        link,
    };

    if !document.has_pdf_signature() {
        tracing::warn!(
            url = %document.link.url,
            "Response declared as PDF but lacks %PDF- signature"
        );
    }

    CandidateOutcome::Accepted(document)
}
