use chrono::{DateTime, Utc};
use hta_harvester::harvester::DocumentReport;
use hta_harvester::{GuidanceRequest, Jurisdiction};
use serde::Serialize;

/// Token usage tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Result of summarizing one guidance request.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    /// Text returned by the completion service.
    pub summary: String,
    /// Authority label used in the prompt (NICE, G-BA, HAS).
    pub source_label: &'static str,
    #[serde(skip)]
    pub request: GuidanceRequest,
    pub jurisdiction: Jurisdiction,
    pub target: String,
    pub documents: Vec<DocumentReport>,
    pub corpus_chars: usize,
    pub corpus_truncated: bool,
    pub warnings: Vec<String>,
    pub token_usage: TokenUsage,
    pub generated_at: DateTime<Utc>,
}
