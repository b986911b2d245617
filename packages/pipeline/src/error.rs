use hta_harvester::HarvesterError;
use thiserror::Error;

/// Stage name for the completion-service call.
pub const SUMMARY_STAGE: &str = "summarization";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Harvest(#[from] HarvesterError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("LLM API request failed: {0}")]
    LlmApiRequest(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {message}")]
    LlmApiError { status: u16, message: String },

    #[error("LLM rate limited, retry after {retry_after_secs}s")]
    LlmRateLimited { retry_after_secs: u64 },

    #[error("failed to parse LLM response: {0}")]
    LlmResponseParse(String),

    #[error("LLM returned empty response")]
    LlmEmptyResponse,

    #[error("{stage} did not finish within the {secs}s request limit")]
    Timeout { stage: &'static str, secs: u64 },

    #[error("harvest task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl PipelineError {
    /// Whether the completion service caused the failure.
    ///
    /// Upstream failures are never retried here; the caller decides.
    #[must_use]
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::LlmApiRequest(_)
                | Self::LlmApiError { .. }
                | Self::LlmRateLimited { .. }
                | Self::LlmResponseParse(_)
                | Self::LlmEmptyResponse
        ) || matches!(self, Self::Timeout { stage, .. } if *stage == SUMMARY_STAGE)
    }

    /// Pipeline stage that failed, for user-facing messages.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Harvest(e) => e.stage(),
            Self::Config(_) => "configuration",
            Self::Task(_) => "retrieval",
            Self::Timeout { stage, .. } => *stage,
            _ => SUMMARY_STAGE,
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
