use std::time::Duration;

use chrono::Utc;
use hta_harvester::{Harvest, HarvestOptions};
use tokio::time::Instant;
use tracing::{info, warn};

use crate::error::{PipelineError, Result, SUMMARY_STAGE};
use crate::harvest::execute_harvest;
use crate::summary::client::{LlmClient, LlmRequest, LlmResponse, Message};
use crate::summary::config::SummaryConfig;
use crate::summary::prompt;
use crate::summary::types::{SummaryResult, TokenUsage};

/// Stage name for guidance retrieval and extraction.
const RETRIEVAL_STAGE: &str = "retrieval";

/// Sends a corpus to the completion service with the fixed healthcare-policy prompt.
pub struct Summarizer<'a, C: LlmClient> {
    client: &'a C,
    config: &'a SummaryConfig,
}

impl<'a, C: LlmClient> Summarizer<'a, C> {
    pub fn new(client: &'a C, config: &'a SummaryConfig) -> Self {
        Self { client, config }
    }

    /// Summarize `corpus` as guidance from `source_label`.
    ///
    /// One request, no retries. Any completion-service failure is returned as is.
    pub async fn summarize(&self, corpus: &str, source_label: &str) -> Result<LlmResponse> {
        let request = LlmRequest {
            messages: vec![
                Message::system(prompt::build_system_prompt()),
                Message::user(prompt::build_summary_prompt(corpus, source_label)),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        info!(
            source = source_label,
            chars = corpus.chars().count(),
            "requesting summary"
        );
        self.client.complete(&request).await
    }

    /// Summarize an already harvested request.
    pub async fn summarize_harvest(&self, harvest: Harvest) -> Result<SummaryResult> {
        let response = self
            .summarize(&harvest.corpus.text, harvest.source_label())
            .await?;

        if harvest.has_fallback_documents() {
            warn!("summary is based on documents found by a best-effort rule");
        }

        Ok(SummaryResult {
            summary: response.content,
            source_label: harvest.source_label(),
            jurisdiction: harvest.request.jurisdiction,
            target: harvest.request.target.to_string(),
            request: harvest.request,
            documents: harvest.reports,
            corpus_chars: harvest.corpus.char_count(),
            corpus_truncated: harvest.corpus.truncated,
            warnings: harvest.corpus.warnings,
            token_usage: TokenUsage {
                input_tokens: response.input_tokens,
                output_tokens: response.output_tokens,
            },
            generated_at: Utc::now(),
        })
    }

    /// Harvest `input` and summarize it, bounded by the configured overall timeout.
    ///
    /// Both steps share one deadline; a timeout names the step that was running.
    pub async fn summarize_input(
        &self,
        input: &str,
        options: &HarvestOptions,
    ) -> Result<SummaryResult> {
        let secs = self.config.summary_timeout_secs;
        let deadline = Instant::now() + Duration::from_secs(secs);

        let harvest = tokio::time::timeout_at(deadline, execute_harvest(input, options))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: RETRIEVAL_STAGE,
                secs,
            })??;

        tokio::time::timeout_at(deadline, self.summarize_harvest(harvest))
            .await
            .map_err(|_| PipelineError::Timeout {
                stage: SUMMARY_STAGE,
                secs,
            })?
    }
}

/// Execute the full pipeline: classify, retrieve, extract, build the corpus, summarize.
pub async fn execute_summary<C: LlmClient>(
    input: &str,
    client: &C,
    config: &SummaryConfig,
    options: &HarvestOptions,
) -> Result<SummaryResult> {
    let result = Summarizer::new(client, config)
        .summarize_input(input, options)
        .await?;

    info!(
        source = result.source_label,
        documents = result.documents.len(),
        input_tokens = result.token_usage.input_tokens,
        output_tokens = result.token_usage.output_tokens,
        "summary complete"
    );
    Ok(result)
}
