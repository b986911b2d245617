mod client;
mod config;
mod prompt;
mod summarizer;
mod types;

pub use client::{LlmClient, LlmRequest, LlmResponse, Message, OpenAiClient, Role};
#[cfg(any(test, feature = "test-utils"))]
pub use client::test_support::MockLlmClient;
pub use config::{SummaryConfig, SummaryConfigBuilder};
pub use prompt::{build_summary_prompt, build_system_prompt, SYSTEM_PROMPT};
pub use summarizer::{execute_summary, Summarizer};
pub use types::{SummaryResult, TokenUsage};
