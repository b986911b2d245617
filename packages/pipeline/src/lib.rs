//! HTA Pipeline - Summarize harvested guidance with a chat completion service.
//!
//! Runs the blocking [`hta_harvester`] off the async runtime, sends the
//! bounded corpus to an OpenAI-compatible endpoint with a fixed
//! healthcare-policy prompt, and returns the summary together with the
//! provenance of every document that went into it.
//!
//! # Architecture
//!
//! - [`harvest`]: Harvester bridge (`spawn_blocking`)
//! - [`summary`]: Prompt, completion client, configuration and the summarizer
//! - [`error`]: Error types, failing stage and upstream classification

pub mod error;
pub mod harvest;
pub mod summary;

pub use error::{PipelineError, Result};
pub use harvest::execute_harvest;
pub use summary::{execute_summary, OpenAiClient, SummaryConfig, SummaryResult};
