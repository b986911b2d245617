use crate::error::{PipelineError, Result};

pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_TEMPERATURE: f64 = 0.5;
pub const DEFAULT_LLM_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 300;

/// Configuration for the summarization step.
///
/// The API key is read once here and handed to the client at construction.
#[derive(Clone)]
pub struct SummaryConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub temperature: f64,
    pub max_tokens: Option<u32>,
    /// Per-request timeout for the completion service.
    pub timeout_secs: u64,
    /// Bound on the whole harvest + summarize request.
    pub summary_timeout_secs: u64,
}

impl std::fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .field("summary_timeout_secs", &self.summary_timeout_secs)
            .finish()
    }
}

impl SummaryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("OPENAI_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PipelineError::Config("OPENAI_API_KEY not set".into()))?;

        let model = lookup("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());

        let api_base_url =
            lookup("LLM_API_BASE_URL").unwrap_or_else(|| DEFAULT_API_BASE_URL.into());

        let temperature = lookup("LLM_TEMPERATURE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        let max_tokens = lookup("LLM_MAX_TOKENS").and_then(|v| v.parse().ok());

        let timeout_secs = lookup("LLM_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_LLM_TIMEOUT_SECS);

        let summary_timeout_secs = lookup("SUMMARY_TIMEOUT_SECS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SUMMARY_TIMEOUT_SECS);

        Ok(Self {
            api_key,
            model,
            api_base_url,
            temperature,
            max_tokens,
            timeout_secs,
            summary_timeout_secs,
        })
    }

    /// Create a config builder for testing.
    pub fn builder(api_key: impl Into<String>) -> SummaryConfigBuilder {
        SummaryConfigBuilder {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: None,
            timeout_secs: DEFAULT_LLM_TIMEOUT_SECS,
            summary_timeout_secs: DEFAULT_SUMMARY_TIMEOUT_SECS,
        }
    }
}

/// Builder for constructing `SummaryConfig` in tests.
pub struct SummaryConfigBuilder {
    api_key: String,
    model: String,
    api_base_url: String,
    temperature: f64,
    max_tokens: Option<u32>,
    timeout_secs: u64,
    summary_timeout_secs: u64,
}

impl SummaryConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn summary_timeout_secs(mut self, summary_timeout_secs: u64) -> Self {
        self.summary_timeout_secs = summary_timeout_secs;
        self
    }

    pub fn build(self) -> SummaryConfig {
        SummaryConfig {
            api_key: self.api_key,
            model: self.model,
            api_base_url: self.api_base_url,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
            summary_timeout_secs: self.summary_timeout_secs,
        }
    }
}
