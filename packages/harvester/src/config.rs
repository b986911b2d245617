//! Configuration constants and runtime options for the harvester.

use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

use crate::error::{HarvesterError, Result};

/// Base URL of the NICE website (UK).
pub const NICE_BASE_URL: &str = "https://www.nice.org.uk";

/// HTTP timeout in seconds.
///
/// Guidance PDFs can run to several megabytes and the authority sites are slow.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Default maximum HTTP response size in bytes (50 MB).
pub const DEFAULT_MAX_RESPONSE_SIZE: u64 = 50 * 1024 * 1024;

/// Maximum number of characters handed to the summarization service.
pub const MAX_CORPUS_CHARS: usize = 10_000;

/// Separator placed between documents when building the corpus.
pub const DOCUMENT_SEPARATOR: &str = "\n\n";

/// Pause between consecutive downloads for sites that ask for politeness (HAS).
pub const POLITENESS_DELAY_MS: u64 = 1_000;

/// Browser-like user agent for sites that reject unknown clients.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Guidance code pattern: lowercase alphanumerics and hyphens (e.g. `ta1044`, `ng-28`).
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static GUIDANCE_CODE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid regex"));

/// Validate a (normalized, lowercase) guidance code.
///
/// # Examples
/// ```
/// use hta_harvester::config::validate_guidance_code;
///
/// assert!(validate_guidance_code("ta1044").is_ok());
/// assert!(validate_guidance_code("ta 1044").is_err());
/// ```
pub fn validate_guidance_code(code: &str) -> Result<()> {
    if GUIDANCE_CODE_PATTERN.is_match(code) {
        Ok(())
    } else {
        Err(HarvesterError::InvalidGuidanceCode(code.to_string()))
    }
}

/// Build the NICE landing page URL for a guidance code.
pub fn nice_guidance_url(base_url: &str, code: &str) -> String {
    format!("{}/guidance/{code}", base_url.trim_end_matches('/'))
}

/// Runtime options for a harvest.
///
/// The defaults target the live authority sites; tests point `uk_base_url`
/// at a mock server and switch the politeness delay off.
#[derive(Debug, Clone)]
pub struct HarvestOptions {
    /// Origin used to build NICE URLs from a bare code.
    pub uk_base_url: String,
    /// Per-request HTTP timeout.
    pub timeout: Duration,
    /// Responses larger than this are rejected.
    pub max_response_size: u64,
    /// Pause between downloads for profiles that request one.
    pub politeness_delay: Duration,
    /// Character budget of the corpus.
    pub max_corpus_chars: usize,
}

impl Default for HarvestOptions {
    fn default() -> Self {
        Self {
            uk_base_url: NICE_BASE_URL.to_string(),
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            max_response_size: DEFAULT_MAX_RESPONSE_SIZE,
            politeness_delay: Duration::from_millis(POLITENESS_DELAY_MS),
            max_corpus_chars: MAX_CORPUS_CHARS,
        }
    }
}

impl HarvestOptions {
    #[must_use]
    pub fn with_uk_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.uk_base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_max_response_size(mut self, max_bytes: u64) -> Self {
        self.max_response_size = max_bytes;
        self
    }

    #[must_use]
    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    #[must_use]
    pub fn with_max_corpus_chars(mut self, max_chars: usize) -> Self {
        self.max_corpus_chars = max_chars;
        self
    }
}
