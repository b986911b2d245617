//! Jurisdiction routing: turns raw user input into a [`GuidanceRequest`].

use url::Url;

use crate::config::validate_guidance_code;
use crate::error::{HarvesterError, Result};
use crate::types::{GuidanceRequest, Jurisdiction, RequestTarget};

/// Host suffix to jurisdiction table. First match wins.
const DOMAIN_TABLE: &[(&str, Jurisdiction)] = &[
    ("nice.org.uk", Jurisdiction::Uk),
    ("g-ba.de", Jurisdiction::De),
    ("has-sante.fr", Jurisdiction::Fr),
];

/// Marks the input as a URL rather than a bare code, whatever the scheme.
const SCHEME_SEPARATOR: &str = "://";

/// Schemes a guidance page can be fetched over.
const FETCH_SCHEMES: &[&str] = &["http", "https"];

/// Classify raw input into a routed request.
///
/// Bare codes are routed to the UK (only NICE publishes short codes). For UK
/// URLs the code is the last non-empty path segment, so
/// `https://www.nice.org.uk/guidance/ta1044` and `ta1044` produce the same
/// request target.
///
/// # Examples
/// ```
/// use hta_harvester::router::classify;
/// use hta_harvester::types::Jurisdiction;
///
/// let request = classify("https://www.nice.org.uk/guidance/TA1044").unwrap();
/// assert_eq!(request.jurisdiction, Jurisdiction::Uk);
/// assert_eq!(request.code(), Some("ta1044"));
/// ```
pub fn classify(raw: &str) -> Result<GuidanceRequest> {
    let trimmed = raw.trim();
    let normalized = trimmed.to_lowercase();

    if normalized.is_empty() {
        return Err(HarvesterError::EmptyInput);
    }

    let (from_url, jurisdiction, target) = if normalized.contains(SCHEME_SEPARATOR) {
        let (jurisdiction, target) = classify_url(trimmed)?;
        (true, jurisdiction, target)
    } else {
        let code = last_segment(&normalized).unwrap_or_default();
        validate_guidance_code(code)?;
        (false, Jurisdiction::Uk, RequestTarget::Code(code.to_string()))
    };

    tracing::debug!(
        input = %normalized,
        jurisdiction = jurisdiction.as_str(),
        target = %target,
        "Classified request"
    );

    Ok(GuidanceRequest {
        raw: raw.to_string(),
        normalized,
        from_url,
        jurisdiction,
        target,
    })
}

/// Look up the jurisdiction for a host name.
///
/// A host matches an entry when it equals it or is a subdomain of it.
#[must_use]
pub fn jurisdiction_for_host(host: &str) -> Option<Jurisdiction> {
    let host = host.trim_end_matches('.').to_ascii_lowercase();
    DOMAIN_TABLE
        .iter()
        .find(|(domain, _)| {
            host == *domain
                || host
                    .strip_suffix(domain)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
        .map(|(_, jurisdiction)| *jurisdiction)
}

/// Route a URL input.
///
/// The page URL keeps the caller's path casing; only the host is compared
/// case-insensitively.
fn classify_url(input: &str) -> Result<(Jurisdiction, RequestTarget)> {
    let url = Url::parse(input).map_err(|e| HarvesterError::InvalidUrl {
        url: input.to_string(),
        reason: e.to_string(),
    })?;

    let host = url.host_str().ok_or_else(|| HarvesterError::InvalidUrl {
        url: input.to_string(),
        reason: "URL has no host".to_string(),
    })?;

    let jurisdiction = jurisdiction_for_host(host)
        .ok_or_else(|| HarvesterError::UnsupportedDomain(host.to_string()))?;

    let target = match jurisdiction {
        Jurisdiction::Uk => {
            let code = url
                .path_segments()
                .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
                .unwrap_or_default()
                .to_lowercase();
            validate_guidance_code(&code)?;
            RequestTarget::Code(code)
        }
        Jurisdiction::De | Jurisdiction::Fr => {
            if !FETCH_SCHEMES.contains(&url.scheme()) {
                return Err(HarvesterError::InvalidUrl {
                    url: input.to_string(),
                    reason: format!("unsupported scheme '{}'", url.scheme()),
                });
            }
            RequestTarget::Page(url)
        }
    };

    Ok((jurisdiction, target))
}

/// Last non-empty `/`-separated segment, so pasted scheme-less URLs still yield a code.
fn last_segment(input: &str) -> Option<&str> {
    input.split('/').filter(|s| !s.is_empty()).last()
}
