//! Per-jurisdiction discovery tables.

use super::rule::{DiscoveryRule, CODE_PLACEHOLDER};
use crate::config::{nice_guidance_url, HarvestOptions, BROWSER_USER_AGENT};
use crate::types::Jurisdiction;

/// Decision document keywords in G-BA file names.
pub const GBA_DOCUMENT_KEYWORDS: &[&str] = &["resolution", "justification", "rl-xii"];

/// Link patterns on has-sante.fr that point at tracking/render proxies
/// instead of the canonical upload.
pub const HAS_PROXY_PATTERNS: &[&str] = &["doxiti.jsp", "/plugins/modulexitiklee/"];

/// How many validated documents a profile wants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collect {
    /// Stop at the first validated document.
    First,
    /// Keep every validated document of the winning rule.
    All,
}

/// Everything the engine needs to know about one authority's website.
#[derive(Debug, Clone)]
pub struct SourceProfile {
    pub jurisdiction: Jurisdiction,
    /// Rules in priority order.
    pub rules: Vec<DiscoveryRule>,
    pub collect: Collect,
    /// Landing page pattern for code requests, containing `{code}`.
    pub landing_page: Option<String>,
    /// User agent override for every request to this site.
    pub user_agent: Option<&'static str>,
    /// Pause between downloads.
    pub polite: bool,
}

impl SourceProfile {
    /// Landing page URL for a guidance code.
    #[must_use]
    pub fn landing_page(&self, code: &str) -> Option<url::Url> {
        let pattern = self.landing_page.as_ref()?;
        url::Url::parse(&pattern.replace(CODE_PLACEHOLDER, code)).ok()
    }
}

/// Profile for a jurisdiction with the given runtime options.
#[must_use]
pub fn profile_for(jurisdiction: Jurisdiction, options: &HarvestOptions) -> SourceProfile {
    match jurisdiction {
        Jurisdiction::Uk => nice_profile(&options.uk_base_url),
        Jurisdiction::De => gba_profile(),
        Jurisdiction::Fr => has_profile(),
    }
}

/// NICE: direct download templates, then the "Download guidance (PDF)" button.
#[must_use]
pub fn nice_profile(base_url: &str) -> SourceProfile {
    let guidance = nice_guidance_url(base_url, CODE_PLACEHOLDER);
    SourceProfile {
        jurisdiction: Jurisdiction::Uk,
        rules: vec![
            DiscoveryRule::UrlTemplate {
                pattern: format!("{guidance}/download-pdf"),
            },
            DiscoveryRule::UrlTemplate {
                pattern: format!("{guidance}/pdf"),
            },
            DiscoveryRule::AnchorTextMatch {
                text: "Download guidance (PDF)",
            },
        ],
        collect: Collect::First,
        landing_page: Some(guidance),
        user_agent: None,
        polite: false,
    }
}

/// G-BA: decision documents behind `download-helper` links, then the head
/// of the download list as a weaker fallback.
#[must_use]
pub fn gba_profile() -> SourceProfile {
    SourceProfile {
        jurisdiction: Jurisdiction::De,
        rules: vec![
            DiscoveryRule::AnchorClassFilter {
                class: "download-helper",
                keywords: GBA_DOCUMENT_KEYWORDS,
            },
            DiscoveryRule::ListHead {
                items: ".download-list li",
                limit: 2,
            },
        ],
        collect: Collect::All,
        landing_page: None,
        user_agent: None,
        polite: false,
    }
}

/// HAS: the "English version" section first, then any uploaded PDF.
///
/// The two strategies disagree on some pages; they stay separate rules so
/// reports show which one produced a document.
#[must_use]
pub fn has_profile() -> SourceProfile {
    SourceProfile {
        jurisdiction: Jurisdiction::Fr,
        rules: vec![
            DiscoveryRule::SectionHeadingThenList {
                heading: "English version",
                exclude: HAS_PROXY_PATTERNS,
            },
            DiscoveryRule::UploadPathScan {
                segment: "upload",
                exclude: HAS_PROXY_PATTERNS,
            },
        ],
        collect: Collect::All,
        landing_page: None,
        user_agent: Some(BROWSER_USER_AGENT),
        polite: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NICE_BASE_URL;
    use crate::types::Confidence;

    #[test]
    fn test_nice_profile_template_order() {
        let profile = nice_profile(NICE_BASE_URL);
        let expanded: Vec<String> = profile
            .rules
            .iter()
            .filter_map(|r| r.expand("ta1044"))
            .map(String::from)
            .collect();
        assert_eq!(
            expanded,
            vec![
                "https://www.nice.org.uk/guidance/ta1044/download-pdf",
                "https://www.nice.org.uk/guidance/ta1044/pdf",
            ]
        );
        assert_eq!(profile.collect, Collect::First);
        assert_eq!(
            profile.landing_page("ta1044").map(String::from),
            Some("https://www.nice.org.uk/guidance/ta1044".to_string())
        );
    }

    #[test]
    fn test_fallback_rules_are_marked() {
        let gba = gba_profile();
        assert_eq!(gba.rules[0].confidence(), Confidence::Primary);
        assert_eq!(gba.rules[1].confidence(), Confidence::Fallback);

        let has = has_profile();
        assert_eq!(has.rules[0].confidence(), Confidence::Primary);
        assert_eq!(has.rules[1].confidence(), Confidence::Fallback);
    }

    #[test]
    fn test_has_profile_sends_browser_user_agent() {
        let has = has_profile();
        assert_eq!(has.user_agent, Some(BROWSER_USER_AGENT));
        assert!(has.polite);
        assert!(gba_profile().user_agent.is_none());
    }

    #[test]
    fn test_profile_for_uses_base_url() {
        let options = HarvestOptions::default().with_uk_base_url("http://127.0.0.1:9999");
        let profile = profile_for(Jurisdiction::Uk, &options);
        assert_eq!(
            profile.rules[0].expand("ta1").map(String::from),
            Some("http://127.0.0.1:9999/guidance/ta1/download-pdf".to_string())
        );
        assert_eq!(profile_for(Jurisdiction::Fr, &options).jurisdiction, Jurisdiction::Fr);
    }
}
