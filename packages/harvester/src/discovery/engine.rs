//! Generic discovery engine that evaluates a [`SourceProfile`] against a request.

use std::collections::HashSet;
use std::thread;

use reqwest::blocking::Client;
use scraper::Html;
use url::Url;

use super::profile::{Collect, SourceProfile};
use super::rule::DiscoveryRule;
use crate::config::HarvestOptions;
use crate::error::Result;
use crate::http::{fetch, fetch_page};
use crate::types::{CandidateLink, CandidateOutcome, Rejection, RequestTarget, RetrievedDocument};
use crate::validator::validate;

/// Outcome of running a profile's rules.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Validated documents in discovery order.
    pub documents: Vec<RetrievedDocument>,
    /// Candidates that were tried and turned down.
    pub rejected: Vec<(CandidateLink, Rejection)>,
    /// Rule that produced `documents`, if any.
    pub rule: Option<&'static str>,
}

impl Discovery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Guidance page, fetched at most once per discovery.
struct PageCache {
    url: Option<Url>,
    html: Option<Option<Html>>,
}

impl PageCache {
    fn new(url: Option<Url>) -> Self {
        Self { url, html: None }
    }

    fn preloaded(url: Url, html: &str) -> Self {
        Self {
            url: Some(url),
            html: Some(Some(Html::parse_document(html))),
        }
    }
}

/// Evaluates discovery rules in order and validates each candidate.
///
/// The first rule that yields at least one validated document wins; later
/// rules are not evaluated. A failing candidate never aborts its siblings.
pub struct DiscoveryEngine<'a> {
    client: &'a Client,
    options: &'a HarvestOptions,
}

impl<'a> DiscoveryEngine<'a> {
    #[must_use]
    pub fn new(client: &'a Client, options: &'a HarvestOptions) -> Self {
        Self { client, options }
    }

    /// Run `profile` for a routed request target.
    pub fn discover(&self, profile: &SourceProfile, target: &RequestTarget) -> Result<Discovery> {
        let (code, page_url) = match target {
            RequestTarget::Code(code) => (Some(code.as_str()), profile.landing_page(code)),
            RequestTarget::Page(url) => (None, Some(strip_fragment(url))),
        };
        let origin = target.to_string();
        let mut page = PageCache::new(page_url);
        self.run(profile, code, &origin, &mut page)
    }

    /// Run only the page rules of `profile` against HTML the caller already has.
    pub fn discover_in_page(
        &self,
        profile: &SourceProfile,
        page_url: &Url,
        html: &str,
    ) -> Result<Discovery> {
        let page_url = strip_fragment(page_url);
        let origin = page_url.to_string();
        let mut page = PageCache::preloaded(page_url, html);
        self.run(profile, None, &origin, &mut page)
    }

    fn run(
        &self,
        profile: &SourceProfile,
        code: Option<&str>,
        origin: &str,
        page: &mut PageCache,
    ) -> Result<Discovery> {
        let mut discovery = Discovery::default();
        let mut downloads = 0usize;

        for rule in &profile.rules {
            let candidates = self.candidates(profile, rule, code, origin, page)?;
            if candidates.is_empty() {
                tracing::debug!(
                    jurisdiction = profile.jurisdiction.as_str(),
                    rule = rule.name(),
                    "Rule produced no candidates"
                );
                continue;
            }

            tracing::debug!(
                jurisdiction = profile.jurisdiction.as_str(),
                rule = rule.name(),
                count = candidates.len(),
                "Trying candidates"
            );

            for link in candidates {
                if profile.polite && downloads > 0 {
                    thread::sleep(self.options.politeness_delay);
                }
                downloads += 1;

                match self.try_candidate(profile, link) {
                    CandidateOutcome::Accepted(document) => {
                        tracing::info!(
                            url = %document.link.url,
                            rule = document.link.rule,
                            size = document.bytes.len(),
                            "Accepted document"
                        );
                        discovery.documents.push(document);
                        if profile.collect == Collect::First {
                            break;
                        }
                    }
                    CandidateOutcome::Rejected { link, reason } => {
                        tracing::warn!(url = %link.url, rule = link.rule, %reason, "Rejected candidate");
                        discovery.rejected.push((link, reason));
                    }
                }
            }

            if !discovery.documents.is_empty() {
                discovery.rule = Some(rule.name());
                return Ok(discovery);
            }
        }

        Ok(discovery)
    }

    /// Deduplicated candidate links for one rule.
    fn candidates(
        &self,
        profile: &SourceProfile,
        rule: &DiscoveryRule,
        code: Option<&str>,
        origin: &str,
        page: &mut PageCache,
    ) -> Result<Vec<CandidateLink>> {
        let urls = if rule.needs_page() {
            match self.load_page(profile, page) {
                Some((page_url, html)) => rule.scan(html, page_url)?,
                None => Vec::new(),
            }
        } else {
            code.and_then(|code| rule.expand(code))
                .into_iter()
                .collect()
        };

        let mut seen = HashSet::new();
        Ok(urls
            .into_iter()
            .map(|url| strip_fragment(&url))
            .filter(|url| seen.insert(url.clone()))
            .map(|url| CandidateLink {
                url,
                origin: origin.to_string(),
                rule: rule.name(),
                confidence: rule.confidence(),
            })
            .collect())
    }

    /// Fetch the guidance page on first use. A page that cannot be loaded
    /// simply yields no candidates.
    fn load_page<'p>(
        &self,
        profile: &SourceProfile,
        page: &'p mut PageCache,
    ) -> Option<(&'p Url, &'p Html)> {
        let url = page.url.as_ref()?;

        if page.html.is_none() {
            let html = match fetch_page(
                self.client,
                url,
                profile.user_agent,
                self.options.max_response_size,
            ) {
                Ok(body) => Some(Html::parse_document(&body)),
                Err(reason) => {
                    tracing::warn!(url = %url, %reason, "Could not load guidance page");
                    None
                }
            };
            page.html = Some(html);
        }

        match &page.html {
            Some(Some(html)) => Some((url, html)),
            _ => None,
        }
    }

    fn try_candidate(&self, profile: &SourceProfile, link: CandidateLink) -> CandidateOutcome {
        match fetch(
            self.client,
            &link.url,
            profile.user_agent,
            self.options.max_response_size,
        ) {
            Ok(response) => validate(response, link),
            Err(reason) => CandidateOutcome::Rejected { link, reason },
        }
    }
}

fn strip_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fragment() {
        let url = Url::parse("https://www.g-ba.de/beschluesse/6001/#tab/dokumente").unwrap();
        assert_eq!(
            strip_fragment(&url).as_str(),
            "https://www.g-ba.de/beschluesse/6001/"
        );
    }

    #[test]
    fn test_discovery_default_is_empty() {
        let discovery = Discovery::default();
        assert!(discovery.is_empty());
        assert!(discovery.rule.is_none());
    }
}
