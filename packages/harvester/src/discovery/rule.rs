//! Discovery rules: declarative descriptions of where a guidance PDF link lives.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{HarvesterError, Result};
use crate::types::Confidence;

/// Placeholder substituted with the guidance code in URL templates.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Heading elements that delimit page sections.
const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// One way of producing candidate links.
///
/// Rules are evaluated in order by the [`DiscoveryEngine`](super::DiscoveryEngine).
/// Only `UrlTemplate` works from a guidance code; every other variant reads
/// the guidance page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryRule {
    /// Absolute URL pattern containing `{code}`.
    UrlTemplate { pattern: String },

    /// Anchors whose visible text contains `text` (case-insensitive).
    AnchorTextMatch { text: &'static str },

    /// Anchors carrying `class` whose file name contains one of `keywords`.
    AnchorClassFilter {
        class: &'static str,
        keywords: &'static [&'static str],
    },

    /// `.pdf` links in the list following a heading that contains `heading`.
    SectionHeadingThenList {
        heading: &'static str,
        exclude: &'static [&'static str],
    },

    /// First anchor of each of the first `limit` items matched by `items`.
    ///
    /// Best effort: may return documents unrelated to the decision.
    ListHead { items: &'static str, limit: usize },

    /// Every `.pdf` link whose path has a `segment` directory.
    ///
    /// Best effort: may pick up attachments in other languages.
    UploadPathScan {
        segment: &'static str,
        exclude: &'static [&'static str],
    },
}

impl DiscoveryRule {
    /// Short name used in logs and reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::UrlTemplate { .. } => "url-template",
            Self::AnchorTextMatch { .. } => "anchor-text",
            Self::AnchorClassFilter { .. } => "anchor-class",
            Self::SectionHeadingThenList { .. } => "section-heading-list",
            Self::ListHead { .. } => "list-head",
            Self::UploadPathScan { .. } => "upload-scan",
        }
    }

    #[must_use]
    pub fn confidence(&self) -> Confidence {
        match self {
            Self::ListHead { .. } | Self::UploadPathScan { .. } => Confidence::Fallback,
            _ => Confidence::Primary,
        }
    }

    /// Whether the rule reads the guidance page.
    #[must_use]
    pub fn needs_page(&self) -> bool {
        !matches!(self, Self::UrlTemplate { .. })
    }

    /// Expand a URL template for `code`.
    ///
    /// Returns `None` for page rules and for templates that do not yield a valid URL.
    #[must_use]
    pub fn expand(&self, code: &str) -> Option<Url> {
        let Self::UrlTemplate { pattern } = self else {
            return None;
        };
        let url = pattern.replace(CODE_PLACEHOLDER, code);
        match Url::parse(&url) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "URL template produced an invalid URL");
                None
            }
        }
    }

    /// Collect candidate URLs from a parsed page, in document order.
    ///
    /// Relative hrefs are resolved against `page_url`.
    pub fn scan(&self, html: &Html, page_url: &Url) -> Result<Vec<Url>> {
        let urls = match self {
            Self::UrlTemplate { .. } => Vec::new(),

            Self::AnchorTextMatch { text } => {
                let needle = text.to_lowercase();
                html.select(&selector("a[href]")?)
                    .filter(|a| anchor_text(*a).to_lowercase().contains(&needle))
                    .filter_map(|a| resolve_href(page_url, a))
                    .collect()
            }

            Self::AnchorClassFilter { class, keywords } => html
                .select(&selector(&format!("a.{class}[href]"))?)
                .filter_map(|a| resolve_href(page_url, a))
                .filter(|url| {
                    let name = file_name(url);
                    keywords.iter().any(|k| name.contains(&k.to_lowercase()))
                })
                .collect(),

            Self::SectionHeadingThenList { heading, exclude } => {
                section_links(html, page_url, heading, exclude)?
            }

            Self::ListHead { items, limit } => {
                let anchor = selector("a[href]")?;
                html.select(&selector(items)?)
                    .take(*limit)
                    .filter_map(|item| item.select(&anchor).next())
                    .filter_map(|a| resolve_href(page_url, a))
                    .collect()
            }

            Self::UploadPathScan { segment, exclude } => {
                let directory = format!("/{segment}/");
                html.select(&selector("a[href]")?)
                    .filter_map(|a| resolve_href(page_url, a))
                    .filter(|url| is_pdf_url(url))
                    .filter(|url| url.path().to_lowercase().contains(&directory))
                    .filter(|url| !is_excluded(url, exclude))
                    .collect()
            }
        };

        Ok(urls)
    }
}

/// Parse a CSS selector from a rule table.
fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| HarvesterError::Selector {
        selector: css.to_string(),
        message: format!("{e:?}"),
    })
}

/// Visible text of an element with whitespace collapsed.
fn anchor_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve an anchor's href to an absolute http(s) URL without fragment.
fn resolve_href(page_url: &Url, anchor: ElementRef<'_>) -> Option<Url> {
    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let mut url = page_url.join(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url)
}

/// Lowercased last path segment.
fn file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default()
        .to_lowercase()
}

fn is_pdf_url(url: &Url) -> bool {
    url.path().to_lowercase().ends_with(".pdf")
}

fn is_excluded(url: &Url, exclude: &[&str]) -> bool {
    let url = url.as_str().to_lowercase();
    exclude.iter().any(|pattern| url.contains(&pattern.to_lowercase()))
}

fn is_heading(element: ElementRef<'_>) -> bool {
    HEADING_TAGS.contains(&element.value().name())
}

/// PDF links from the first block after a matching heading.
///
/// Scans the heading's following siblings up to the next heading; when the
/// heading is wrapped in its own container, the container's siblings are
/// scanned instead.
fn section_links(
    html: &Html,
    page_url: &Url,
    heading: &str,
    exclude: &[&str],
) -> Result<Vec<Url>> {
    let needle = heading.to_lowercase();
    let anchor = selector("a[href]")?;

    let heading_selector = selector(&HEADING_TAGS.join(", "))?;
    let headings = html
        .select(&heading_selector)
        .filter(|h| anchor_text(*h).to_lowercase().contains(&needle));

    for heading in headings {
        let mut starts = vec![heading];
        if let Some(parent) = heading.parent().and_then(ElementRef::wrap) {
            starts.push(parent);
        }

        for start in starts {
            let links = links_after(start, page_url, &anchor, exclude);
            if !links.is_empty() {
                return Ok(links);
            }
        }
    }

    Ok(Vec::new())
}

fn links_after(
    start: ElementRef<'_>,
    page_url: &Url,
    anchor: &Selector,
    exclude: &[&str],
) -> Vec<Url> {
    for sibling in start.next_siblings().filter_map(ElementRef::wrap) {
        if is_heading(sibling) {
            break;
        }

        let links: Vec<Url> = sibling
            .select(anchor)
            .filter_map(|a| resolve_href(page_url, a))
            .filter(|url| is_pdf_url(url))
            .filter(|url| !is_excluded(url, exclude))
            .collect();

        if !links.is_empty() {
            return links;
        }
    }
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn page(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    fn urls(found: Vec<Url>) -> Vec<String> {
        found.into_iter().map(String::from).collect()
    }

    #[test]
    fn test_expand_template() {
        let rule = DiscoveryRule::UrlTemplate {
            pattern: "https://www.nice.org.uk/guidance/{code}/pdf".to_string(),
        };
        assert_eq!(
            rule.expand("ta1044").map(String::from),
            Some("https://www.nice.org.uk/guidance/ta1044/pdf".to_string())
        );
        assert!(!rule.needs_page());
    }

    #[test]
    fn test_expand_page_rule_is_none() {
        let rule = DiscoveryRule::AnchorTextMatch {
            text: "Download guidance (PDF)",
        };
        assert_eq!(rule.expand("ta1044"), None);
        assert!(rule.needs_page());
    }

    #[test]
    fn test_anchor_text_match_resolves_relative_href() {
        let html = Html::parse_document(
            r#"<html><body>
                <a href="/guidance/ta1044/history">History</a>
                <a class="btn" href="/guidance/ta1044/resources/guidance-pdf-123#page=2">
                    Download   guidance (PDF)
                </a>
            </body></html>"#,
        );
        let rule = DiscoveryRule::AnchorTextMatch {
            text: "Download guidance (PDF)",
        };
        let found = rule
            .scan(&html, &page("https://www.nice.org.uk/guidance/ta1044"))
            .unwrap();
        assert_eq!(
            urls(found),
            vec!["https://www.nice.org.uk/guidance/ta1044/resources/guidance-pdf-123"]
        );
    }

    #[test]
    fn test_anchor_class_filter_keywords() {
        let html = Html::parse_document(
            r#"<ul>
                <li><a class="download-helper" href="/downloads/39-261-6001/2023-05-04_AM-RL-XII_Drug.pdf">Beschluss</a></li>
                <li><a class="download-helper" href="/downloads/40-268-9001/2023-05-04_Press.pdf">Presse</a></li>
                <li><a class="download-helper" href="https://www.g-ba.de/downloads/40-1465-1/Justification_EN.pdf">Justification</a></li>
                <li><a href="/downloads/39-261-6002/Resolution_EN.pdf">No class</a></li>
                <li><a class="download-helper" href="/downloads/39-261-6003/Resolution_EN.pdf">Resolution</a></li>
            </ul>"#,
        );
        let rule = DiscoveryRule::AnchorClassFilter {
            class: "download-helper",
            keywords: &["resolution", "justification", "rl-xii"],
        };
        let found = rule
            .scan(&html, &page("https://www.g-ba.de/beschluesse/6001/"))
            .unwrap();
        assert_eq!(
            urls(found),
            vec![
                "https://www.g-ba.de/downloads/39-261-6001/2023-05-04_AM-RL-XII_Drug.pdf",
                "https://www.g-ba.de/downloads/40-1465-1/Justification_EN.pdf",
                "https://www.g-ba.de/downloads/39-261-6003/Resolution_EN.pdf",
            ]
        );
    }

    #[test]
    fn test_list_head_takes_first_items() {
        let html = Html::parse_document(
            r#"<ul class="download-list">
                <li><a href="first.pdf">1</a></li>
                <li><span>no link</span><a href="second.pdf">2</a></li>
                <li><a href="third.pdf">3</a></li>
            </ul>"#,
        );
        let rule = DiscoveryRule::ListHead {
            items: ".download-list li",
            limit: 2,
        };
        assert_eq!(rule.confidence(), Confidence::Fallback);
        let found = rule
            .scan(&html, &page("https://www.g-ba.de/beschluesse/6001/"))
            .unwrap();
        assert_eq!(
            urls(found),
            vec![
                "https://www.g-ba.de/beschluesse/6001/first.pdf",
                "https://www.g-ba.de/beschluesse/6001/second.pdf",
            ]
        );
    }

    #[test]
    fn test_section_heading_then_list() {
        let html = Html::parse_document(
            r#"<div>
                <h2>Version française</h2>
                <ul><li><a href="/upload/docs/application/pdf/avis_fr.pdf">Avis</a></li></ul>
                <h2>English version</h2>
                <p>Intro text</p>
                <ul>
                    <li><a href="/upload/docs/application/pdf/opinion_en.pdf">Opinion</a></li>
                    <li><a href="/plugins/ModuleXitiKLEE/types/FileDocument/doXiti.jsp?id=c_1.pdf">Tracked</a></li>
                    <li><a href="/jcms/p_123/en/page">Not a pdf</a></li>
                </ul>
                <h2>Other</h2>
                <ul><li><a href="/upload/docs/application/pdf/other.pdf">Other</a></li></ul>
            </div>"#,
        );
        let rule = DiscoveryRule::SectionHeadingThenList {
            heading: "English version",
            exclude: &["doxiti.jsp"],
        };
        let found = rule
            .scan(&html, &page("https://www.has-sante.fr/jcms/p_123/fr/drug"))
            .unwrap();
        assert_eq!(
            urls(found),
            vec!["https://www.has-sante.fr/upload/docs/application/pdf/opinion_en.pdf"]
        );
    }

    #[test]
    fn test_section_heading_wrapped_in_container() {
        let html = Html::parse_document(
            r#"<div class="block"><h3><span>English version</span></h3></div>
               <div class="files"><a href="https://www.has-sante.fr/upload/docs/application/pdf/en.pdf">EN</a></div>"#,
        );
        let rule = DiscoveryRule::SectionHeadingThenList {
            heading: "english version",
            exclude: &[],
        };
        let found = rule
            .scan(&html, &page("https://www.has-sante.fr/jcms/p_1/fr/x"))
            .unwrap();
        assert_eq!(
            urls(found),
            vec!["https://www.has-sante.fr/upload/docs/application/pdf/en.pdf"]
        );
    }

    #[test]
    fn test_upload_scan_excludes_proxy_links() {
        let html = Html::parse_document(
            r#"<a href="/upload/docs/application/pdf/2023-05/opinion.pdf">A</a>
               <a href="/plugins/ModuleXitiKLEE/types/FileDocument/doXiti.jsp?id=/upload/x.pdf">B</a>
               <a href="/docs/application/pdf/no-upload.pdf">C</a>
               <a href="/upload/docs/application/zip/archive.zip">D</a>
               <a href="mailto:contact@has-sante.fr">E</a>"#,
        );
        let rule = DiscoveryRule::UploadPathScan {
            segment: "upload",
            exclude: &["doxiti.jsp"],
        };
        let found = rule
            .scan(&html, &page("https://www.has-sante.fr/jcms/p_1/fr/x"))
            .unwrap();
        assert_eq!(
            urls(found),
            vec!["https://www.has-sante.fr/upload/docs/application/pdf/2023-05/opinion.pdf"]
        );
    }

    #[test]
    fn test_no_matching_anchors_is_empty() {
        let html = Html::parse_document("<html><body><p>Nothing here</p></body></html>");
        let rule = DiscoveryRule::AnchorClassFilter {
            class: "download-helper",
            keywords: &["resolution"],
        };
        let found = rule
            .scan(&html, &page("https://www.g-ba.de/some-decision-page"))
            .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let html = Html::parse_document("<p></p>");
        let rule = DiscoveryRule::ListHead {
            items: "li[[",
            limit: 2,
        };
        let err = rule
            .scan(&html, &page("https://www.g-ba.de/x"))
            .unwrap_err();
        assert!(matches!(err, HarvesterError::Selector { .. }));
    }
}
