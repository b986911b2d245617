//! Main harvester service that ties all stages together.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::HarvestOptions;
use crate::corpus::{build_with_limit, Corpus};
use crate::discovery::{profile_for, DiscoveryEngine};
use crate::error::{HarvesterError, Result};
use crate::extract::{extract, ExtractedText};
use crate::http::create_client;
use crate::router::classify;
use crate::types::{Confidence, GuidanceRequest, RetrievedDocument};

/// What was retrieved and read for one document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub url: String,
    pub rule: &'static str,
    pub confidence: Confidence,
    pub size: usize,
    pub pages: usize,
    pub extracted: bool,
}

/// Result of a complete harvest.
#[derive(Debug, Clone)]
pub struct Harvest {
    pub request: GuidanceRequest,
    pub documents: Vec<RetrievedDocument>,
    pub reports: Vec<DocumentReport>,
    pub corpus: Corpus,
}

impl Harvest {
    /// Source label for the summarization prompt.
    #[must_use]
    pub fn source_label(&self) -> &'static str {
        self.request.source_label()
    }

    /// Whether any document came from a best-effort rule.
    #[must_use]
    pub fn has_fallback_documents(&self) -> bool {
        self.reports
            .iter()
            .any(|r| r.confidence == Confidence::Fallback)
    }
}

/// Resolve an input and build its corpus with default options.
///
/// # Arguments
/// * `input` - A guidance code (e.g. "ta1044") or a NICE, G-BA or HAS URL
///
/// # Returns
/// A `Harvest` with the retrieved documents and the bounded corpus
pub fn harvest(input: &str) -> Result<Harvest> {
    harvest_with_options(input, &HarvestOptions::default())
}

/// Resolve an input and build its corpus.
pub fn harvest_with_options(input: &str, options: &HarvestOptions) -> Result<Harvest> {
    let request = classify(input)?;
    let documents = retrieve(&request, options)?;

    let texts: Vec<ExtractedText> = documents.iter().map(extract).collect();
    let corpus = build_with_limit(&texts, options.max_corpus_chars);

    if corpus.is_empty() {
        return Err(HarvesterError::EmptyCorpus {
            documents: documents.len(),
        });
    }

    let reports = documents
        .iter()
        .zip(&texts)
        .map(|(document, text)| DocumentReport {
            url: document.link.url.to_string(),
            rule: document.link.rule,
            confidence: document.link.confidence,
            size: document.bytes.len(),
            pages: text.pages,
            extracted: text.success,
        })
        .collect();

    tracing::info!(
        jurisdiction = request.jurisdiction.as_str(),
        documents = documents.len(),
        chars = corpus.char_count(),
        truncated = corpus.truncated,
        "Harvest complete"
    );

    Ok(Harvest {
        request,
        documents,
        reports,
        corpus,
    })
}

/// Discover and download the validated PDFs for a classified request.
///
/// # Returns
/// Documents in discovery order, or `NotFound` if none passed validation
pub fn retrieve(request: &GuidanceRequest, options: &HarvestOptions) -> Result<Vec<RetrievedDocument>> {
    let client = create_client(options)?;
    let profile = profile_for(request.jurisdiction, options);
    let engine = DiscoveryEngine::new(&client, options);

    let discovery = engine.discover(&profile, &request.target)?;

    if discovery.is_empty() {
        return Err(HarvesterError::NotFound {
            jurisdiction: request.jurisdiction,
            target: request.target.to_string(),
        });
    }

    if discovery
        .documents
        .iter()
        .any(|d| d.link.confidence == Confidence::Fallback)
    {
        tracing::warn!(
            rule = discovery.rule.unwrap_or_default(),
            "Documents come from a best-effort rule and may not be the guidance itself"
        );
    }

    Ok(discovery.documents)
}

/// Write retrieved PDFs into `dir`.
///
/// File names come from the last URL path segment; clashes get a numeric suffix.
///
/// # Returns
/// Paths of the written files, in document order
pub fn save_documents(documents: &[RetrievedDocument], dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;

    let mut used = HashSet::new();
    let mut paths = Vec::with_capacity(documents.len());

    for (index, document) in documents.iter().enumerate() {
        let base = file_stem_for(document, index);
        let mut name = format!("{base}.pdf");
        let mut counter = 2;
        while !used.insert(name.clone()) {
            name = format!("{base}-{counter}.pdf");
            counter += 1;
        }

        let path = dir.join(&name);
        fs::write(&path, &document.bytes)?;
        tracing::debug!(path = %path.display(), "Saved document");
        paths.push(path);
    }

    Ok(paths)
}

/// Safe file stem derived from the document URL.
fn file_stem_for(document: &RetrievedDocument, index: usize) -> String {
    let segment = document
        .link
        .url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .unwrap_or_default();
    let segment = segment
        .strip_suffix(".pdf")
        .or_else(|| segment.strip_suffix(".PDF"))
        .unwrap_or(segment);

    let stem: String = segment
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if stem.is_empty() {
        format!("document-{}", index + 1)
    } else {
        stem
    }
}
