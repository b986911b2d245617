//! HTA Harvester - Resolve health-technology-assessment guidance into text.
//!
//! This crate takes a guidance code or a guidance page URL from one of three
//! national HTA authorities (NICE in the UK, G-BA in Germany, HAS in France),
//! finds the guidance PDF(s), validates and downloads them, and turns them
//! into a size-bounded text corpus ready for summarization.
//!
//! # Example
//!
//! ```
//! use hta_harvester::router::classify;
//! use hta_harvester::types::Jurisdiction;
//!
//! let request = classify("https://www.nice.org.uk/guidance/ta1044").unwrap();
//! assert_eq!(request.jurisdiction, Jurisdiction::Uk);
//! assert_eq!(request.code(), Some("ta1044"));
//! ```
//!
//! # Architecture
//!
//! - [`router`]: Input classification and jurisdiction routing
//! - [`discovery`]: Rule tables per authority and the engine that evaluates them
//! - [`validator`]: PDF content validation of fetched responses
//! - [`extract`]: PDF text extraction
//! - [`corpus`]: Concatenation and truncation of extracted text
//! - [`harvester`]: Main harvester service
//! - [`http`]: HTTP client
//! - [`config`]: Constants and runtime options
//! - [`types`]: Shared data types
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod corpus;
pub mod discovery;
pub mod error;
pub mod extract;
pub mod harvester;
pub mod http;
pub mod router;
pub mod types;
pub mod validator;

// Re-export main functions
pub use harvester::{harvest, harvest_with_options, retrieve, save_documents, Harvest};

// Re-export commonly used items
pub use config::HarvestOptions;
pub use corpus::Corpus;
pub use error::{HarvesterError, Result};
pub use extract::ExtractedText;
pub use router::classify;
pub use types::{GuidanceRequest, Jurisdiction, RequestTarget, RetrievedDocument};
