//! Rule-based discovery of guidance PDFs.
//!
//! Each authority is described by a [`SourceProfile`]: an ordered list of
//! [`DiscoveryRule`]s plus a few request settings. One [`DiscoveryEngine`]
//! evaluates every profile the same way.

mod engine;
mod profile;
mod rule;

pub use engine::{Discovery, DiscoveryEngine};
pub use profile::{
    gba_profile, has_profile, nice_profile, profile_for, Collect, SourceProfile,
    GBA_DOCUMENT_KEYWORDS, HAS_PROXY_PATTERNS,
};
pub use rule::{DiscoveryRule, CODE_PLACEHOLDER};
