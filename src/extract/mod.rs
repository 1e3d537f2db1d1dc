//! Reduce an arbitrary HTML page to the plain text of its main content.
//!
//! Three stages run in order on one document:
//! - [`noise::strip`] drops scripts, styles and comments,
//! - [`region::select_region`] picks the likely article body,
//! - [`normalize::normalize`] turns the remaining markup into paragraphs.
//!
//! Every pattern is matched with the `regex` crate, which runs in time linear
//! to the input, so hostile markup cannot trigger runaway backtracking.

pub mod entities;
pub mod noise;
pub mod normalize;
pub mod region;

use std::sync::LazyLock;

use tracing::trace;

pub use entities::decode;
pub use normalize::{normalize, Normalized, Normalizer};
pub use region::{select_region, Region, RegionMatcher, RegionSelector, RegionSource};

pub const EMPTY_RESULT_REASON: &str = "no usable content extracted";

static DEFAULT_EXTRACTOR: LazyLock<Extractor> = LazyLock::new(Extractor::default);

/// Outcome of one extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub text: String,
    pub success: bool,
    /// Set only when `success` is false.
    pub failure_reason: Option<String>,
    /// The text hit the output limit and was cut mid-stream.
    pub truncated: bool,
}

impl ExtractionResult {
    pub fn extracted(normalized: Normalized) -> Self {
        Self {
            text: normalized.text,
            success: true,
            failure_reason: None,
            truncated: normalized.truncated,
        }
    }

    pub fn failure(reason: impl Into<String>) -> Self {
        Self {
            text: String::new(),
            success: false,
            failure_reason: Some(reason.into()),
            truncated: false,
        }
    }
}

/// Runs the three stages with configurable region matchers and thresholds.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    selector: RegionSelector,
    normalizer: Normalizer,
}

impl Extractor {
    pub fn new(selector: RegionSelector, normalizer: Normalizer) -> Self {
        Self {
            selector,
            normalizer,
        }
    }

    pub fn extract(&self, doc: &str) -> ExtractionResult {
        let cleaned = noise::strip(doc);
        let region = self.selector.select(&cleaned);
        trace!(
            source = ?region.source,
            region_bytes = region.text.len(),
            doc_bytes = doc.len(),
            "selected content region"
        );

        let normalized = self.normalizer.normalize(region.text);
        if normalized.text.is_empty() {
            return ExtractionResult::failure(EMPTY_RESULT_REASON);
        }
        ExtractionResult::extracted(normalized)
    }
}

/// Extract with the default matchers and thresholds.
pub fn extract(doc: &str) -> ExtractionResult {
    DEFAULT_EXTRACTOR.extract(doc)
}
