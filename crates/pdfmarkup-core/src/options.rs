//! Request-scoped extraction options.

use crate::markup::DEFAULT_MAX_SAMPLES;
use crate::overlap::DEFAULT_MIN_OVERLAP;

/// Default serialized-size budget: headroom under a 32 MiB response ceiling.
pub const DEFAULT_BYTE_BUDGET: usize = 28 * 1024 * 1024;

/// Options for one extraction run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Produce compact spans with markup correlation instead of raw text.
    pub compact: bool,
    /// Page-range expression; `None` selects every page.
    pub pages: Option<String>,
    /// Maximum span text length in characters. Zero is ignored.
    pub truncate_span: Option<usize>,
    /// Stop after the page that pushes serialized output past this size.
    pub byte_budget: usize,
    /// IoU threshold for span/markup matching.
    pub min_overlap: f64,
    /// Samples attached per span and mark kind.
    pub max_samples: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            compact: false,
            pages: None,
            truncate_span: None,
            byte_budget: DEFAULT_BYTE_BUDGET,
            min_overlap: DEFAULT_MIN_OVERLAP,
            max_samples: DEFAULT_MAX_SAMPLES,
        }
    }
}

impl ExtractOptions {
    /// Compact mode with defaults otherwise.
    pub fn compact() -> Self {
        Self {
            compact: true,
            ..Self::default()
        }
    }

    /// The effective truncation length, if any.
    pub fn truncate_len(&self) -> Option<usize> {
        self.truncate_span.filter(|&n| n > 0)
    }
}
