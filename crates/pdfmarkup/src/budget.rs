//! Response-size budgeting.
//!
//! Pages are committed in ascending order. After each commit the page's
//! serialized length is added to a running total; once the total exceeds the
//! budget no further pages are accepted. The page that crossed the line is
//! kept.

use pdfmarkup_core::PageResult;

#[derive(Debug, Clone)]
pub struct ByteBudget {
    limit: usize,
    used: usize,
    exhausted: bool,
}

impl ByteBudget {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            used: 0,
            exhausted: false,
        }
    }

    /// Serialized bytes counted so far.
    pub fn used(&self) -> usize {
        self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Count a committed page. Returns `true` while more pages may follow.
    ///
    /// A page that cannot be serialized counts as zero bytes.
    pub fn commit(&mut self, page: &PageResult) -> bool {
        let len = match serde_json::to_vec(page) {
            Ok(bytes) => bytes.len(),
            Err(e) => {
                tracing::warn!(page = page.number(), error = %e, "page size unknown");
                0
            }
        };
        self.used = self.used.saturating_add(len);
        if self.used > self.limit {
            self.exhausted = true;
        }
        !self.exhausted
    }
}
