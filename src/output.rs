//! Comparison results.
//!
//! [`DocumentVerdict`] is what the library hands back and what the CLI prints
//! with `--json`, so it derives `Serialize`.

use crate::pipeline::buffer::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Outcome of comparing one page pair.
#[derive(Debug, Clone)]
pub struct PageVerdict {
    /// True when the rasters matched exactly (within tolerance) and had the
    /// same size and placement.
    pub equal: bool,
    /// Scaled-down overview of the changes, when the first page had a thumbnail.
    pub thumbnail: Option<PixelBuffer>,
}

/// Outcome of comparing two documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentVerdict {
    /// Page count of the first document.
    pub pages_first: usize,
    /// Page count of the second document.
    pub pages_second: usize,
    /// Larger of the two page counts.
    pub pages_total: usize,
    /// Pages found to differ. Stops at 1 when the comparison exited early.
    pub pages_differ: usize,
    /// Per-page flags, present when a full scan was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub differences: Option<Vec<bool>>,
}

impl DocumentVerdict {
    /// True when the page counts match and no page differs.
    pub fn is_identical(&self) -> bool {
        self.pages_differ == 0 && self.pages_first == self.pages_second
    }
}
