//! Progress-callback trait for per-page comparison events.
//!
//! Inject an [`Arc<dyn ComparisonProgressCallback>`] via
//! [`crate::config::CompareConfigBuilder::progress_callback`] to receive
//! events as the comparator walks both documents. The CLI uses it for the
//! `--verbose` report and the `--progress` bar; library callers can forward
//! events anywhere without the comparator knowing about terminals.
//!
//! # Example
//!
//! ```rust
//! use edgequake_pdfdiff::{ComparisonProgressCallback, CompareConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     differing: AtomicUsize,
//! }
//!
//! impl ComparisonProgressCallback for CountingCallback {
//!     fn on_page_compared(&self, page_num: usize, pages_total: usize, differs: bool) {
//!         if differs {
//!             self.differing.fetch_add(1, Ordering::SeqCst);
//!             eprintln!("page {page_num}/{pages_total} differs");
//!         }
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { differing: AtomicUsize::new(0) });
//!
//! let config = CompareConfig::builder()
//!     .progress_callback(counter as Arc<dyn ComparisonProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the document comparator as it processes each page pair.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Comparison is sequential, so events arrive in page
/// order; the `Send + Sync` bound lets one config be shared across threads.
pub trait ComparisonProgressCallback: Send + Sync {
    /// Called once before the first page is rasterised.
    ///
    /// # Arguments
    /// * `pages_first`  - page count of the first (baseline) document
    /// * `pages_second` - page count of the second document
    fn on_comparison_start(&self, pages_first: usize, pages_second: usize) {
        let _ = (pages_first, pages_second);
    }

    /// Called after each page pair has been compared.
    ///
    /// # Arguments
    /// * `page_num`    - 1-indexed page number
    /// * `pages_total` - larger of the two page counts
    /// * `differs`     - true when the pages differ (or one is missing)
    fn on_page_compared(&self, page_num: usize, pages_total: usize, differs: bool) {
        let _ = (page_num, pages_total, differs);
    }

    /// Called once when the page loop ends, including after an early exit.
    ///
    /// # Arguments
    /// * `pages_differ` - pages found to differ
    /// * `pages_total`  - larger of the two page counts
    fn on_comparison_complete(&self, pages_differ: usize, pages_total: usize) {
        let _ = (pages_differ, pages_total);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ComparisonProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::CompareConfig`].
pub type ProgressCallback = Arc<dyn ComparisonProgressCallback>;
