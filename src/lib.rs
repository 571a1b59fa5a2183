//! # edgequake-pdfdiff
//!
//! Visually compare two PDF documents, page by page.
//!
//! ## Why compare pixels?
//!
//! Two PDFs can be byte-for-byte different and still look identical: a new
//! producer, re-ordered objects, re-encoded fonts. Text extraction misses the
//! opposite case, where a figure moves or a glyph changes. This crate
//! rasterises both documents with pdfium and compares what a reader would see.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF A ─┐
//!        ├─ 1. Input    check both paths are readable PDFs
//!        ├─ 2. Render   rasterise each page pair at the same DPI
//!        ├─ 3. Align    place both rasters in a common union rectangle
//!        ├─ 4. Diff     composite A and B, flag changed rows
//!        ├─ 5. Output   optional diff PDF (changed pages as images)
//! PDF B ─┘  6. Verdict  page counts, differing pages, per-page flags
//! ```
//!
//! In the composite, content only in the first document turns blue and
//! content only in the second turns yellow; unchanged content keeps its colour.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_pdfdiff::{compare_files, CompareConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = CompareConfig::builder().dpi(150).build()?;
//!     let verdict = compare_files(
//!         "before.pdf",
//!         "after.pdf",
//!         Some(Path::new("diff.pdf")),
//!         true,
//!         &config,
//!     )?;
//!     println!("{} of {} pages differ", verdict.pages_differ, verdict.pages_total);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfdiff` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! edgequake-pdfdiff = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod compare;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use compare::{compare_documents, compare_files, compare_page};
pub use config::{CompareConfig, CompareConfigBuilder};
pub use error::PdfDiffError;
pub use output::{DocumentVerdict, PageVerdict};
pub use pipeline::buffer::PixelBuffer;
pub use pipeline::diff::{diff_images, DiffResult};
pub use pipeline::engine::{Document, OutputSink, PageRef, PageSize};
pub use pipeline::render::PdfiumDocument;
pub use pipeline::sink::PdfiumSink;
pub use pipeline::slot::PageSlot;
pub use progress::{ComparisonProgressCallback, NoopProgressCallback, ProgressCallback};
