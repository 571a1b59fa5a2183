//! Pipeline stages for visual PDF comparison.
//!
//! The pixel work ([`align`], [`buffer`], [`diff`]) knows nothing about PDFs.
//! Everything document-shaped goes through the traits in [`engine`], with the
//! pdfium implementations in [`render`] and [`sink`].
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ diff ──▶ sink
//! (path)    (pdfium)   (pixels)  (diff PDF)
//! ```
//!
//! 1. [`input`]  - check both paths are readable PDFs
//! 2. [`render`] - rasterise each page pair at the configured DPI
//! 3. [`diff`]   - align the two rasters and composite changed rows
//! 4. [`sink`]   - write changed pages as images, unchanged pages as vectors

pub mod align;
pub mod buffer;
pub mod diff;
pub mod engine;
pub mod input;
pub mod render;
pub mod sink;
pub mod slot;
