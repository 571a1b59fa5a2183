//! Error types for the edgequake-pdfdiff library.
//!
//! Every failure is fatal: a comparison either runs to completion over all
//! required pages or stops at the first error. A half-written diff PDF or a
//! verdict computed from a subset of pages would be misleading, so nothing is
//! retried and nothing is collected for later.
//!
//! The CLI maps each variant to a process exit code via
//! [`PdfDiffError::exit_code`]: configuration problems exit with `2`,
//! everything the document engine reports exits with `3`.

use std::path::PathBuf;
use thiserror::Error;

/// Exit code for invalid or out-of-range configuration.
pub const EXIT_INVALID_ARGUMENTS: u8 = 2;

/// Exit code for documents that could not be opened, rendered or written.
pub const EXIT_DOCUMENT_ERROR: u8 = 3;

/// All errors returned by the edgequake-pdfdiff library.
#[derive(Debug, Error)]
pub enum PdfDiffError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Error opening '{path}': file not found")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Error opening '{path}': permission denied\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("Error opening '{path}': not a PDF file\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("Error opening '{path}': {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("Error opening '{path}': document is encrypted and requires a password")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Error opening '{path}': wrong password")]
    WrongPassword { path: PathBuf },

    /// A page index past the end of the document was requested.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not build or write the diff PDF.
    #[error("Failed to write diff PDF '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium must be installed to compare documents. You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place libpdfium next to the pdfdiff executable.\n\
  • Install it in a directory on the system library path.\n"
    )]
    PdfiumBindingFailed(String),
}

impl PdfDiffError {
    /// Process exit code the CLI reports for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            PdfDiffError::InvalidConfig(_) => EXIT_INVALID_ARGUMENTS,
            _ => EXIT_DOCUMENT_ERROR,
        }
    }

    /// True for failures that happen while opening an input document.
    pub fn is_open_error(&self) -> bool {
        matches!(
            self,
            PdfDiffError::FileNotFound { .. }
                | PdfDiffError::PermissionDenied { .. }
                | PdfDiffError::NotAPdf { .. }
                | PdfDiffError::CorruptPdf { .. }
                | PdfDiffError::PasswordRequired { .. }
                | PdfDiffError::WrongPassword { .. }
        )
    }
}
