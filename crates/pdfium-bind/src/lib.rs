//! # pdfium-bind
//!
//! Find a [PDFium](https://pdfium.googlesource.com/pdfium/) shared library on
//! the local machine and bind `pdfium-render` to it, so callers never have to
//! export `DYLD_LIBRARY_PATH` / `LD_LIBRARY_PATH` by hand.
//!
//! ## Search order
//!
//! [`bind_pdfium`] tries each location in turn and binds to the first library
//! that loads:
//!
//! 1. `PDFIUM_LIB_PATH`: explicit path to the library file.
//! 2. The per-user cache directory (see [`pdfium_cache_dir`]).
//! 3. The directory containing the running executable.
//! 4. The system library search path.
//!
//! ## Usage
//!
//! ```rust,no_run
//! let pdfium = pdfium_bind::bind_pdfium().expect("PDFium unavailable");
//! let document = pdfium.load_pdf_from_file("a.pdf", None).unwrap();
//! println!("{} pages", document.pages().len());
//! ```
//!
//! ## Environment variable overrides
//!
//! - `PDFIUM_LIB_PATH`: path to an existing pdfium library.
//! - `PDFIUM_AUTO_CACHE_DIR`: override the default cache directory.

use std::path::{Path, PathBuf};

use pdfium_render::prelude::Pdfium;
use thiserror::Error;

/// The pdfium-binaries release tag this crate expects in the cache directory.
pub const PDFIUM_VERSION: &str = "7690";

// ── Error type ───────────────────────────────────────────────────────────────

/// Errors returned while locating or binding PDFium.
#[derive(Error, Debug)]
pub enum PdfiumBindError {
    /// The current OS/architecture combination has no known library name.
    #[error("Unsupported platform: {os}/{arch}")]
    UnsupportedPlatform { os: String, arch: String },

    /// `pdfium-render` could not load the library at `path`.
    #[error("Failed to bind PDFium from '{path}': {reason}")]
    Bind { path: PathBuf, reason: String },

    /// Every candidate location failed, including the system library.
    #[error("No usable PDFium library found (tried {tried} locations): {reason}")]
    NotFound { tried: usize, reason: String },
}

// ── Platform metadata ────────────────────────────────────────────────────────

/// File name of the PDFium shared library on the current platform.
pub fn platform_library_name() -> Result<&'static str, PdfiumBindError> {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;

    match os {
        "macos" => Ok("libpdfium.dylib"),
        "linux" | "freebsd" | "android" => Ok("libpdfium.so"),
        "windows" => Ok("pdfium.dll"),
        _ => Err(PdfiumBindError::UnsupportedPlatform {
            os: os.to_string(),
            arch: arch.to_string(),
        }),
    }
}

// ── Cache directory resolution ───────────────────────────────────────────────

/// Returns the per-version cache directory searched for the PDFium library.
///
/// Default locations:
/// - **macOS**: `~/Library/Caches/pdfdiff/pdfium-{VERSION}/`
/// - **Linux**: `~/.cache/pdfdiff/pdfium-{VERSION}/`
/// - **Windows**: `%LOCALAPPDATA%\pdfdiff\pdfium-{VERSION}\`
///
/// Override by setting `PDFIUM_AUTO_CACHE_DIR`.
pub fn pdfium_cache_dir() -> PathBuf {
    if let Ok(override_dir) = std::env::var("PDFIUM_AUTO_CACHE_DIR") {
        return PathBuf::from(override_dir).join(format!("pdfium-{PDFIUM_VERSION}"));
    }

    let base = dirs::cache_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".cache")))
        .unwrap_or_else(std::env::temp_dir);

    base.join("pdfdiff").join(format!("pdfium-{PDFIUM_VERSION}"))
}

/// Candidate library files, in search order. Only existing files are listed.
pub fn library_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(p) = std::env::var("PDFIUM_LIB_PATH") {
        if !p.is_empty() {
            candidates.push(PathBuf::from(p));
        }
    }

    if let Ok(name) = platform_library_name() {
        candidates.push(pdfium_cache_dir().join(name));

        if let Some(exe_dir) = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join(name));
        }
    }

    candidates.retain(|p| p.is_file());
    candidates
}

// ── Public API ───────────────────────────────────────────────────────────────

/// Binds to PDFium using the search order described in the crate docs.
pub fn bind_pdfium() -> Result<Pdfium, PdfiumBindError> {
    let candidates = library_candidates();
    let mut last_reason = String::from("no candidate library files exist");

    for path in &candidates {
        match bind_pdfium_from_path(path) {
            Ok(pdfium) => return Ok(pdfium),
            Err(e) => last_reason = e.to_string(),
        }
    }

    Pdfium::bind_to_system_library()
        .map(Pdfium::new)
        .map_err(|e| PdfiumBindError::NotFound {
            tried: candidates.len() + 1,
            reason: format!("{last_reason}; system library: {e}"),
        })
}

/// Binds to a PDFium library at an explicit `path`.
pub fn bind_pdfium_from_path(path: &Path) -> Result<Pdfium, PdfiumBindError> {
    Pdfium::bind_to_library(path)
        .map(Pdfium::new)
        .map_err(|e| PdfiumBindError::Bind {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
