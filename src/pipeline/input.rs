//! Input resolution: validate a user-supplied path before pdfium sees it.
//!
//! ## Why check the magic bytes ourselves?
//!
//! pdfium reports every unreadable file with the same opaque format error.
//! Checking existence, read permission and the `%PDF` header up front lets the
//! CLI say which of the two inputs is wrong and why.

use crate::error::PdfDiffError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate `path` as a readable PDF and return its absolute form.
pub fn resolve_input(path: &Path) -> Result<PathBuf, PdfDiffError> {
    let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());

    if !path.exists() {
        return Err(PdfDiffError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            let mut magic = [0u8; 4];
            // Files shorter than the header can't be PDFs either.
            let read = f.read(&mut magic).unwrap_or(0);
            if read < magic.len() || &magic != b"%PDF" {
                return Err(PdfDiffError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfDiffError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfDiffError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_input(&dir.path().join("nope.pdf")).unwrap_err();
        assert!(matches!(err, PdfDiffError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let file = write_temp(b"hello world");
        match resolve_input(file.path()).unwrap_err() {
            PdfDiffError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn short_file_is_rejected() {
        let file = write_temp(b"%P");
        assert!(matches!(
            resolve_input(file.path()).unwrap_err(),
            PdfDiffError::NotAPdf { .. }
        ));
    }

    #[test]
    fn pdf_header_is_accepted() {
        let file = write_temp(b"%PDF-1.7\n%%EOF\n");
        let resolved = resolve_input(file.path()).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(file.path().file_name().unwrap()));
    }

    #[test]
    fn directory_is_not_a_pdf() {
        let dir = tempfile::tempdir().unwrap();
        // Opening a directory succeeds on Unix but reading it fails.
        let err = resolve_input(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            PdfDiffError::NotAPdf { .. } | PdfDiffError::FileNotFound { .. }
        ));
    }
}
