//! PDF rasterisation via pdfium: the [`Document`] implementation for real files.
//!
//! ## Why explicit pixel sizes, not a scale factor?
//!
//! Both documents must rasterise a page of the same physical size to exactly
//! the same pixel grid, or every page would be reported as a size mismatch.
//! The pixel size is computed once as `floor(dpi × points / 72)` per axis and
//! handed to pdfium as a target size, so rounding inside the renderer cannot
//! make the two sides disagree by a pixel.
//!
//! ## Thumbnails
//!
//! pdfium-render has no API for embedded page thumbnails, so
//! [`Document::thumbnail_size`] keeps its default of `None` here.

use super::buffer::PixelBuffer;
use super::engine::{Document, PageSize};
use crate::error::PdfDiffError;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A PDF opened through pdfium.
pub struct PdfiumDocument<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `path`, optionally decrypting it with `password`.
    pub fn open(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, PdfDiffError> {
        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    PdfDiffError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    PdfDiffError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                PdfDiffError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        info!(
            path = %path.display(),
            pages = document.pages().len(),
            "PDF loaded"
        );

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    /// The underlying pdfium document, for copying pages into the output.
    pub(crate) fn pdf(&self) -> &PdfDocument<'a> {
        &self.document
    }

    fn page_index(&self, index: usize) -> Result<PdfPageIndex, PdfDiffError> {
        let total = self.page_count();
        if index >= total {
            return Err(PdfDiffError::PageOutOfRange {
                page: index + 1,
                total,
            });
        }
        PdfPageIndex::try_from(index).map_err(|_| PdfDiffError::PageOutOfRange {
            page: index + 1,
            total,
        })
    }
}

impl Document for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page_size(&self, index: usize) -> Result<PageSize, PdfDiffError> {
        let page = self
            .document
            .pages()
            .get(self.page_index(index)?)
            .map_err(|e| PdfDiffError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        Ok(PageSize::new(page.width().value, page.height().value))
    }

    fn render_page(&self, index: usize, dpi: u32) -> Result<PixelBuffer, PdfDiffError> {
        let page = self
            .document
            .pages()
            .get(self.page_index(index)?)
            .map_err(|e| PdfDiffError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let size = PageSize::new(page.width().value, page.height().value);
        let (width_px, height_px) = size.to_pixels(dpi);

        let render_config =
            PdfRenderConfig::new().set_target_size(width_px.max(1) as i32, height_px.max(1) as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfDiffError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image().to_rgb8();
        debug!(
            path = %self.path.display(),
            page = index + 1,
            dpi,
            "Rendered page → {}x{} px",
            image.width(),
            image.height()
        );

        Ok(PixelBuffer::from_rgb_image(&image))
    }
}
