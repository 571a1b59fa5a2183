//! The diff PDF: an [`OutputSink`] backed by a new pdfium document.
//!
//! Changed pages are embedded as one raster image covering the page. Unchanged
//! pages are imported from the first document as-is. That keeps their vector
//! text and drawings, and the output stays far smaller than an all-raster diff.
//!
//! The document is only written when [`OutputSink::close`] is called. It is
//! saved to a sibling temp file and renamed into place, so an interrupted run
//! never leaves a truncated PDF at the requested path.

use super::buffer::PixelBuffer;
use super::engine::{OutputSink, PageSize};
use super::render::PdfiumDocument;
use crate::error::PdfDiffError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

enum PendingPage {
    Empty,
    Raster {
        image: DynamicImage,
        width: f32,
        height: f32,
    },
    Imported,
}

/// Builds the composite diff PDF page by page.
pub struct PdfiumSink<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
    page_size: PageSize,
    pending: PendingPage,
    pages_written: usize,
}

impl<'a> PdfiumSink<'a> {
    /// Start a new, empty diff document that will be saved to `path`.
    pub fn create(
        pdfium: &'a Pdfium,
        path: impl AsRef<Path>,
        page_size: PageSize,
    ) -> Result<Self, PdfDiffError> {
        let path = path.as_ref().to_path_buf();
        let document = pdfium
            .create_new_pdf()
            .map_err(|e| Self::write_error(&path, e))?;

        debug!(path = %path.display(), ?page_size, "Created diff document");

        Ok(Self {
            path,
            document,
            page_size,
            pending: PendingPage::Empty,
            pages_written: 0,
        })
    }

    fn write_error(path: &Path, e: impl std::fmt::Debug) -> PdfDiffError {
        PdfDiffError::OutputWriteFailed {
            path: path.to_path_buf(),
            detail: format!("{:?}", e),
        }
    }

    fn page_index(&self, position: usize) -> Result<PdfPageIndex, PdfDiffError> {
        PdfPageIndex::try_from(position).map_err(|_| PdfDiffError::OutputWriteFailed {
            path: self.path.clone(),
            detail: format!("page {} exceeds the PDF page limit", position + 1),
        })
    }

    fn new_page(&mut self) -> Result<PdfPage<'a>, PdfDiffError> {
        let size = PdfPagePaperSize::Custom(
            PdfPoints::new(self.page_size.width),
            PdfPoints::new(self.page_size.height),
        );
        self.document
            .pages_mut()
            .create_page_at_end(size)
            .map_err(|e| Self::write_error(&self.path, e))
    }
}

impl<'a> OutputSink for PdfiumSink<'a> {
    type Document = PdfiumDocument<'a>;

    fn set_page_size(&mut self, size: PageSize) -> Result<(), PdfDiffError> {
        self.page_size = size;
        Ok(())
    }

    fn paint_image(&mut self, buffer: &PixelBuffer, scale: f32) -> Result<(), PdfDiffError> {
        self.pending = PendingPage::Raster {
            image: DynamicImage::ImageRgb8(buffer.to_rgb_image()),
            width: buffer.width() as f32 * scale,
            height: buffer.height() as f32 * scale,
        };
        Ok(())
    }

    fn paint_vector_page(
        &mut self,
        document: &Self::Document,
        index: usize,
    ) -> Result<(), PdfDiffError> {
        let source_index = PdfPageIndex::try_from(index).map_err(|_| {
            PdfDiffError::PageOutOfRange {
                page: index + 1,
                total: document.pdf().pages().len() as usize,
            }
        })?;
        let destination_index = self.page_index(self.pages_written)?;

        self.document
            .pages_mut()
            .copy_page_from_document(document.pdf(), source_index, destination_index)
            .map_err(|e| Self::write_error(&self.path, e))?;

        self.pending = PendingPage::Imported;
        Ok(())
    }

    fn show_page(&mut self) -> Result<(), PdfDiffError> {
        match std::mem::replace(&mut self.pending, PendingPage::Empty) {
            PendingPage::Imported => {}
            PendingPage::Empty => {
                self.new_page()?;
            }
            PendingPage::Raster {
                image,
                width,
                height,
            } => {
                let page_height = self.page_size.height;
                let mut page = self.new_page()?;
                // PDF space grows upwards; anchor the raster at the top-left corner.
                page.objects_mut()
                    .create_image_object(
                        PdfPoints::new(0.0),
                        PdfPoints::new(page_height - height),
                        &image,
                        Some(PdfPoints::new(width)),
                        Some(PdfPoints::new(height)),
                    )
                    .map_err(|e| Self::write_error(&self.path, e))?;
            }
        }

        self.pages_written += 1;
        Ok(())
    }

    fn close(self) -> Result<(), PdfDiffError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Self::write_error(&self.path, e))?;
        }

        let tmp_path = self.path.with_extension("pdf.tmp");
        self.document
            .save_to_file(&tmp_path)
            .map_err(|e| Self::write_error(&self.path, e))?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| Self::write_error(&self.path, e))?;

        info!(
            path = %self.path.display(),
            pages = self.pages_written,
            "Diff PDF written"
        );
        Ok(())
    }
}
