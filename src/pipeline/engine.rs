//! Document-engine capabilities consumed by the comparators.
//!
//! The comparison core never talks to PDFium directly. It needs two things:
//! something that can tell it about pages and rasterise them ([`Document`]),
//! and somewhere to stream the composite output ([`OutputSink`]). The PDFium
//! implementations live in [`super::render`] and [`super::sink`]; tests use
//! in-memory fakes.

use super::buffer::PixelBuffer;
use crate::error::PdfDiffError;

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    /// US Letter, the fallback when a document has no pages to take a size from.
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Raster size at `dpi`, truncating partial pixels.
    pub fn to_pixels(self, dpi: u32) -> (u32, u32) {
        let px = |points: f32| (f64::from(dpi) * f64::from(points) / 72.0).max(0.0) as u32;
        (px(self.width), px(self.height))
    }
}

/// An opened, paginated document.
pub trait Document {
    fn page_count(&self) -> usize;

    fn page_size(&self, index: usize) -> Result<PageSize, PdfDiffError>;

    /// Rasterise page `index` (0-based) at `dpi` onto a white background.
    fn render_page(&self, index: usize, dpi: u32) -> Result<PixelBuffer, PdfDiffError>;

    /// Size of the page's embedded thumbnail, if the document carries one.
    fn thumbnail_size(&self, index: usize) -> Option<(u32, u32)> {
        let _ = index;
        None
    }
}

/// One page of a [`Document`].
#[derive(Debug)]
pub struct PageRef<'a, D: Document> {
    pub document: &'a D,
    pub index: usize,
}

impl<D: Document> Clone for PageRef<'_, D> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<D: Document> Copy for PageRef<'_, D> {}

impl<'a, D: Document> PageRef<'a, D> {
    pub fn new(document: &'a D, index: usize) -> Self {
        Self { document, index }
    }

    pub fn render(&self, dpi: u32) -> Result<PixelBuffer, PdfDiffError> {
        self.document.render_page(self.index, dpi)
    }

    pub fn thumbnail_size(&self) -> Option<(u32, u32)> {
        self.document.thumbnail_size(self.index)
    }
}

/// Destination for the composite diff document.
///
/// Pages are built up with paint calls and committed in order by
/// [`OutputSink::show_page`]. The page size may change between pages but must
/// be set before painting.
pub trait OutputSink {
    /// The document type whose pages can be copied verbatim.
    type Document: Document;

    fn set_page_size(&mut self, size: PageSize) -> Result<(), PdfDiffError>;

    /// Paint `buffer` at the top-left of the current page, with each pixel
    /// `scale` points wide.
    fn paint_image(&mut self, buffer: &PixelBuffer, scale: f32) -> Result<(), PdfDiffError>;

    /// Place page `index` of `document` on the current page without rasterising it.
    fn paint_vector_page(
        &mut self,
        document: &Self::Document,
        index: usize,
    ) -> Result<(), PdfDiffError>;

    /// Commit the current page and start a new one.
    fn show_page(&mut self) -> Result<(), PdfDiffError>;

    /// Finish the document and release the destination.
    fn close(self) -> Result<(), PdfDiffError>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_at_300_dpi() {
        assert_eq!(PageSize::LETTER.to_pixels(300), (2550, 3300));
    }

    #[test]
    fn one_inch_at_72_dpi_is_72_pixels() {
        assert_eq!(PageSize::new(72.0, 144.0).to_pixels(72), (72, 144));
    }

    #[test]
    fn partial_pixels_are_truncated() {
        assert_eq!(PageSize::new(10.0, 10.0).to_pixels(100), (13, 13));
    }
}
