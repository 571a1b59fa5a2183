//! Owned, bounds-checked RGB pixel storage.
//!
//! Pixels are stored row-major as four bytes each (R, G, B, padding) so a row
//! can be copied as one slice. The row stride is explicit and at least
//! `width * 4`; every access goes through [`PixelBuffer::row`] /
//! [`PixelBuffer::row_mut`], which slice exactly `width * 4` bytes out of the
//! stride and panic on out-of-range rows instead of reading neighbouring
//! memory.

use super::align::Rect;
use image::{Rgb, RgbImage};
use std::fmt;

/// Bytes occupied by one pixel in a [`PixelBuffer`].
pub const BYTES_PER_PIXEL: usize = 4;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLUE: Rgb<u8> = Rgb([0, 0, 255]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// A rectangular RGB raster that owns its storage.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A black buffer with a tightly packed stride.
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_stride(width, height, width as usize * BYTES_PER_PIXEL)
    }

    /// A black buffer whose rows are `stride` bytes apart.
    ///
    /// # Panics
    /// If `stride` is smaller than `width * 4`.
    pub fn with_stride(width: u32, height: u32, stride: usize) -> Self {
        assert!(
            stride >= width as usize * BYTES_PER_PIXEL,
            "stride {stride} too small for width {width}"
        );
        Self {
            width,
            height,
            stride,
            data: vec![0; stride * height as usize],
        }
    }

    /// A buffer where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgb<u8>) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(color);
        buffer
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Placement of this buffer in its own frame: always anchored at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    /// The `width * 4` meaningful bytes of row `y`.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = self.row_start(y);
        &self.data[start..start + self.width as usize * BYTES_PER_PIXEL]
    }

    /// Mutable view of the `width * 4` meaningful bytes of row `y`.
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = self.row_start(y);
        let len = self.width as usize * BYTES_PER_PIXEL;
        &mut self.data[start..start + len]
    }

    fn row_start(&self, y: u32) -> usize {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        y as usize * self.stride
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb<u8> {
        assert!(x < self.width, "column {x} out of bounds (width {})", self.width);
        let px = &self.row(y)[x as usize * BYTES_PER_PIXEL..];
        Rgb([px[0], px[1], px[2]])
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb<u8>) {
        assert!(x < self.width, "column {x} out of bounds (width {})", self.width);
        let offset = x as usize * BYTES_PER_PIXEL;
        self.row_mut(y)[offset..offset + 3].copy_from_slice(&color.0);
    }

    pub fn fill(&mut self, color: Rgb<u8>) {
        for y in 0..self.height {
            for px in self.row_mut(y).chunks_exact_mut(BYTES_PER_PIXEL) {
                px[..3].copy_from_slice(&color.0);
            }
        }
    }

    /// Copy all of `src` into this buffer with its top-left corner at `(x, y)`.
    ///
    /// # Panics
    /// If `src` does not fit entirely inside this buffer at that offset.
    pub fn blit(&mut self, src: &PixelBuffer, x: u32, y: u32) {
        assert!(
            x + src.width <= self.width && y + src.height <= self.height,
            "{}x{} source at ({x},{y}) overflows {}x{} target",
            src.width,
            src.height,
            self.width,
            self.height
        );
        let start = x as usize * BYTES_PER_PIXEL;
        let len = src.width as usize * BYTES_PER_PIXEL;
        for row in 0..src.height {
            self.row_mut(y + row)[start..start + len].copy_from_slice(src.row(row));
        }
    }

    /// Convert an `image` crate raster, dropping nothing but the layout.
    pub fn from_rgb_image(image: &RgbImage) -> Self {
        let mut buffer = Self::new(image.width(), image.height());
        for (x, y, px) in image.enumerate_pixels() {
            buffer.set_pixel(x, y, *px);
        }
        buffer
    }

    /// Convert to an `image` crate raster (used for embedding into PDFs).
    pub fn to_rgb_image(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| self.pixel(x, y))
    }
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("stride", &self.stride)
            .finish_non_exhaustive()
    }
}
