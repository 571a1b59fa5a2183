//! Pixel differ: overlay two page rasters and flag where they disagree.
//!
//! ## Visualisation
//!
//! The composite keeps the red and green channels of the first raster and
//! takes the blue channel from the second. Where the pages agree, the result
//! looks like the first page. Where they disagree, the colour shifts towards
//! blue (ink removed) or yellow (ink added), which is easy to spot on a
//! white page. In grayscale mode both pixels become luminance values, so
//! unchanged regions turn neutral gray and only changes keep a colour cast.
//!
//! ## Algorithm
//!
//! ```text
//! align ──▶ background ──▶ copy first ──▶ compare + composite second ──▶ mark rows
//! ```
//!
//! The first raster is copied verbatim. Each pixel of the second raster is
//! then compared against what is already in the canvas: the first raster's
//! pixel, or white background where the first raster does not reach. A
//! difference anywhere makes the page "changed". A size mismatch also makes
//! it changed, even if the overlapping area matches.

use super::align::{align, Rect};
use super::buffer::{PixelBuffer, BLUE, BYTES_PER_PIXEL, RED, WHITE};
use super::slot::PageSlot;
use crate::config::{CompareConfig, MARK_WIDTH};
use image::Rgb;
use tracing::debug;

/// Outcome of diffing one raster pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult {
    /// The composite image; `None` when the rasters are equal under tolerance.
    pub diff: Option<PixelBuffer>,
    /// True when any pixel differs or the raster sizes differ.
    pub changed: bool,
    /// White thumbnail with one red dot per differing pixel, when requested.
    pub thumbnail: Option<PixelBuffer>,
}

/// Rec. 709 luma, truncated.
pub fn luminance(px: Rgb<u8>) -> u8 {
    (0.2126 * f64::from(px[0]) + 0.7152 * f64::from(px[1]) + 0.0722 * f64::from(px[2])) as u8
}

/// True when every channel of `a` lies within `tolerance` of the same channel of `b`.
pub fn within_tolerance(a: Rgb<u8>, b: Rgb<u8>, tolerance: u8) -> bool {
    a.0.iter()
        .zip(b.0.iter())
        .all(|(&ca, &cb)| ca.abs_diff(cb) <= tolerance)
}

fn composite(before: Rgb<u8>, after: Rgb<u8>, grayscale: bool) -> Rgb<u8> {
    if grayscale {
        let lum_before = u16::from(luminance(before));
        let lum_after = u16::from(luminance(after));
        Rgb([
            lum_after as u8,
            ((lum_before + lum_after) / 2) as u8,
            lum_before as u8,
        ])
    } else {
        Rgb([before[0], before[1], after[2]])
    }
}

struct Thumbnail {
    buffer: PixelBuffer,
    scale: f32,
}

impl Thumbnail {
    fn new(width: u32, union: &Rect) -> Option<Self> {
        if width == 0 || union.width <= 0 {
            return None;
        }
        let scale = width as f32 / union.width as f32;
        let height = ((union.height as f32 * scale).round() as u32).max(1);
        Some(Self {
            buffer: PixelBuffer::filled(width, height, WHITE),
            scale,
        })
    }

    fn mark(&mut self, x: u32, y: u32) {
        // Rounding can push the last row/column one past the edge.
        let tx = ((x as f32 * self.scale) as u32).min(self.buffer.width() - 1);
        let ty = ((y as f32 * self.scale) as u32).min(self.buffer.height() - 1);
        self.buffer.set_pixel(tx, ty, RED);
    }
}

fn placement(slot: &PageSlot<&PixelBuffer>) -> Rect {
    match slot {
        PageSlot::Present(buffer) => buffer.rect(),
        PageSlot::Absent => Rect::EMPTY,
    }
}

/// Diff two rasters, either of which may be absent.
///
/// Tolerance, grayscale compositing and row marking come from `config`.
/// `thumbnail_width` requests a scaled-down overview of where the
/// differences are. It is built even when nothing differs.
pub fn diff_images(
    first: PageSlot<&PixelBuffer>,
    second: PageSlot<&PixelBuffer>,
    config: &CompareConfig,
    thumbnail_width: Option<u32>,
) -> DiffResult {
    debug_assert!(
        first.is_present() || second.is_present(),
        "diff_images needs at least one raster"
    );

    let alignment = align(placement(&first), placement(&second));
    let union = alignment.union;

    let mut diff = PixelBuffer::new(union.width as u32, union.height as u32);
    let mut thumbnail = thumbnail_width.and_then(|w| Thumbnail::new(w, &union));
    let mut changed = false;

    if !alignment.coincide() {
        changed = true;
        diff.fill(WHITE);
    }

    if let PageSlot::Present(before) = first {
        diff.blit(before, alignment.first.x as u32, alignment.first.y as u32);
    }

    let mut rows_differ = 0usize;
    if let PageSlot::Present(after) = second {
        let (ox, oy) = (alignment.second.x as u32, alignment.second.y as u32);
        let span = ox as usize * BYTES_PER_PIXEL..(ox + after.width()) as usize * BYTES_PER_PIXEL;
        let mark_width = MARK_WIDTH.min(after.width()) as usize;

        for y in 0..after.height() {
            let out = &mut diff.row_mut(oy + y)[span.clone()];
            let mut row_differs = false;

            for (x, (dst, src)) in out
                .chunks_exact_mut(BYTES_PER_PIXEL)
                .zip(after.row(y).chunks_exact(BYTES_PER_PIXEL))
                .enumerate()
            {
                let before_px = Rgb([dst[0], dst[1], dst[2]]);
                let after_px = Rgb([src[0], src[1], src[2]]);

                if !within_tolerance(before_px, after_px, config.channel_tolerance) {
                    changed = true;
                    row_differs = true;
                    if let Some(thumb) = thumbnail.as_mut() {
                        thumb.mark(ox + x as u32, oy + y);
                    }
                }

                dst[..3].copy_from_slice(&composite(before_px, after_px, config.grayscale).0);
            }

            if row_differs {
                rows_differ += 1;
                if config.mark_differences {
                    for dst in out.chunks_exact_mut(BYTES_PER_PIXEL).take(mark_width) {
                        dst[..3].copy_from_slice(&BLUE.0);
                    }
                }
            }
        }
    }

    debug!(
        width = union.width,
        height = union.height,
        size_mismatch = !alignment.coincide(),
        rows_differ,
        changed,
        "Diffed rasters"
    );

    DiffResult {
        diff: changed.then_some(diff),
        changed,
        thumbnail: thumbnail.map(|t| t.buffer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> CompareConfig {
        CompareConfig::default()
    }

    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut b = PixelBuffer::new(width, height);
        for y in 0..height {
            for x in 0..width {
                b.set_pixel(x, y, Rgb([(x * 10) as u8, (y * 10) as u8, 100]));
            }
        }
        b
    }

    fn run(a: &PixelBuffer, b: &PixelBuffer, config: &CompareConfig) -> DiffResult {
        diff_images(PageSlot::Present(a), PageSlot::Present(b), config, None)
    }

    #[test]
    fn identical_rasters_report_no_change() {
        let a = gradient(6, 4);
        let result = run(&a, &a.clone(), &config());
        assert!(!result.changed);
        assert!(result.diff.is_none());
    }

    #[test]
    fn single_pixel_change_composites_blue_from_second() {
        let a = gradient(5, 5);
        let mut b = a.clone();
        b.set_pixel(2, 3, Rgb([200, 200, 200]));

        let result = run(&a, &b, &config());
        assert!(result.changed);
        let diff = result.diff.expect("composite expected");

        // Changed pixel: R,G from the first raster, B from the second.
        let before = a.pixel(2, 3);
        assert_eq!(diff.pixel(2, 3), Rgb([before[0], before[1], 200]));

        // Untouched pixels reproduce the first raster.
        for (x, y) in [(0, 0), (4, 4), (1, 3)] {
            let px = a.pixel(x, y);
            assert_eq!(diff.pixel(x, y), Rgb([px[0], px[1], b.pixel(x, y)[2]]));
        }
    }

    #[test]
    fn tolerance_is_symmetric_and_inclusive() {
        assert!(within_tolerance(Rgb([10, 10, 10]), Rgb([15, 5, 10]), 5));
        assert!(!within_tolerance(Rgb([10, 10, 10]), Rgb([16, 10, 10]), 5));
        assert!(!within_tolerance(Rgb([10, 10, 10]), Rgb([10, 4, 10]), 5));
        assert!(within_tolerance(Rgb([0, 0, 0]), Rgb([255, 255, 255]), 255));
    }

    #[test]
    fn raising_tolerance_never_introduces_changes() {
        let a = gradient(4, 4);
        let mut b = a.clone();
        b.set_pixel(1, 1, Rgb([a.pixel(1, 1)[0] + 7, a.pixel(1, 1)[1], 90]));

        let mut seen_unchanged = false;
        for tol in 0..=255u8 {
            let c = CompareConfig::builder().channel_tolerance(tol).build().unwrap();
            let changed = run(&a, &b, &c).changed;
            if seen_unchanged {
                assert!(!changed, "tolerance {tol} reintroduced a change");
            }
            seen_unchanged |= !changed;
        }
        assert!(seen_unchanged);
    }

    #[test]
    fn size_mismatch_always_changes() {
        let a = PixelBuffer::filled(4, 4, WHITE);
        let b = PixelBuffer::filled(5, 4, WHITE);
        let c = CompareConfig::builder().channel_tolerance(255).build().unwrap();

        let result = run(&a, &b, &c);
        assert!(result.changed);
        let diff = result.diff.unwrap();
        assert_eq!((diff.width(), diff.height()), (5, 4));
        assert_eq!(diff.pixel(4, 3), WHITE);
    }

    #[test]
    fn absent_first_shows_background_with_second_blue() {
        let b = gradient(3, 2);
        let result = diff_images(PageSlot::Absent, PageSlot::Present(&b), &config(), None);
        assert!(result.changed);
        let diff = result.diff.unwrap();
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(diff.pixel(x, y), Rgb([255, 255, b.pixel(x, y)[2]]));
            }
        }
    }

    #[test]
    fn absent_second_keeps_first_verbatim() {
        let a = gradient(3, 3);
        let result = diff_images(PageSlot::Present(&a), PageSlot::Absent, &config(), None);
        assert!(result.changed);
        assert_eq!(result.diff.unwrap(), a);
    }

    #[test]
    fn marking_paints_left_margin_of_differing_rows() {
        let a = PixelBuffer::filled(20, 3, WHITE);
        let mut b = a.clone();
        b.set_pixel(15, 1, Rgb([0, 0, 0]));
        let c = CompareConfig::builder().mark_differences(true).build().unwrap();

        let diff = run(&a, &b, &c).diff.unwrap();
        for x in 0..10 {
            assert_eq!(diff.pixel(x, 1), BLUE);
        }
        assert_eq!(diff.pixel(10, 1), WHITE);
        assert_eq!(diff.pixel(15, 1), Rgb([255, 255, 0]));
        assert_eq!(diff.pixel(0, 0), WHITE);
        assert_eq!(diff.pixel(0, 2), WHITE);
    }

    #[test]
    fn marking_narrow_raster_covers_whole_row() {
        let a = PixelBuffer::filled(4, 2, WHITE);
        let mut b = a.clone();
        b.set_pixel(3, 0, RED);
        let c = CompareConfig::builder().mark_differences(true).build().unwrap();

        let diff = run(&a, &b, &c).diff.unwrap();
        for x in 0..4 {
            assert_eq!(diff.pixel(x, 0), BLUE);
        }
    }

    #[test]
    fn grayscale_renders_unchanged_as_neutral() {
        let mut a = PixelBuffer::filled(3, 1, WHITE);
        a.set_pixel(0, 0, Rgb([30, 120, 200]));
        let mut b = a.clone();
        b.set_pixel(2, 0, Rgb([0, 0, 0]));
        let c = CompareConfig::builder().grayscale(true).build().unwrap();

        let diff = run(&a, &b, &c).diff.unwrap();
        let unchanged = diff.pixel(0, 0);
        assert_eq!(unchanged[0], unchanged[1]);
        assert_eq!(unchanged[1], unchanged[2]);
        assert_eq!(unchanged[0], luminance(Rgb([30, 120, 200])));

        let lum_white = luminance(WHITE);
        assert_eq!(diff.pixel(2, 0), Rgb([0, lum_white / 2, lum_white]));
    }

    #[test]
    fn thumbnail_marks_scaled_positions() {
        let a = PixelBuffer::filled(100, 50, WHITE);
        let mut b = a.clone();
        b.set_pixel(55, 25, RED);

        let result = diff_images(PageSlot::Present(&a), PageSlot::Present(&b), &config(), Some(10));
        let thumb = result.thumbnail.expect("thumbnail requested");
        assert_eq!((thumb.width(), thumb.height()), (10, 5));
        assert_eq!(thumb.pixel(5, 2), RED);
        assert_eq!(thumb.pixel(0, 0), WHITE);
    }

    #[test]
    fn thumbnail_clamps_to_bounds() {
        // 11 * 0.4 = 4.4 rounds to 4 rows; row 10 would scale onto row 4.
        let a = PixelBuffer::filled(10, 11, WHITE);
        let mut b = a.clone();
        b.set_pixel(9, 10, RED);

        let result = diff_images(PageSlot::Present(&a), PageSlot::Present(&b), &config(), Some(4));
        let thumb = result.thumbnail.unwrap();
        assert_eq!((thumb.width(), thumb.height()), (4, 4));
        assert_eq!(thumb.pixel(3, 3), RED);
    }

    #[test]
    fn thumbnail_is_built_without_differences() {
        let a = PixelBuffer::filled(8, 8, WHITE);
        let result = diff_images(PageSlot::Present(&a), PageSlot::Present(&a), &config(), Some(4));
        assert!(!result.changed);
        assert_eq!(result.thumbnail.unwrap(), PixelBuffer::filled(4, 4, WHITE));
    }

    #[test]
    fn red_square_is_detected_at_zero_tolerance() {
        let a = PixelBuffer::filled(100, 100, WHITE);
        let mut b = a.clone();
        for y in 5..15 {
            for x in 5..15 {
                b.set_pixel(x, y, RED);
            }
        }

        let result = run(&a, &b, &config());
        assert!(result.changed);
        let diff = result.diff.unwrap();
        assert!((5..15).any(|i| diff.pixel(i, i) != WHITE));
        assert_eq!(diff.pixel(50, 50), WHITE);
    }
}
