//! Region alignment: a common coordinate frame for two rasters.
//!
//! Pages of the two documents may rasterise to different sizes (A4 against
//! Letter, a landscape page against a portrait one, or a page that exists on
//! one side only). The diff canvas is the union of both placements, and each
//! raster is re-expressed as an offset inside it so neither gets clipped.

/// An integer rectangle in a shared pixel frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// The placement of an absent raster.
    pub const EMPTY: Rect = Rect::new(0, 0, 0, 0);

    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

/// Two rectangles placed inside their union, which starts at (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alignment {
    pub union: Rect,
    pub first: Rect,
    pub second: Rect,
}

impl Alignment {
    /// True when both rectangles cover exactly the same area of the union.
    pub fn coincide(&self) -> bool {
        self.first == self.second
    }
}

/// Compute the union of `first` and `second` and express both relative to it.
pub fn align(first: Rect, second: Rect) -> Alignment {
    let left = first.x.min(second.x);
    let top = first.y.min(second.y);
    let right = first.right().max(second.right());
    let bottom = first.bottom().max(second.bottom());

    let shift = |r: Rect| Rect::new(r.x - left, r.y - top, r.width, r.height);

    Alignment {
        union: Rect::new(0, 0, right - left, bottom - top),
        first: shift(first),
        second: shift(second),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_rects_coincide() {
        let r = Rect::new(0, 0, 100, 50);
        let a = align(r, r);
        assert_eq!(a.union, r);
        assert!(a.coincide());
    }

    #[test]
    fn union_covers_both_extents() {
        let a = align(Rect::new(0, 0, 100, 40), Rect::new(0, 0, 60, 80));
        assert_eq!(a.union, Rect::new(0, 0, 100, 80));
        assert_eq!(a.first, Rect::new(0, 0, 100, 40));
        assert_eq!(a.second, Rect::new(0, 0, 60, 80));
        assert!(!a.coincide());
    }

    #[test]
    fn absent_side_degenerates_to_present_rect() {
        let present = Rect::new(0, 0, 30, 20);
        let a = align(Rect::EMPTY, present);
        assert_eq!(a.union, present);
        assert!(!a.coincide());
    }

    #[test]
    fn negative_origin_is_normalized() {
        let a = align(Rect::new(-5, -2, 10, 10), Rect::new(0, 0, 10, 10));
        assert_eq!(a.union, Rect::new(0, 0, 15, 12));
        assert_eq!(a.first, Rect::new(0, 0, 10, 10));
        assert_eq!(a.second, Rect::new(5, 2, 10, 10));
    }
}
