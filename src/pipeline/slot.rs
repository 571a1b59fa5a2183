//! One side of a page pair, which may be missing.

/// A page, or a raster of one, from one of the two documents.
///
/// When the documents have different page counts, the shorter one has no
/// page at the trailing indices. That side is [`PageSlot::Absent`], and the
/// differ treats it as an empty raster, so the whole page counts as changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSlot<T> {
    Present(T),
    Absent,
}

impl<T> PageSlot<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, PageSlot::Present(_))
    }

    pub fn as_ref(&self) -> PageSlot<&T> {
        match self {
            PageSlot::Present(v) => PageSlot::Present(v),
            PageSlot::Absent => PageSlot::Absent,
        }
    }

    /// Convert the present value with a fallible function such as rasterisation.
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<PageSlot<U>, E> {
        match self {
            PageSlot::Present(v) => f(v).map(PageSlot::Present),
            PageSlot::Absent => Ok(PageSlot::Absent),
        }
    }

    pub fn present(self) -> Option<T> {
        match self {
            PageSlot::Present(v) => Some(v),
            PageSlot::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for PageSlot<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(PageSlot::Absent, PageSlot::Present)
    }
}
