//! Page geometry: page count and current page index.
//!
//! The layout needs only two scalars, the rendered content's extent and the
//! viewport's extent, and is independent of how the content was produced.

/// Page count and current page, with the bounds invariant maintained on
/// every mutation: `page_count >= 1` and `0 <= current < page_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    count: usize,
    current: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl PageLayout {
    /// A single empty page, cursor at the start.
    pub const fn new() -> Self {
        Self { count: 1, current: 0 }
    }

    /// Total number of pages.
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Current page index.
    pub const fn current(&self) -> usize {
        self.current
    }

    /// Recompute the page count from the content and viewport extents,
    /// re-clamping the current page into the new bound.
    ///
    /// A non-positive viewport (hidden or zero-size surface) skips the
    /// recomputation entirely and retains the stale count; it must never
    /// produce zero or infinite pages. Returns `true` if the count or the
    /// current page changed.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn recompute(&mut self, content_extent: f64, viewport_extent: f64) -> bool {
        if viewport_extent <= 0.0 {
            return false;
        }
        let pages = (content_extent.max(0.0) / viewport_extent).ceil() as usize;
        let count = pages.max(1);
        let current = self.current.min(count - 1);

        let changed = count != self.count || current != self.current;
        self.count = count;
        self.current = current;
        changed
    }

    /// Move to the last page (used to follow a live stream in paged mode).
    pub fn pin_to_last(&mut self) -> bool {
        let last = self.count - 1;
        let moved = self.current != last;
        self.current = last;
        moved
    }

    /// Go to page `n`, clamped into bounds. Returns `true` if the page
    /// changed.
    pub fn go_to(&mut self, n: usize) -> bool {
        let target = n.min(self.count - 1);
        let moved = target != self.current;
        self.current = target;
        moved
    }

    /// Step back one page, clamped at the first.
    pub fn previous(&mut self) -> bool {
        self.go_to(self.current.saturating_sub(1))
    }

    /// Step forward one page, clamped at the last.
    pub fn next(&mut self) -> bool {
        self.go_to(self.current + 1)
    }

    /// Scroll offset of the current page's top edge.
    #[allow(clippy::cast_precision_loss)]
    pub fn page_offset(&self, viewport_extent: f64) -> f64 {
        self.current as f64 * viewport_extent
    }

    /// Scroll offset of the last page's top edge.
    #[allow(clippy::cast_precision_loss)]
    pub fn page_offset_bound(&self, viewport_extent: f64) -> f64 {
        (self.count - 1) as f64 * viewport_extent
    }

    /// Reset to a single empty page (new document).
    pub const fn reset(&mut self) {
        self.count = 1;
        self.current = 0;
    }
}
