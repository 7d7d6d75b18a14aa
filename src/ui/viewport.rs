//! Scroll window over the rendered note.
//!
//! The [`Viewport`] tracks which rendered rows are on screen. Editing moves
//! the caret, so the usual way to scroll is [`Viewport::follow`], which keeps
//! the caret row inside the window; paging is there for PageUp/PageDown.

use std::ops::Range;

/// The visible slice of the rendered rows.
///
/// # Example
///
/// ```
/// use livemark::ui::viewport::Viewport;
///
/// let mut vp = Viewport::new(10, 40);
/// vp.follow(15);
/// assert_eq!(vp.visible_range(), 6..16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(height: u16, total_lines: usize) -> Self {
        Self {
            height,
            offset: 0,
            total_lines,
        }
    }

    /// First rendered row on screen.
    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    pub const fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Rows on screen, clamped to the rendered length.
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Scroll position as a percentage (0-100).
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        let percent = (self.offset.min(max_offset) * 100) / max_offset;
        u8::try_from(percent).unwrap_or(100)
    }

    pub const fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = (self.offset + n).min(self.max_offset());
    }

    pub const fn page_up(&mut self) {
        self.scroll_up(self.height as usize);
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.height as usize);
    }

    /// Scroll the least amount that puts `row` on screen.
    pub fn follow(&mut self, row: usize) {
        let height = self.height.max(1) as usize;
        if row < self.offset {
            self.offset = row;
        } else if row >= self.offset + height {
            self.offset = row + 1 - height;
        }
    }

    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Update the rendered length after an edit.
    pub fn set_total_lines(&mut self, total: usize) {
        self.total_lines = total;
        self.offset = self.offset.min(self.max_offset());
    }

    const fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_viewport_starts_at_top() {
        let vp = Viewport::new(24, 100);
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_range(), 0..24);
    }

    #[test]
    fn test_visible_range_with_short_document() {
        let vp = Viewport::new(24, 10);
        assert_eq!(vp.visible_range(), 0..10);
    }

    #[test]
    fn test_scroll_clamps_both_ends() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(1000);
        assert_eq!(vp.offset(), 76);
        vp.scroll_up(1000);
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_paging() {
        let mut vp = Viewport::new(24, 100);
        vp.page_down();
        assert_eq!(vp.offset(), 24);
        vp.scroll_down(26);
        vp.page_up();
        assert_eq!(vp.offset(), 26);
    }

    #[test]
    fn test_follow_scrolls_down_to_caret() {
        let mut vp = Viewport::new(10, 100);
        vp.follow(25);
        assert_eq!(vp.offset(), 16);
        assert!(vp.visible_range().contains(&25));
    }

    #[test]
    fn test_follow_scrolls_up_to_caret() {
        let mut vp = Viewport::new(10, 100);
        vp.scroll_down(50);
        vp.follow(3);
        assert_eq!(vp.offset(), 3);
    }

    #[test]
    fn test_follow_is_noop_when_visible() {
        let mut vp = Viewport::new(10, 100);
        vp.scroll_down(5);
        vp.follow(9);
        assert_eq!(vp.offset(), 5);
    }

    #[test]
    fn test_set_total_lines_adjusts_offset() {
        let mut vp = Viewport::new(24, 100);
        vp.scroll_down(70);
        vp.set_total_lines(30);
        assert_eq!(vp.offset(), 6);
    }

    #[test]
    fn test_scroll_percent() {
        let mut vp = Viewport::new(24, 100);
        assert_eq!(vp.scroll_percent(), 0);
        vp.scroll_down(1000);
        assert_eq!(vp.scroll_percent(), 100);
        assert_eq!(Viewport::new(24, 10).scroll_percent(), 100);
    }
}
