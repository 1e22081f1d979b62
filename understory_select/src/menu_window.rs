// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Windowed rendering model for the menu list.
//!
//! A thin layer over [`VirtualList`] with a [`FixedExtentModel`]: menu items
//! share one height, overscan is counted in items, and every change keeps the
//! scroll offset inside the content. The controller keeps the window's item
//! count and height in sync with the menu; hosts render
//! [`MenuWindow::visible_range`] and mirror [`MenuWindow::scroll_offset`] onto
//! their list.

use core::ops::Range;

use understory_virtual_list::{
    ExtentModel, FixedExtentModel, ScrollAlign, VirtualList, compute_visible_strip,
};

/// Range of items to realize, with the extents of the unrendered gaps.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleRange {
    /// Indices to render, overscan included.
    pub items: Range<usize>,
    /// Height of the items before `items.start`.
    pub before_height: f64,
    /// Height of the items after `items.end`.
    pub after_height: f64,
}

/// Scroll state of a fixed-item-height list.
#[derive(Clone, Debug)]
pub struct MenuWindow {
    list: VirtualList<FixedExtentModel<f64>>,
    overscan_count: usize,
    last_scrolled_index: Option<usize>,
}

impl MenuWindow {
    /// Creates an empty window with the given item height and overscan.
    ///
    /// A non-finite or negative item size is treated as zero.
    #[must_use]
    pub fn new(item_size: f64, overscan_count: usize) -> Self {
        let model = FixedExtentModel::new(0, sanitize(item_size));
        let mut window = Self {
            list: VirtualList::new(model, 0.0, 0.0),
            overscan_count,
            last_scrolled_index: None,
        };
        window.sync_overscan();
        window
    }

    /// Number of items in the list.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.list.model().len()
    }

    /// Sets the number of items, clamping the scroll offset.
    pub fn set_item_count(&mut self, count: usize) {
        self.list.model_mut().set_len(count);
        self.list.clamp_scroll_to_content();
    }

    /// Height of one item.
    #[must_use]
    pub fn item_size(&self) -> f64 {
        self.list.model().extent()
    }

    /// Sets the height of one item, clamping the scroll offset.
    pub fn set_item_size(&mut self, item_size: f64) {
        self.list.model_mut().set_extent(sanitize(item_size));
        self.sync_overscan();
        self.list.clamp_scroll_to_content();
    }

    /// Items rendered beyond each edge of the viewport.
    #[must_use]
    pub fn overscan_count(&self) -> usize {
        self.overscan_count
    }

    /// Sets the overscan count.
    pub fn set_overscan_count(&mut self, overscan_count: usize) {
        self.overscan_count = overscan_count;
        self.sync_overscan();
    }

    /// Height of the list viewport.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.list.viewport_extent()
    }

    /// Sets the viewport height, clamping the scroll offset.
    pub fn set_height(&mut self, height: f64) {
        self.list.set_viewport_extent(sanitize(height));
        self.list.clamp_scroll_to_content();
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_offset(&self) -> f64 {
        self.list.scroll_offset()
    }

    /// Sets the scroll offset, clamped to the scrollable range.
    ///
    /// Hosts call this when the user scrolls the list directly.
    pub fn set_scroll_offset(&mut self, offset: f64) {
        self.list
            .set_scroll_offset(if offset.is_finite() { offset } else { 0.0 });
        self.list.clamp_scroll_to_content();
    }

    /// Total height of all items.
    #[must_use]
    pub fn content_height(&self) -> f64 {
        let mut model = *self.list.model();
        model.total_extent()
    }

    /// Largest valid scroll offset.
    #[must_use]
    pub fn max_scroll_offset(&self) -> f64 {
        (self.content_height() - self.height()).max(0.0)
    }

    /// The index most recently passed to [`MenuWindow::scroll_to_index`].
    #[must_use]
    pub fn last_scrolled_index(&self) -> Option<usize> {
        self.last_scrolled_index
    }

    /// Scrolls the minimum distance needed to bring `index` fully into view.
    ///
    /// An item that is already fully visible does not move the list. Indices
    /// past the end are clamped to the last item.
    pub fn scroll_to_index(&mut self, index: usize) {
        self.last_scrolled_index = Some(index);
        self.list.scroll_to_index(index, ScrollAlign::Nearest);
        self.list.clamp_scroll_to_content();
    }

    /// Items that intersect the viewport, widened by the overscan count.
    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        let mut model = *self.list.model();
        let strip = compute_visible_strip(
            &mut model,
            self.list.scroll_offset(),
            self.list.viewport_extent(),
            self.list.overscan_before(),
            self.list.overscan_after(),
        );
        VisibleRange {
            items: strip.start..strip.end,
            before_height: strip.before_extent,
            after_height: strip.after_extent,
        }
    }

    fn sync_overscan(&mut self) {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Overscan counts are small"
        )]
        let extent = self.overscan_count as f64 * self.item_size();
        self.list.set_overscan(extent, extent);
    }
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(count: usize, height: f64) -> MenuWindow {
        let mut w = MenuWindow::new(35.0, 1);
        w.set_item_count(count);
        w.set_height(height);
        w
    }

    #[test]
    fn content_height_is_count_times_size() {
        let w = window(10, 300.0);
        assert_eq!(w.content_height(), 350.0);
        assert_eq!(w.max_scroll_offset(), 50.0);
    }

    #[test]
    fn scroll_to_index_moves_minimally() {
        let mut w = window(20, 105.0);
        // Already visible: no movement.
        w.scroll_to_index(2);
        assert_eq!(w.scroll_offset(), 0.0);
        // Below the viewport: align the item's bottom edge.
        w.scroll_to_index(5);
        assert_eq!(w.scroll_offset(), 6.0 * 35.0 - 105.0);
        // Above the viewport: align the item's top edge.
        w.scroll_to_index(1);
        assert_eq!(w.scroll_offset(), 35.0);
        // Past the end clamps to the last item.
        w.scroll_to_index(99);
        assert_eq!(w.scroll_offset(), w.max_scroll_offset());
        assert_eq!(w.last_scrolled_index(), Some(99));
    }

    #[test]
    fn visible_range_includes_overscan() {
        let mut w = window(20, 105.0);
        let range = w.visible_range();
        assert_eq!(range.items, 0..4);
        assert_eq!(range.before_height, 0.0);
        assert_eq!(range.after_height, 16.0 * 35.0);

        w.set_scroll_offset(70.0);
        let range = w.visible_range();
        assert_eq!(range.items, 1..6);
        assert_eq!(range.before_height, 35.0);
    }

    #[test]
    fn shrinking_the_list_clamps_the_offset() {
        let mut w = window(20, 105.0);
        w.set_scroll_offset(400.0);
        assert_eq!(w.scroll_offset(), 400.0);
        w.set_item_count(5);
        assert_eq!(w.scroll_offset(), 70.0);
        w.set_item_count(0);
        assert_eq!(w.scroll_offset(), 0.0);
        assert_eq!(w.visible_range().items, 0..0);
    }
}
