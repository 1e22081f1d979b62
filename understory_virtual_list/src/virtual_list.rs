// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small controller that owns an [`ExtentModel`] and scroll state.

use crate::{ExtentModel, Scalar, VisibleStrip, compute_visible_strip};

/// Alignment mode when scrolling a specific index into view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the start of the item with the start of the viewport.
    Start,
    /// Center the item within the viewport.
    Center,
    /// Align the end of the item with the end of the viewport.
    End,
    /// Move just enough to make the item fully visible.
    Nearest,
}

/// Scroll offset, viewport extent, and overscan over an [`ExtentModel`].
///
/// The most recent [`VisibleStrip`] is cached until scroll, viewport, overscan,
/// or the model change.
#[derive(Debug, Clone)]
pub struct VirtualList<M: ExtentModel> {
    model: M,
    scroll_offset: M::Scalar,
    viewport_extent: M::Scalar,
    overscan_before: M::Scalar,
    overscan_after: M::Scalar,

    dirty: bool,
    last_strip: VisibleStrip<M::Scalar>,
}

impl<M: ExtentModel> VirtualList<M> {
    /// Creates a list over `model` with a viewport extent and symmetric overscan.
    #[must_use]
    pub fn new(model: M, viewport_extent: M::Scalar, overscan: M::Scalar) -> Self {
        let zero = M::Scalar::zero();
        Self {
            model,
            scroll_offset: zero,
            viewport_extent: viewport_extent.max(zero),
            overscan_before: overscan.max(zero),
            overscan_after: overscan.max(zero),
            dirty: true,
            last_strip: VisibleStrip::empty(),
        }
    }

    /// The underlying model.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Mutable access to the model; invalidates the cached strip.
    pub fn model_mut(&mut self) -> &mut M {
        self.dirty = true;
        &mut self.model
    }

    /// Current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> M::Scalar {
        self.scroll_offset
    }

    /// Sets the scroll offset. Negative values (and NaN) become zero.
    pub fn set_scroll_offset(&mut self, offset: M::Scalar) {
        let offset = offset.max(M::Scalar::zero());
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            self.dirty = true;
        }
    }

    /// Current viewport extent.
    #[must_use]
    pub const fn viewport_extent(&self) -> M::Scalar {
        self.viewport_extent
    }

    /// Sets the viewport extent.
    pub fn set_viewport_extent(&mut self, extent: M::Scalar) {
        let extent = extent.max(M::Scalar::zero());
        if extent != self.viewport_extent {
            self.viewport_extent = extent;
            self.dirty = true;
        }
    }

    /// Sets the overscan distances before and after the viewport.
    pub fn set_overscan(&mut self, overscan_before: M::Scalar, overscan_after: M::Scalar) {
        let before = overscan_before.max(M::Scalar::zero());
        let after = overscan_after.max(M::Scalar::zero());
        if before != self.overscan_before || after != self.overscan_after {
            self.overscan_before = before;
            self.overscan_after = after;
            self.dirty = true;
        }
    }

    /// Overscan distance before the viewport.
    #[must_use]
    pub const fn overscan_before(&self) -> M::Scalar {
        self.overscan_before
    }

    /// Overscan distance after the viewport.
    #[must_use]
    pub const fn overscan_after(&self) -> M::Scalar {
        self.overscan_after
    }

    /// Computes or returns the cached visible strip.
    #[must_use]
    pub fn visible_strip(&mut self) -> VisibleStrip<M::Scalar> {
        if self.dirty {
            self.last_strip = compute_visible_strip(
                &mut self.model,
                self.scroll_offset,
                self.viewport_extent,
                self.overscan_before,
                self.overscan_after,
            );
            self.dirty = false;
        }
        self.last_strip
    }

    /// Clamps the scroll offset so the viewport stays within the content.
    pub fn clamp_scroll_to_content(&mut self) {
        let content = self.model.total_extent();
        let max_offset = if content > self.viewport_extent {
            content - self.viewport_extent
        } else {
            M::Scalar::zero()
        };
        if self.scroll_offset > max_offset {
            self.set_scroll_offset(max_offset);
        }
    }

    /// Scrolls item `index` into view with the given alignment.
    ///
    /// Indices past the end are clamped to the last item; an empty model
    /// scrolls back to the start.
    pub fn scroll_to_index(&mut self, index: usize, align: ScrollAlign) {
        let zero = M::Scalar::zero();
        let len = self.model.len();
        if len == 0 {
            self.set_scroll_offset(zero);
            return;
        }
        let idx = index.min(len - 1);
        let item_start = self.model.offset_of(idx);
        let item_end = item_start + self.model.extent_of(idx);
        let viewport = self.viewport_extent;

        let new_offset = match align {
            ScrollAlign::Start => item_start,
            ScrollAlign::End => (item_end - viewport).max(zero),
            ScrollAlign::Center => {
                let two = M::Scalar::from_usize(2);
                ((item_start + item_end) / two - viewport / two).max(zero)
            }
            ScrollAlign::Nearest => {
                let current = self.scroll_offset;
                if item_start >= current && item_end <= current + viewport {
                    current
                } else if item_start < current {
                    item_start
                } else {
                    (item_end - viewport).max(zero)
                }
            }
        };
        self.set_scroll_offset(new_offset);
    }
}
