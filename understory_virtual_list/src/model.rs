// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Extent model trait and the visible-strip query.

use core::cmp;

use crate::Scalar;

/// Result of a visibility query over a 1D strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleStrip<S: Scalar> {
    /// First index to realize (inclusive).
    pub start: usize,
    /// One past the last index to realize.
    pub end: usize,

    /// Total extent of items before `start`.
    pub before_extent: S,
    /// Total extent of items after `end`.
    pub after_extent: S,
    /// Total extent of all items `0..len`.
    pub content_extent: S,
}

impl<S: Scalar> VisibleStrip<S> {
    /// A strip with nothing to realize.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            before_extent: S::zero(),
            after_extent: S::zero(),
            content_extent: S::zero(),
        }
    }

    /// Returns `true` if there are no items to realize.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A dense strip of items, indexed `0..len`, each with an extent.
///
/// Extents and offsets share the coordinate space of the scroll offset and
/// viewport extent (typically logical pixels). Queries take `&mut self` so
/// implementations may cache prefix sums.
pub trait ExtentModel {
    /// Scalar type used for extents and offsets.
    type Scalar: Scalar;

    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total extent of the strip.
    fn total_extent(&mut self) -> Self::Scalar;

    /// Extent of one item; never negative.
    fn extent_of(&mut self, index: usize) -> Self::Scalar;

    /// Offset of the start of an item from the start of the strip.
    ///
    /// `offset_of(0) == 0` when the strip is non-empty, and
    /// `offset_of(i + 1) >= offset_of(i) + extent_of(i)`.
    fn offset_of(&mut self, index: usize) -> Self::Scalar;

    /// Index of the item at or before `offset`, clamped into `0..len`.
    fn index_at_offset(&mut self, offset: Self::Scalar) -> usize;
}

/// Computes which items intersect the viewport widened by overscan.
///
/// - `scroll_offset`: start of the viewport in strip coordinates.
/// - `viewport_extent`: size of the viewport.
/// - `overscan_before` / `overscan_after`: extra distance realized on each side.
///
/// Negative inputs are treated as zero.
pub fn compute_visible_strip<M>(
    model: &mut M,
    scroll_offset: M::Scalar,
    viewport_extent: M::Scalar,
    overscan_before: M::Scalar,
    overscan_after: M::Scalar,
) -> VisibleStrip<M::Scalar>
where
    M: ExtentModel,
{
    let zero = M::Scalar::zero();
    let len = model.len();
    if len == 0 {
        return VisibleStrip::empty();
    }

    let content_extent = model.total_extent().max(zero);
    if content_extent == zero {
        // Every item collapsed.
        return VisibleStrip::empty();
    }

    let min = (scroll_offset.max(zero) - overscan_before.max(zero)).max(zero);
    let max = (scroll_offset.max(zero) + viewport_extent.max(zero) + overscan_after.max(zero))
        .min(content_extent);

    if max <= min {
        return VisibleStrip {
            start: 0,
            end: 0,
            before_extent: min,
            after_extent: (content_extent - min).max(zero),
            content_extent,
        };
    }

    let mut start = cmp::min(model.index_at_offset(min), len - 1);
    while start > 0 && model.offset_of(start) > min {
        start -= 1;
    }

    let mut end = start;
    while end < len && model.offset_of(end) < max {
        end += 1;
    }

    let end_offset = if end < len {
        model.offset_of(end)
    } else {
        content_extent
    };
    VisibleStrip {
        start,
        end,
        before_extent: model.offset_of(start),
        after_extent: (content_extent - end_offset).max(zero),
        content_extent,
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::{ExtentModel, VisibleStrip, compute_visible_strip};

    /// Uneven rows, as in a menu with group headers.
    #[derive(Clone, Debug)]
    struct Rows(Vec<f64>);

    impl ExtentModel for Rows {
        type Scalar = f64;

        fn len(&self) -> usize {
            self.0.len()
        }

        fn total_extent(&mut self) -> f64 {
            self.0.iter().sum()
        }

        fn extent_of(&mut self, index: usize) -> f64 {
            self.0.get(index).copied().unwrap_or(0.0)
        }

        fn offset_of(&mut self, index: usize) -> f64 {
            self.0.iter().take(index).sum()
        }

        fn index_at_offset(&mut self, offset: f64) -> usize {
            let mut pos = 0.0;
            for (i, extent) in self.0.iter().enumerate() {
                if pos + extent > offset {
                    return i;
                }
                pos += extent;
            }
            self.0.len().saturating_sub(1)
        }
    }

    #[test]
    fn no_rows_means_nothing_to_realize() {
        let mut rows = Rows(Vec::new());
        let strip = compute_visible_strip(&mut rows, 0.0, 300.0, 35.0, 35.0);
        assert_eq!(strip, VisibleStrip::empty());
        assert!(strip.is_empty());
    }

    #[test]
    fn strip_covers_partially_visible_rows() {
        let mut rows = Rows(Vec::from([20.0, 35.0, 35.0, 35.0]));
        let strip = compute_visible_strip(&mut rows, 30.0, 40.0, 0.0, 0.0);
        assert_eq!((strip.start, strip.end), (1, 3));
        assert_eq!(strip.before_extent, 20.0);
        assert_eq!(strip.after_extent, 35.0);
        assert_eq!(strip.content_extent, 125.0);
    }

    #[test]
    fn overscan_applies_per_side() {
        let mut rows = Rows(Vec::from([10.0; 6]));
        let strip = compute_visible_strip(&mut rows, 20.0, 20.0, 0.0, 10.0);
        assert_eq!((strip.start, strip.end), (2, 5));
        let strip = compute_visible_strip(&mut rows, 20.0, 20.0, 10.0, 0.0);
        assert_eq!((strip.start, strip.end), (1, 4));
    }
}
