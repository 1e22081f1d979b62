// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Uniform-extent model.

use crate::{ExtentModel, Scalar};

/// An [`ExtentModel`] whose items all share one extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedExtentModel<S: Scalar> {
    len: usize,
    extent: S,
}

impl<S: Scalar> FixedExtentModel<S> {
    /// Creates a model with `len` items of `extent` each.
    ///
    /// Negative extents are clamped to zero.
    #[must_use]
    pub fn new(len: usize, extent: S) -> Self {
        Self {
            len,
            extent: non_negative(extent),
        }
    }

    /// Sets the number of items.
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
    }

    /// Sets the extent shared by all items. Negative extents are clamped to zero.
    pub fn set_extent(&mut self, extent: S) {
        debug_assert!(
            extent.is_finite(),
            "FixedExtentModel extents must be finite; got {extent:?}"
        );
        self.extent = non_negative(extent);
    }

    /// The extent shared by all items.
    #[must_use]
    pub const fn extent(&self) -> S {
        self.extent
    }
}

fn non_negative<S: Scalar>(extent: S) -> S {
    if extent.is_sign_negative() {
        S::zero()
    } else {
        extent
    }
}

impl<S: Scalar> ExtentModel for FixedExtentModel<S> {
    type Scalar = S;

    fn len(&self) -> usize {
        self.len
    }

    fn total_extent(&mut self) -> S {
        self.extent * S::from_usize(self.len)
    }

    fn extent_of(&mut self, _index: usize) -> S {
        self.extent
    }

    fn offset_of(&mut self, index: usize) -> S {
        S::from_usize(index) * self.extent
    }

    fn index_at_offset(&mut self, offset: S) -> usize {
        if self.len == 0 || self.extent <= S::zero() {
            return 0;
        }
        let last = isize::try_from(self.len - 1).unwrap_or(isize::MAX);
        let i = (offset / self.extent).floor_to_isize().clamp(0, last);
        usize::try_from(i).unwrap_or(0)
    }
}
