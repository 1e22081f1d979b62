// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Virtual List: core 1D virtualization primitives.
//!
//! A small, renderer-agnostic core for virtualizing a dense strip of items
//! indexed `0..len`:
//!
//! - [`Scalar`]: `f32`/`f64` extents, offsets, and scroll positions.
//! - [`ExtentModel`]: per-item extents with offset and index lookups;
//!   [`FixedExtentModel`] covers the uniform case.
//! - [`compute_visible_strip`]: which indices to realize for a scroll offset,
//!   viewport, and overscan, plus the padding before and after them.
//! - [`VirtualList`]: scroll state over a model, a cached [`VisibleStrip`],
//!   clamping, and index-aligned scrolling via [`ScrollAlign`].
//!
//! Hosts own the items and their views. They render `start..end` of the
//! visible strip with `before_extent` and `after_extent` worth of spacer.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_virtual_list::{FixedExtentModel, ScrollAlign, VirtualList};
//!
//! // 50 menu rows, 35px each, in a 300px viewport with one row of overscan.
//! let mut list = VirtualList::new(FixedExtentModel::new(50, 35.0), 300.0, 35.0);
//!
//! // Keyboard focus moved to row 12: scroll just far enough to show it.
//! list.scroll_to_index(12, ScrollAlign::Nearest);
//! assert_eq!(list.scroll_offset(), 13.0 * 35.0 - 300.0);
//!
//! let strip = list.visible_strip();
//! assert!(strip.start <= 12 && 12 < strip.end);
//! assert_eq!(strip.content_extent, 50.0 * 35.0);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

#[cfg(test)]
extern crate alloc;

mod fixed;
mod model;
mod scalar;
mod virtual_list;

pub use fixed::FixedExtentModel;
pub use model::{ExtentModel, VisibleStrip, compute_visible_strip};
pub use scalar::Scalar;
pub use virtual_list::{ScrollAlign, VirtualList};
