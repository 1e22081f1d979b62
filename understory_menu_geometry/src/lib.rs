// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Menu Geometry: where a dropdown menu goes and how tall it is.
//!
//! This crate decides, for a popover menu anchored to a control:
//!
//! - **Placement**: above or below the control ([`MenuPosition`], [`menu_fits_below`]).
//! - **Height**: `min(max_height, option_count × item_size)`, possibly condensed to the
//!   space that is actually available ([`MenuPositioner::menu_height`]).
//! - **Top offset**: the additive offset that places a menu flush against the top
//!   edge of its control ([`menu_top`], [`MenuTop`]).
//! - **Scroll-into-view**: when a freshly opened menu is clipped by its scroll parent, an
//!   eased scroll of that parent ([`plan_scroll_into_view`], [`ScrollAnimation`]).
//!
//! It never touches a display tree. Hosts expose measurements through the small
//! [`MenuSurface`] query trait (bounding rects in viewport coordinates, margins, the
//! nearest scrollable ancestor) and a single command, [`MenuSurface::set_scroll_top`].
//! When nothing is measurable yet, every query degrades to a safe default: the menu is
//! assumed to fit and no animation runs.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_menu_geometry::{Margins, menu_top};
//!
//! // A 200px menu placed above a 40px control, with 4px margins on both sides.
//! let menu = Rect::new(0.0, 0.0, 300.0, 200.0);
//! let control = Rect::new(0.0, 0.0, 300.0, 40.0);
//! let top = menu_top(200.0, Some(menu), Margins::new(4.0, 4.0), Some(control));
//!
//! assert_eq!(top.offset(), -232.0);
//! assert_eq!(format!("{top}"), "calc(-240px + 8px)");
//! ```
//!
//! ## Driving the open/close state machine
//!
//! [`MenuPositioner`] owns the per-menu state: placement, the current (possibly
//! condensed) height, and at most one in-flight [`ScrollAnimation`]. Feed it open/close
//! transitions, a post-layout [`MenuPositioner::layout`] call once an opened menu has
//! been rendered, and animation frames; it reports [`PositionerEvent::Opened`] and
//! [`PositionerEvent::Closed`] exactly once per transition.
//!
//! This crate is `no_std`.

#![no_std]

mod placement;
mod positioner;
mod scroll;

pub use placement::{
    Margins, MenuMeasurement, MenuPosition, MenuSurface, MenuTop, ScrollParent, measure,
    menu_fits_below, menu_top,
};
pub use positioner::{MenuPositioner, PositionerConfig, PositionerEvent, PositionerEvents};
pub use scroll::{
    AnimationHandle, DEFAULT_SCROLL_DURATION, FRAME_STEP, ScrollAnimation, ScrollPlan, ScrollStep,
    ease_out_cubic, plan_scroll_into_view,
};
