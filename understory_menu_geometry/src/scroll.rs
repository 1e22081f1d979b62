// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll-into-view planning and the eased scroll animation.

use crate::MenuMeasurement;

/// Default duration of the scroll-into-view animation.
pub const DEFAULT_SCROLL_DURATION: f64 = 300.0;

/// Time advanced by each animation frame.
pub const FRAME_STEP: f64 = 5.0;

/// Cubic ease-out.
///
/// - `change`: total distance to travel.
/// - `duration`: total duration; must be positive.
/// - `start`: starting value.
/// - `elapsed`: time since the start, clamped to `duration`.
#[must_use]
pub fn ease_out_cubic(change: f64, duration: f64, start: f64, elapsed: f64) -> f64 {
    let t = elapsed.min(duration) / duration - 1.0;
    change * (t * t * t + 1.0) + start
}

/// What to do about a menu that has just opened below its control.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ScrollPlan {
    /// The menu is fully visible, or cannot be measured.
    InView,
    /// Even scrolling would not reveal the whole menu; shrink it to the given
    /// available height instead.
    Condensed(f64),
    /// The menu is clipped but scrolling into view is disabled.
    Disabled,
    /// Animate the scroll parent from `from` to `to`.
    Scroll {
        /// Current scroll offset of the scroll parent.
        from: f64,
        /// Scroll offset that brings the bottom of the menu into view.
        to: f64,
    },
}

/// Decides whether and how to scroll a freshly opened menu into view.
pub fn plan_scroll_into_view(
    measurement: Option<&MenuMeasurement>,
    scroll_into_view: bool,
) -> ScrollPlan {
    let Some(m) = measurement else {
        return ScrollPlan::InView;
    };
    let height = m.menu.height();
    if m.view_space_below() >= height {
        return ScrollPlan::InView;
    }

    let space_below = m.scroll_space_below();
    if space_below < height {
        return ScrollPlan::Condensed(space_below);
    }
    if !scroll_into_view {
        return ScrollPlan::Disabled;
    }

    let scroll_top = m.scroll_parent.scroll_top;
    ScrollPlan::Scroll {
        from: scroll_top,
        to: m.menu.y1 - m.viewport_height + scroll_top + m.margins.bottom,
    }
}

/// Identifies one scheduled animation.
///
/// Handles are issued by [`crate::MenuPositioner`]; a handle goes stale as soon as
/// the menu closes, reopens, or is unmounted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnimationHandle(pub u64);

/// One frame of a [`ScrollAnimation`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollStep {
    /// Scroll offset to apply this frame.
    pub position: f64,
    /// `true` on the final frame.
    pub finished: bool,
}

/// An eased scroll from one offset to another, advanced in fixed steps.
#[derive(Clone, Debug)]
pub struct ScrollAnimation {
    handle: AnimationHandle,
    start: f64,
    change: f64,
    duration: f64,
    elapsed: f64,
}

impl ScrollAnimation {
    /// Creates an animation from `from` to `to` over `duration`.
    ///
    /// A non-positive or non-finite duration falls back to
    /// [`DEFAULT_SCROLL_DURATION`].
    #[must_use]
    pub fn new(handle: AnimationHandle, from: f64, to: f64, duration: f64) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            DEFAULT_SCROLL_DURATION
        };
        Self {
            handle,
            start: from,
            change: to - from,
            duration,
            elapsed: 0.0,
        }
    }

    /// The handle this animation was scheduled under.
    #[must_use]
    pub const fn handle(&self) -> AnimationHandle {
        self.handle
    }

    /// Final scroll offset.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.start + self.change
    }

    /// Returns `true` once the last frame has been produced.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances by [`FRAME_STEP`] and returns the offset for this frame.
    pub fn step(&mut self) -> ScrollStep {
        self.elapsed = (self.elapsed + FRAME_STEP).min(self.duration);
        ScrollStep {
            position: ease_out_cubic(self.change, self.duration, self.start, self.elapsed),
            finished: self.is_finished(),
        }
    }
}
