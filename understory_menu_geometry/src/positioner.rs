// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The per-menu open/close state machine.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::{
    AnimationHandle, DEFAULT_SCROLL_DURATION, MenuPosition, MenuSurface, MenuTop,
    ScrollAnimation, ScrollPlan, measure, menu_fits_below, menu_top, plan_scroll_into_view,
};

/// Notifications produced by open/close transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PositionerEvent {
    /// The menu finished opening (including any scroll-into-view).
    Opened,
    /// The menu closed.
    Closed,
}

/// Events produced by a single call; at most two.
pub type PositionerEvents = SmallVec<[PositionerEvent; 2]>;

/// Geometry policy for a [`MenuPositioner`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionerConfig {
    /// Requested placement.
    pub position: MenuPosition,
    /// Height of a single menu item.
    pub item_size: f64,
    /// Height of the menu when nothing constrains it.
    pub max_height: f64,
    /// Duration of the scroll-into-view animation; `None` uses
    /// [`DEFAULT_SCROLL_DURATION`].
    pub scroll_duration: Option<f64>,
    /// Whether a clipped menu may scroll its parent to become visible.
    pub scroll_into_view: bool,
    /// Whether the menu is rendered outside its control's containment context.
    ///
    /// Portaled menus never scroll their parent.
    pub portaled: bool,
}

impl Default for PositionerConfig {
    fn default() -> Self {
        Self {
            position: MenuPosition::Bottom,
            item_size: 35.0,
            max_height: 300.0,
            scroll_duration: None,
            scroll_into_view: true,
            portaled: false,
        }
    }
}

/// Tracks placement, height, and scroll animation for one menu.
///
/// ## Usage
///
/// - Call [`MenuPositioner::set_open`] on every open/close transition.
/// - After the host has laid out a freshly opened menu, call
///   [`MenuPositioner::layout`]. Hosts without a post-layout hook can instead
///   rely on the first [`MenuPositioner::animation_frame`], which performs the
///   pending layout.
/// - While [`MenuPositioner::wants_animation_frame`] is `true`, call
///   [`MenuPositioner::animation_frame`] once per frame.
/// - Read [`MenuPositioner::menu_height`] and [`MenuPositioner::menu_top`] when rendering.
///
/// [`PositionerEvent::Opened`] and [`PositionerEvent::Closed`] are each reported
/// exactly once per transition. A menu that closes before its layout ran, or
/// while its scroll animation is in flight, still reports `Opened` before
/// `Closed`, so the two always pair up.
#[derive(Clone, Debug)]
pub struct MenuPositioner {
    config: PositionerConfig,
    open: bool,
    top_position: bool,
    menu_height: f64,
    condensed: bool,
    layout_pending: bool,
    animation: Option<ScrollAnimation>,
    next_handle: u64,
}

impl MenuPositioner {
    /// Creates a closed positioner.
    #[must_use]
    pub fn new(config: PositionerConfig) -> Self {
        Self {
            top_position: config.position == MenuPosition::Top,
            menu_height: config.max_height,
            config,
            open: false,
            condensed: false,
            layout_pending: false,
            animation: None,
            next_handle: 0,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &PositionerConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// A new max height applies immediately unless the menu is currently
    /// condensed; a new position is resolved against `surface`.
    pub fn set_config(&mut self, config: PositionerConfig, surface: Option<&dyn MenuSurface>) {
        let position_changed = config.position != self.config.position;
        self.config = config;
        if !self.condensed {
            self.menu_height = config.max_height;
        }
        if position_changed {
            self.update_placement(surface);
        }
    }

    /// Returns `true` if the menu is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Returns `true` if the menu is placed above its control.
    #[must_use]
    pub const fn is_top_position(&self) -> bool {
        self.top_position
    }

    /// Re-resolves the placement from the configured position.
    pub fn update_placement(&mut self, surface: Option<&dyn MenuSurface>) {
        self.top_position = match self.config.position {
            MenuPosition::Top => true,
            MenuPosition::Bottom => false,
            MenuPosition::Auto => !menu_fits_below(measure(surface).as_ref()),
        };
        trace!(
            target: "understory_menu_geometry",
            top = self.top_position,
            "menu placement resolved"
        );
    }

    /// Height to give the menu for `option_count` items.
    #[must_use]
    pub fn menu_height(&self, option_count: usize) -> f64 {
        #[allow(
            clippy::cast_precision_loss,
            reason = "Option counts stay far below 2^52"
        )]
        let content = option_count as f64 * self.config.item_size;
        self.menu_height.min(content)
    }

    /// Top offset of the menu, if it is placed above the control.
    #[must_use]
    pub fn menu_top(
        &self,
        option_count: usize,
        surface: Option<&dyn MenuSurface>,
    ) -> Option<MenuTop> {
        if !self.top_position {
            return None;
        }
        let (menu, margins, control) = match surface {
            Some(s) => (s.menu_rect(), s.menu_margins(), s.control_rect()),
            None => (None, crate::Margins::ZERO, None),
        };
        Some(menu_top(self.menu_height(option_count), menu, margins, control))
    }

    /// Handles an open/close transition.
    ///
    /// Opening with a surface leaves the geometry pending until
    /// [`MenuPositioner::layout`], since the opened menu has not been laid out
    /// yet. Without a surface there is nothing to measure, and the menu opens
    /// right away. Setting the current state again is a no-op.
    pub fn set_open(&mut self, open: bool, surface: Option<&dyn MenuSurface>) -> PositionerEvents {
        let mut events = PositionerEvents::new();
        if open == self.open {
            return events;
        }
        self.open = open;

        if !open {
            let unreported = core::mem::take(&mut self.layout_pending);
            if self.cancel_animation() || unreported {
                events.push(PositionerEvent::Opened);
            }
            events.push(PositionerEvent::Closed);
            if self.condensed {
                self.condensed = false;
                self.menu_height = self.config.max_height;
            }
            debug!(target: "understory_menu_geometry", "menu closed");
            return events;
        }

        self.layout_pending = true;
        if surface.is_none() {
            return self.layout(None);
        }
        trace!(target: "understory_menu_geometry", "menu opened; waiting for layout");
        events
    }

    /// Returns `true` if an opened menu is waiting for [`MenuPositioner::layout`].
    #[must_use]
    pub const fn wants_layout(&self) -> bool {
        self.layout_pending
    }

    /// Measures a freshly opened menu after the host has laid it out.
    ///
    /// Resolves placement and, for menus placed below a non-portaled control,
    /// plans a scroll-into-view. If an animation is started,
    /// [`PositionerEvent::Opened`] is deferred until its last frame. Does
    /// nothing unless an open is pending.
    pub fn layout(&mut self, surface: Option<&dyn MenuSurface>) -> PositionerEvents {
        let mut events = PositionerEvents::new();
        if !core::mem::take(&mut self.layout_pending) {
            return events;
        }

        self.update_placement(surface);
        if self.top_position || self.config.portaled {
            events.push(PositionerEvent::Opened);
            return events;
        }

        let measurement = measure(surface);
        let plan = plan_scroll_into_view(measurement.as_ref(), self.config.scroll_into_view);
        debug!(target: "understory_menu_geometry", ?plan, "menu opened");
        match plan {
            ScrollPlan::InView | ScrollPlan::Disabled => events.push(PositionerEvent::Opened),
            ScrollPlan::Condensed(space) => {
                if space > 0.0 {
                    self.condensed = true;
                    self.menu_height = space;
                }
                events.push(PositionerEvent::Opened);
            }
            ScrollPlan::Scroll { from, to } => {
                let handle = AnimationHandle(self.next_handle);
                self.next_handle += 1;
                let duration = self
                    .config
                    .scroll_duration
                    .unwrap_or(DEFAULT_SCROLL_DURATION);
                self.animation = Some(ScrollAnimation::new(handle, from, to, duration));
            }
        }
        events
    }

    /// Returns `true` while a layout is pending or a scroll animation is in
    /// flight.
    #[must_use]
    pub const fn wants_animation_frame(&self) -> bool {
        self.layout_pending || self.animation.is_some()
    }

    /// Handle of the in-flight animation, if any.
    #[must_use]
    pub fn animation_handle(&self) -> Option<AnimationHandle> {
        self.animation.as_ref().map(ScrollAnimation::handle)
    }

    /// Returns `true` if `handle` refers to the in-flight animation.
    #[must_use]
    pub fn is_current(&self, handle: AnimationHandle) -> bool {
        self.animation_handle() == Some(handle)
    }

    /// Advances the in-flight animation by one frame.
    ///
    /// Writes the new scroll offset to `surface` and returns
    /// [`PositionerEvent::Opened`] on the final frame. A pending layout is
    /// performed instead of a scroll step; a scroll it starts begins on the
    /// next frame. Does nothing when neither is outstanding.
    pub fn animation_frame(
        &mut self,
        surface: Option<&mut dyn MenuSurface>,
    ) -> Option<PositionerEvent> {
        if self.layout_pending {
            return self.layout(surface.as_deref()).first().copied();
        }
        let anim = self.animation.as_mut()?;
        let step = anim.step();
        trace!(
            target: "understory_menu_geometry",
            position = step.position,
            finished = step.finished,
            "scroll frame"
        );
        if let Some(surface) = surface {
            surface.set_scroll_top(step.position);
        }
        if step.finished {
            self.animation = None;
            Some(PositionerEvent::Opened)
        } else {
            None
        }
    }

    /// Cancels the in-flight animation, invalidating its handle.
    ///
    /// Returns `true` if an animation was cancelled; its continuation will
    /// never run.
    pub fn cancel_animation(&mut self) -> bool {
        let cancelled = self.animation.take().is_some();
        if cancelled {
            debug!(target: "understory_menu_geometry", "scroll animation cancelled");
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use kurbo::Rect;

    use super::*;
    use crate::{Margins, ScrollParent};

    #[derive(Default)]
    struct FakeSurface {
        menu: Option<Rect>,
        control: Option<Rect>,
        parent_height: f64,
        scroll_top: f64,
        viewport: f64,
        writes: usize,
    }

    impl MenuSurface for FakeSurface {
        fn menu_rect(&self) -> Option<Rect> {
            self.menu
        }

        fn control_rect(&self) -> Option<Rect> {
            self.control
        }

        fn menu_margins(&self) -> Margins {
            Margins::new(4.0, 4.0)
        }

        fn scroll_parent(&self) -> Option<ScrollParent> {
            Some(ScrollParent {
                rect: Rect::new(0.0, 0.0, 800.0, self.parent_height),
                scroll_top: self.scroll_top,
            })
        }

        fn viewport_height(&self) -> f64 {
            self.viewport
        }

        fn set_scroll_top(&mut self, top: f64) {
            self.scroll_top = top;
            self.writes += 1;
        }
    }

    fn clipped_surface() -> FakeSurface {
        FakeSurface {
            menu: Some(Rect::new(0.0, 700.0, 300.0, 1000.0)),
            control: Some(Rect::new(0.0, 660.0, 300.0, 700.0)),
            parent_height: 2000.0,
            scroll_top: 0.0,
            viewport: 800.0,
            writes: 0,
        }
    }

    #[test]
    fn open_without_surface_opens_immediately() {
        let mut p = MenuPositioner::new(PositionerConfig::default());
        let events = p.set_open(true, None);
        assert_eq!(events.as_slice(), &[PositionerEvent::Opened]);
        assert!(!p.wants_animation_frame());
        // Reopening while open is a no-op.
        assert!(p.set_open(true, None).is_empty());
        assert_eq!(p.set_open(false, None).as_slice(), &[PositionerEvent::Closed]);
    }

    #[test]
    fn height_is_capped_by_content() {
        let p = MenuPositioner::new(PositionerConfig::default());
        assert_eq!(p.menu_height(3), 105.0);
        assert_eq!(p.menu_height(100), 300.0);
        assert_eq!(p.menu_height(0), 0.0);
    }

    #[test]
    fn clipped_menu_animates_then_reports_open() {
        let mut p = MenuPositioner::new(PositionerConfig {
            scroll_duration: Some(20.0),
            ..PositionerConfig::default()
        });
        let mut surface = clipped_surface();
        assert!(p.set_open(true, Some(&surface)).is_empty());
        assert!(p.wants_layout());
        let events = p.layout(Some(&surface));
        assert!(events.is_empty(), "open is deferred until the scroll ends");
        assert!(!p.wants_layout());
        assert!(p.wants_animation_frame());

        let mut opened = 0;
        while p.wants_animation_frame() {
            if p.animation_frame(Some(&mut surface)) == Some(PositionerEvent::Opened) {
                opened += 1;
            }
        }
        assert_eq!(opened, 1);
        assert_eq!(surface.writes, 4);
        // bottom - viewport + scroll_top + margin bottom
        assert_eq!(surface.scroll_top, 1000.0 - 800.0 + 4.0);
    }

    #[test]
    fn close_cancels_animation_and_pairs_events() {
        let mut p = MenuPositioner::new(PositionerConfig::default());
        let mut surface = clipped_surface();
        p.set_open(true, Some(&surface));
        p.layout(Some(&surface));
        let handle = p.animation_handle().expect("animation should be scheduled");
        p.animation_frame(Some(&mut surface));

        let events = p.set_open(false, Some(&surface));
        assert_eq!(
            events.as_slice(),
            &[PositionerEvent::Opened, PositionerEvent::Closed]
        );
        assert!(!p.is_current(handle));
        let writes = surface.writes;
        assert_eq!(p.animation_frame(Some(&mut surface)), None);
        assert_eq!(surface.writes, writes);
    }

    #[test]
    fn condensed_height_resets_on_close() {
        let mut p = MenuPositioner::new(PositionerConfig::default());
        let surface = FakeSurface {
            parent_height: 800.0,
            viewport: 750.0,
            ..clipped_surface()
        };
        p.set_open(true, Some(&surface));
        assert_eq!(
            p.layout(Some(&surface)).as_slice(),
            &[PositionerEvent::Opened]
        );
        assert_eq!(p.menu_height(100), 100.0);

        p.set_open(false, Some(&surface));
        assert_eq!(p.menu_height(100), 300.0);
    }

    #[test]
    fn portaled_and_top_menus_never_scroll() {
        let mut p = MenuPositioner::new(PositionerConfig {
            portaled: true,
            ..PositionerConfig::default()
        });
        let surface = clipped_surface();
        p.set_open(true, Some(&surface));
        assert_eq!(
            p.layout(Some(&surface)).as_slice(),
            &[PositionerEvent::Opened]
        );
        assert!(!p.wants_animation_frame());

        let mut p = MenuPositioner::new(PositionerConfig {
            position: MenuPosition::Top,
            ..PositionerConfig::default()
        });
        p.set_open(true, Some(&surface));
        assert_eq!(
            p.layout(Some(&surface)).as_slice(),
            &[PositionerEvent::Opened]
        );
        assert!(!p.wants_animation_frame());
    }

    #[test]
    fn menu_is_measured_after_it_is_rendered() {
        let mut p = MenuPositioner::new(PositionerConfig {
            position: MenuPosition::Auto,
            ..PositionerConfig::default()
        });
        // The control is mounted but the menu is only rendered once open.
        let mut surface = FakeSurface {
            menu: None,
            ..clipped_surface()
        };
        assert!(p.set_open(true, Some(&surface)).is_empty());
        surface.menu = clipped_surface().menu;

        // The first frame performs the layout and starts the scroll.
        assert_eq!(p.animation_frame(Some(&mut surface)), None);
        assert!(!p.is_top_position());
        assert!(p.animation_handle().is_some());
        assert_eq!(surface.writes, 0);

        let mut frames = 0;
        while p.wants_animation_frame() {
            p.animation_frame(Some(&mut surface));
            frames += 1;
        }
        assert_eq!(frames, 60);
        assert_eq!(surface.scroll_top, 1000.0 - 800.0 + 4.0);
    }

    #[test]
    fn closing_before_layout_pairs_events() {
        let mut p = MenuPositioner::new(PositionerConfig::default());
        let surface = clipped_surface();
        p.set_open(true, Some(&surface));
        assert_eq!(
            p.set_open(false, Some(&surface)).as_slice(),
            &[PositionerEvent::Opened, PositionerEvent::Closed]
        );
        assert!(!p.wants_animation_frame());
        assert!(p.layout(Some(&surface)).is_empty());
    }

    #[test]
    fn auto_position_flips_above_when_clipped() {
        let mut p = MenuPositioner::new(PositionerConfig {
            position: MenuPosition::Auto,
            ..PositionerConfig::default()
        });
        let surface = FakeSurface {
            parent_height: 800.0,
            ..clipped_surface()
        };
        p.update_placement(Some(&surface));
        assert!(p.is_top_position());

        let top = p.menu_top(10, Some(&surface)).expect("menu is above");
        // 300 menu + 40 control, 8 of margins.
        assert_eq!(top.offset(), -332.0);

        p.update_placement(None);
        assert!(!p.is_top_position());
        assert!(p.menu_top(10, None).is_none());
    }
}
