// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement queries: measurement snapshots, fits-below, and the top offset.

use core::fmt;

use kurbo::Rect;

/// Configured placement of a menu relative to its control.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuPosition {
    /// Always above the control.
    Top,
    /// Always below the control.
    #[default]
    Bottom,
    /// Below the control when the menu fits under it, otherwise above.
    Auto,
}

/// Vertical margins of the menu surface.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Margins {
    /// Margin above the menu.
    pub top: f64,
    /// Margin below the menu.
    pub bottom: f64,
}

impl Margins {
    /// No margins.
    pub const ZERO: Self = Self {
        top: 0.0,
        bottom: 0.0,
    };

    /// Creates margins from top and bottom values.
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }
}

/// The nearest scrollable ancestor of the menu.
///
/// When the menu has no scrollable ancestor, hosts report the document
/// (viewport) here instead.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScrollParent {
    /// Bounding rect of the scroll container in viewport coordinates.
    pub rect: Rect,
    /// Current vertical scroll offset of the container.
    pub scroll_top: f64,
}

/// Measurement capability supplied by the rendering layer.
///
/// All rects are in viewport coordinates. Methods returning `Option` report
/// `None` while the corresponding surface is not mounted or not laid out.
pub trait MenuSurface {
    /// Bounding rect of the menu surface.
    fn menu_rect(&self) -> Option<Rect>;

    /// Bounding rect of the control the menu is anchored to.
    fn control_rect(&self) -> Option<Rect>;

    /// Vertical margins of the menu surface.
    fn menu_margins(&self) -> Margins {
        Margins::ZERO
    }

    /// The nearest scrollable ancestor of the menu.
    fn scroll_parent(&self) -> Option<ScrollParent>;

    /// Inner height of the viewport.
    fn viewport_height(&self) -> f64;

    /// Scrolls the nearest scrollable ancestor to `top`.
    fn set_scroll_top(&mut self, top: f64);
}

/// A snapshot of everything needed to reason about a mounted menu.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MenuMeasurement {
    /// Bounding rect of the menu surface.
    pub menu: Rect,
    /// Vertical margins of the menu surface.
    pub margins: Margins,
    /// Nearest scrollable ancestor.
    pub scroll_parent: ScrollParent,
    /// Inner height of the viewport.
    pub viewport_height: f64,
}

impl MenuMeasurement {
    /// Space between the top of the menu and the bottom of the scroll parent's
    /// visible area.
    #[must_use]
    pub fn scroll_space_below(&self) -> f64 {
        self.scroll_parent.rect.height() - self.scroll_parent.scroll_top - self.menu.y0
    }

    /// Space between the top of the menu and the bottom of the viewport.
    #[must_use]
    pub fn view_space_below(&self) -> f64 {
        self.viewport_height - self.menu.y0
    }
}

/// Takes a measurement snapshot from a surface.
///
/// Returns `None` if there is no surface, or if the menu or its scroll parent
/// cannot be measured yet.
pub fn measure(surface: Option<&dyn MenuSurface>) -> Option<MenuMeasurement> {
    let surface = surface?;
    Some(MenuMeasurement {
        menu: surface.menu_rect()?,
        margins: surface.menu_margins(),
        scroll_parent: surface.scroll_parent()?,
        viewport_height: surface.viewport_height(),
    })
}

/// Returns `true` if the menu fits in the space below the control.
///
/// An unmeasurable menu is assumed to fit.
pub fn menu_fits_below(measurement: Option<&MenuMeasurement>) -> bool {
    measurement.is_none_or(|m| m.scroll_space_below() >= m.menu.height())
}

/// Offset that places a menu flush against the top edge of its control.
///
/// The offset is kept in two parts so renderers that build length expressions
/// can do so; [`MenuTop::offset`] folds them into a single value.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MenuTop {
    /// `-(|menu height + control height|)`.
    pub base: f64,
    /// `margin top + margin bottom`.
    pub adjust: f64,
}

impl MenuTop {
    /// The combined offset, `base + adjust`.
    #[must_use]
    pub fn offset(&self) -> f64 {
        self.base + self.adjust
    }
}

impl fmt::Display for MenuTop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "calc({}px + {}px)", self.base, self.adjust)
    }
}

/// Computes the top offset of a menu placed above its control.
///
/// When `menu_height` is not positive, the measured height of the menu is used
/// instead (if the menu is measurable). A missing control contributes zero height.
pub fn menu_top(
    menu_height: f64,
    menu: Option<Rect>,
    margins: Margins,
    control: Option<Rect>,
) -> MenuTop {
    let height = match menu {
        Some(rect) if menu_height <= 0.0 => rect.height(),
        _ => menu_height,
    };
    let control_height = control.map_or(0.0, |r| r.height());
    let sum = height + control_height;
    MenuTop {
        base: if sum < 0.0 { sum } else { -sum },
        adjust: margins.top + margins.bottom,
    }
}
