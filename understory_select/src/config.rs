// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Control configuration and validation.

use thiserror::Error;
use understory_menu_geometry::{MenuPosition, PositionerConfig};

use crate::filter::{FilterMatch, FilterSettings};

/// Default height of a single menu item.
pub const MENU_ITEM_SIZE_DEFAULT: f64 = 35.0;

/// Default maximum height of the menu.
pub const MENU_MAX_HEIGHT_DEFAULT: f64 = 300.0;

/// Which search text the option filter consumes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterSource {
    /// Filter on the debounced text; results lag typing by
    /// [`SelectConfig::input_delay`].
    #[default]
    Debounced,
    /// Filter on the live text; only the search notification is debounced.
    Immediate,
}

/// Errors reported by [`SelectConfig::validate`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// The menu item size must be finite and positive.
    #[error("menu item size must be finite and positive, got {0}")]
    InvalidItemSize(f64),
    /// The menu max height must be finite and non-negative.
    #[error("menu max height must be finite and non-negative, got {0}")]
    InvalidMaxHeight(f64),
    /// An explicit scroll duration must be finite and positive.
    #[error("menu scroll duration must be finite and positive, got {0}")]
    InvalidScrollDuration(f64),
}

/// Behavior of a select control.
///
/// Every field has a default matching a plain single-select dropdown; override
/// with struct update syntax:
///
/// ```rust
/// use understory_select::SelectConfig;
///
/// let config = SelectConfig {
///     is_multi: true,
///     is_clearable: true,
///     input_delay: Some(200),
///     ..SelectConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert!(config.hides_selected_options());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SelectConfig {
    /// Multi-select semantics: selection toggles and chips.
    pub is_multi: bool,
    /// Options are filtered by the host (for example a server); local text
    /// filtering is skipped.
    pub is_async: bool,
    /// Whether typing into the control is allowed.
    pub is_searchable: bool,
    /// Whether the value may be cleared (clear indicator, backspace in single mode).
    pub is_clearable: bool,
    /// Disables all interaction.
    pub is_disabled: bool,
    /// The host is loading options; carried for renderers.
    pub is_loading: bool,
    /// The value is invalid; carried for renderers.
    pub is_invalid: bool,
    /// Focus the control as soon as it is mounted.
    pub auto_focus: bool,
    /// Only render the menu while it is open.
    pub lazy_load_menu: bool,
    /// Debounce delay for search text, in host time units.
    pub input_delay: Option<u64>,
    /// Which search text drives filtering.
    pub filter_source: FilterSource,
    /// Where in the filter string the search text must match.
    pub filter_match_from: FilterMatch,
    /// Case-insensitive matching.
    pub filter_ignore_case: bool,
    /// Accent-insensitive matching.
    pub filter_ignore_accents: bool,
    /// Hide options that are already selected; `None` hides them in multi mode only.
    pub hide_selected_options: Option<bool>,
    /// Menu placement.
    pub menu_position: MenuPosition,
    /// Height of one menu item.
    pub menu_item_size: f64,
    /// Maximum menu height.
    pub menu_max_height: f64,
    /// Items rendered beyond each edge of the visible window.
    pub menu_overscan_count: usize,
    /// Duration of the scroll-into-view animation; `None` uses the default.
    pub menu_scroll_duration: Option<f64>,
    /// Allow scrolling a clipped menu into view when it opens.
    pub scroll_menu_into_view: bool,
    /// The menu is portaled out of its control's containment context.
    pub menu_portaled: bool,
    /// Close the menu and clear search text after a selection.
    pub close_menu_on_select: bool,
    /// Blur the control after a selection; `None` blurs on touch devices only.
    pub blur_input_on_select: Option<bool>,
    /// The host is a touch-capable device.
    pub is_touch_device: bool,
    /// Backspace/Delete with empty search text removes value(s).
    pub backspace_clears_value: bool,
    /// Tab commits the focused option.
    pub tab_selects_option: bool,
    /// Pointer-down on the control opens the menu.
    pub open_menu_on_click: bool,
    /// Focusing the control opens the menu.
    pub open_menu_on_focus: bool,
    /// The host renders the multi-value chips itself.
    ///
    /// Disables chip keyboard focus and last-chip removal with backspace.
    pub renders_multi_options: bool,
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self {
            is_multi: false,
            is_async: false,
            is_searchable: true,
            is_clearable: false,
            is_disabled: false,
            is_loading: false,
            is_invalid: false,
            auto_focus: false,
            lazy_load_menu: false,
            input_delay: None,
            filter_source: FilterSource::Debounced,
            filter_match_from: FilterMatch::Any,
            filter_ignore_case: true,
            filter_ignore_accents: false,
            hide_selected_options: None,
            menu_position: MenuPosition::Bottom,
            menu_item_size: MENU_ITEM_SIZE_DEFAULT,
            menu_max_height: MENU_MAX_HEIGHT_DEFAULT,
            menu_overscan_count: 1,
            menu_scroll_duration: None,
            scroll_menu_into_view: true,
            menu_portaled: false,
            close_menu_on_select: true,
            blur_input_on_select: None,
            is_touch_device: false,
            backspace_clears_value: true,
            tab_selects_option: true,
            open_menu_on_click: true,
            open_menu_on_focus: false,
            renders_multi_options: false,
        }
    }
}

impl SelectConfig {
    /// Checks geometry values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.menu_item_size.is_finite() && self.menu_item_size > 0.0) {
            return Err(ConfigError::InvalidItemSize(self.menu_item_size));
        }
        if !(self.menu_max_height.is_finite() && self.menu_max_height >= 0.0) {
            return Err(ConfigError::InvalidMaxHeight(self.menu_max_height));
        }
        if let Some(d) = self.menu_scroll_duration
            && !(d.is_finite() && d > 0.0)
        {
            return Err(ConfigError::InvalidScrollDuration(d));
        }
        Ok(())
    }

    /// Whether selected options are hidden from the menu.
    #[must_use]
    pub fn hides_selected_options(&self) -> bool {
        self.hide_selected_options.unwrap_or(self.is_multi)
    }

    /// Whether committing a selection blurs the control.
    #[must_use]
    pub fn blurs_on_select(&self) -> bool {
        self.blur_input_on_select.unwrap_or(self.is_touch_device)
    }

    pub(crate) fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            match_from: self.filter_match_from,
            ignore_case: self.filter_ignore_case,
            ignore_accents: self.filter_ignore_accents,
            is_async: self.is_async,
            hide_selected: self.hides_selected_options(),
        }
    }

    pub(crate) fn positioner_config(&self) -> PositionerConfig {
        PositionerConfig {
            position: self.menu_position,
            item_size: self.menu_item_size,
            max_height: self.menu_max_height,
            scroll_duration: self.menu_scroll_duration,
            scroll_into_view: self.scroll_menu_into_view,
            portaled: self.menu_portaled,
        }
    }
}
