// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Select: a headless, searchable single/multi-select dropdown.
//!
//! This crate is the interaction engine behind a select (combobox) widget. It
//! owns everything except rendering:
//!
//! - **Options**: host records are normalized through [`Accessors`] and filtered
//!   against the search text ([`build_menu_options`]), with optional case and
//!   accent folding and hiding of selected options.
//! - **Selection**: single or multi values, keyboard focus over menu options,
//!   and keyboard focus over multi-value chips ([`Selection`]).
//! - **Routing**: key, pointer, focus, and text events are turned into state
//!   changes ([`Select::handle_key_down`] and friends).
//! - **Geometry**: menu placement, height, top offset, and an animated
//!   scroll-into-view, delegated to `understory_menu_geometry`, plus a
//!   fixed-item-height window over the menu list ([`MenuWindow`]).
//! - **Time**: search text is debounced with `understory_debounce`. The
//!   controller never reads a clock; hosts pass timestamps to
//!   [`Select::advance`].
//!
//! Renderers read state from [`Select`] (menu options, focused option, selected
//! values, menu height) and report measurements through
//! [`understory_menu_geometry::MenuSurface`].
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_select::{Accessors, Key, KeyEvent, OptionKey, Select, SelectConfig};
//!
//! let accessors = Accessors::new(
//!     |s: &&str| OptionKey::from(*s),
//!     |s: &&str| OptionKey::from(*s),
//! );
//! let mut select = Select::new(SelectConfig::default(), accessors)
//!     .expect("default config is valid")
//!     .with_options(["Apple", "Banana", "Cherry"]);
//!
//! select.focus();
//! for key in [Key::ArrowDown, Key::ArrowDown, Key::ArrowDown, Key::Enter] {
//!     select.handle_key_down(&mut KeyEvent::new(key));
//! }
//!
//! assert_eq!(select.selected()[0].label, OptionKey::from("Cherry"));
//! assert!(!select.is_menu_open());
//! ```
//!
//! ## Searching
//!
//! ```rust
//! use understory_select::{Accessors, OptionKey, Select, SelectConfig};
//!
//! let config = SelectConfig {
//!     input_delay: Some(200),
//!     ..SelectConfig::default()
//! };
//! let accessors = Accessors::new(
//!     |s: &&str| OptionKey::from(*s),
//!     |s: &&str| OptionKey::from(*s),
//! );
//! let mut select = Select::new(config, accessors)
//!     .expect("valid config")
//!     .with_options(["Apple", "Banana", "Grape"]);
//!
//! select.advance(1_000);
//! select.handle_input_change("ap");
//! assert_eq!(select.menu_options().len(), 3);
//!
//! // The filter catches up once the text has been stable for 200ms.
//! select.advance(1_200);
//! assert_eq!(select.menu_options().len(), 2);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod controller;
mod filter;
mod input;
mod menu_window;
mod option;
mod router;
mod selection;

#[cfg(test)]
mod testing;

pub use config::{
    ConfigError, FilterSource, MENU_ITEM_SIZE_DEFAULT, MENU_MAX_HEIGHT_DEFAULT, SelectConfig,
};
pub use controller::{KeyDownHook, OptionChange, Select, SelectCallbacks};
pub use filter::{FilterMatch, FilterSettings, build_menu_options, format_filter_str};
pub use input::{Key, KeyEvent, Modifiers, PointerTarget};
pub use menu_window::{MenuWindow, VisibleRange};
pub use option::{
    Accessors, FocusedOption, MenuOption, OptionData, OptionKey, SelectedOption,
    normalize_value,
};
pub use selection::{ChipStep, OptionStep, Selection};
pub use understory_menu_geometry::{Margins, MenuPosition, MenuSurface, MenuTop, ScrollParent};
