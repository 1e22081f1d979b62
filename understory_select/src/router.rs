// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Event routing: maps host input events onto state changes.
//!
//! Each public handler applies its transition and then runs the controller's
//! reconcile pass, so callbacks observe fully committed state.

use alloc::string::String;
use alloc::vec::Vec;

use tracing::trace;

use crate::controller::Select;
use crate::input::{Key, KeyEvent, Modifiers, PointerTarget};
use crate::option::{OptionKey, SelectedOption};
use crate::selection::{ChipStep, OptionStep};

/// Which option to focus when the menu opens and nothing is selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum OpenFocus {
    First,
    Last,
}

impl<T> Select<T> {
    /// Handles a key-down on the control.
    ///
    /// Runs the `on_key_down` hook first; if the hook prevents default, the
    /// key is otherwise ignored. Consumed keys are marked default-prevented.
    /// Tab commits the focused option but is never prevented, so focus still
    /// moves on.
    pub fn handle_key_down(&mut self, event: &mut KeyEvent) {
        if self.config.is_disabled {
            return;
        }
        if let Some(hook) = self.callbacks.on_key_down.as_mut() {
            hook(&mut *event, &self.input_value, self.selection.focused_option());
            if event.is_default_prevented() {
                return;
            }
        }
        trace!(target: "understory_select", key = ?event.key, "key down");
        if self.route_key(event) {
            event.prevent_default();
        }
        self.commit();
    }

    /// Applies a key; returns `true` if the key was consumed.
    fn route_key(&mut self, event: &KeyEvent) -> bool {
        match event.key {
            Key::ArrowDown | Key::ArrowUp => {
                let down = event.key == Key::ArrowDown;
                if self.menu_open {
                    let step = if down { OptionStep::Down } else { OptionStep::Up };
                    if let Some(index) = self.selection.step_option_focus(&self.menu_options, step)
                    {
                        self.window.scroll_to_index(index);
                    }
                } else {
                    self.open_menu_and_focus(if down { OpenFocus::First } else { OpenFocus::Last });
                }
                true
            }
            Key::ArrowLeft | Key::ArrowRight => {
                if !self.config.is_multi
                    || !self.input_value.is_empty()
                    || self.config.renders_multi_options
                {
                    return false;
                }
                let step = if event.key == Key::ArrowLeft {
                    ChipStep::Previous
                } else {
                    ChipStep::Next
                };
                self.selection.step_chip_focus(step);
                true
            }
            Key::Space => {
                if !self.input_value.is_empty() {
                    return false;
                }
                if !self.menu_open {
                    self.open_menu_and_focus(OpenFocus::First);
                } else if self.selection.focused_option().is_none() {
                    return false;
                } else {
                    self.select_focused();
                }
                true
            }
            Key::Enter => {
                if event.is_composing {
                    return false;
                }
                if self.menu_open {
                    self.select_focused();
                }
                true
            }
            Key::Escape => {
                if self.menu_open {
                    self.close_menu();
                    self.clear_input_value();
                }
                true
            }
            Key::Tab => {
                if self.menu_open
                    && self.config.tab_selects_option
                    && !event.modifiers.contains(Modifiers::SHIFT)
                    && self.selection.focused_option().is_some()
                {
                    self.select_focused();
                }
                false
            }
            Key::Backspace | Key::Delete => {
                if !self.input_value.is_empty() {
                    return false;
                }
                if self.selection.focused_chip().is_some() {
                    self.selection.remove_focused_chip();
                    return true;
                }
                if !self.config.backspace_clears_value {
                    return false;
                }
                if self.config.is_multi && !self.config.renders_multi_options {
                    let last = self.selection.selected().last().map(|o| o.value.clone());
                    if let Some(value) = last {
                        self.selection.remove(&value);
                    }
                } else if self.config.is_clearable {
                    self.selection.replace(Vec::new());
                }
                true
            }
            Key::Other => false,
        }
    }

    /// Handles a pointer-down on the control.
    ///
    /// Returns `true` if the host should suppress the default action (anything
    /// but the text input, so the input keeps focus).
    pub fn handle_control_pointer_down(&mut self, target: PointerTarget) -> bool {
        if self.config.is_disabled {
            return false;
        }
        let was_open = self.menu_open;
        if !self.focused {
            self.gain_focus();
        }
        let not_input = target != PointerTarget::Input;
        if !was_open {
            if self.config.open_menu_on_click {
                self.open_menu_and_focus(OpenFocus::First);
            }
        } else if not_input {
            self.close_menu();
            self.clear_input_value();
        }
        self.commit();
        not_input
    }

    /// Handles a pointer-down on the caret indicator.
    ///
    /// Only active when [`Select::caret_toggles_menu`] is `true`; the control
    /// itself handles the pointer otherwise. Returns `true` if consumed.
    pub fn handle_caret_pointer_down(&mut self) -> bool {
        if !self.caret_toggles_menu() {
            return false;
        }
        self.gain_focus();
        if self.menu_open {
            self.close_menu();
        } else {
            self.open_menu_and_focus(OpenFocus::First);
        }
        self.commit();
        true
    }

    /// Handles a pointer-down on the clear indicator. Returns `true` if consumed.
    pub fn handle_clear_pointer_down(&mut self) -> bool {
        if !self.show_clear() {
            return false;
        }
        self.selection.replace(Vec::new());
        self.gain_focus();
        self.commit();
        true
    }

    /// Handles a pointer-down inside the menu; keeps focus on the control.
    ///
    /// Always returns `true`: the host should suppress the default action.
    pub fn handle_menu_pointer_down(&mut self) -> bool {
        if !self.config.is_disabled {
            self.gain_focus();
            self.commit();
        }
        true
    }

    /// Handles a click on the menu option at `index`.
    pub fn handle_option_click(&mut self, index: usize) {
        if self.config.is_disabled {
            return;
        }
        let Some(option) = self.menu_options.get(index) else {
            return;
        };
        if option.is_disabled {
            return;
        }
        let (selected, was_selected) = (option.to_selected(), option.is_selected);
        self.select_option(selected, was_selected);
        self.commit();
    }

    /// Handles the remove button on the chip for `value`.
    pub fn handle_chip_remove(&mut self, value: &OptionKey) {
        if self.config.is_disabled {
            return;
        }
        if self.selection.focused_chip() == Some(value) {
            self.selection.clear_chip_focus();
        }
        self.selection.remove(value);
        self.commit();
    }

    /// Handles an edit of the search text by the user.
    pub fn handle_input_change(&mut self, text: &str) {
        if self.input_read_only() {
            return;
        }
        if let Some(cb) = self.callbacks.on_input_change.as_mut() {
            cb(text);
        }
        self.menu_open = true;
        self.set_input_value(String::from(text), true);
        self.commit();
    }

    /// Gives the control focus. Does nothing if it is already focused.
    pub fn focus(&mut self) {
        if self.config.is_disabled {
            return;
        }
        self.gain_focus();
        self.commit();
    }

    /// Removes focus from the control, closing the menu and clearing search
    /// text. Does nothing if it is not focused.
    pub fn blur(&mut self) {
        self.lose_focus();
        self.commit();
    }

    /// Opens the menu and focuses an option.
    ///
    /// In single mode the selected option wins; otherwise the first or last
    /// option is focused and scrolled into view.
    pub(crate) fn open_menu_and_focus(&mut self, position: OpenFocus) {
        self.menu_open = true;
        let len = self.menu_options.len();
        if len == 0 {
            return;
        }
        let selected_index = if self.config.is_multi {
            None
        } else {
            self.menu_options.iter().position(|o| o.is_selected)
        };
        let index = selected_index.unwrap_or(match position {
            OpenFocus::First => 0,
            OpenFocus::Last => len - 1,
        });
        self.selection.focus_option(&self.menu_options, index);
        self.window.scroll_to_index(index);
    }

    fn select_focused(&mut self) {
        let Some(focused) = self.selection.focused_option() else {
            return;
        };
        if focused.option.is_disabled {
            return;
        }
        let (selected, was_selected) = (focused.option.to_selected(), focused.option.is_selected);
        self.select_option(selected, was_selected);
    }

    /// Commits an option and applies the post-selection policy.
    fn select_option(&mut self, option: SelectedOption<T>, was_selected: bool) {
        self.selection
            .select(option, was_selected, self.config.is_multi);
        if self.config.blurs_on_select() {
            self.lose_focus();
        } else if self.config.close_menu_on_select {
            self.close_menu();
            self.clear_input_value();
        }
    }
}
