// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host input events delivered to the controller.

use bitflags::bitflags;

/// Keys the control reacts to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    /// Move option focus down, or open the menu.
    ArrowDown,
    /// Move option focus up, or open the menu.
    ArrowUp,
    /// Move chip focus toward the first chip.
    ArrowLeft,
    /// Move chip focus toward the last chip.
    ArrowRight,
    /// Open the menu or commit the focused option.
    Space,
    /// Commit the focused option.
    Enter,
    /// Close the menu.
    Escape,
    /// Commit the focused option and let focus move on.
    Tab,
    /// Remove values.
    Backspace,
    /// Remove values.
    Delete,
    /// Any other key; ignored.
    Other,
}

impl Key {
    /// Maps a DOM `KeyboardEvent.key` name onto a [`Key`].
    ///
    /// ```rust
    /// use understory_select::Key;
    ///
    /// assert_eq!(Key::from_dom_key("ArrowDown"), Key::ArrowDown);
    /// assert_eq!(Key::from_dom_key(" "), Key::Space);
    /// assert_eq!(Key::from_dom_key("q"), Key::Other);
    /// ```
    #[must_use]
    pub fn from_dom_key(name: &str) -> Self {
        match name {
            "ArrowDown" => Self::ArrowDown,
            "ArrowUp" => Self::ArrowUp,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            " " | "Spacebar" => Self::Space,
            "Enter" => Self::Enter,
            "Escape" | "Esc" => Self::Escape,
            "Tab" => Self::Tab,
            "Backspace" => Self::Backspace,
            "Delete" | "Del" => Self::Delete,
            _ => Self::Other,
        }
    }
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 1 << 0;
        /// Control.
        const CONTROL = 1 << 1;
        /// Alt / Option.
        const ALT = 1 << 2;
        /// Meta / Command.
        const META = 1 << 3;
    }
}

/// A key-down event.
///
/// The controller marks the event as default-prevented when it consumed the
/// key; hosts should then suppress the platform's default action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key pressed.
    pub key: Key,
    /// Modifiers held.
    pub modifiers: Modifiers,
    /// An input method composition is in progress.
    pub is_composing: bool,
    default_prevented: bool,
}

impl KeyEvent {
    /// Creates an event for `key` with no modifiers.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
            is_composing: false,
            default_prevented: false,
        }
    }

    /// Sets the held modifiers.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Marks the event as part of an input method composition.
    #[must_use]
    pub fn composing(mut self) -> Self {
        self.is_composing = true;
        self
    }

    /// Suppresses the platform default action (and the control's own handling,
    /// when called from a key-down hook).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns `true` once [`KeyEvent::prevent_default`] was called.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// What a pointer-down on the control landed on.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PointerTarget {
    /// The text input itself.
    Input,
    /// Anywhere else on the control.
    Control,
}
