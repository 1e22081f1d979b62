// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Selected values, option focus, and chip focus.

use alloc::vec::Vec;

use tracing::trace;

use crate::option::{FocusedOption, MenuOption, OptionKey, SelectedOption};

/// Direction for moving keyboard focus across multi-value chips.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChipStep {
    /// Toward the first chip.
    Previous,
    /// Toward the last chip.
    Next,
}

/// Direction for moving keyboard focus through the menu.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionStep {
    /// Toward the end of the list, wrapping to the start.
    Down,
    /// Toward the start of the list, wrapping to the end.
    Up,
}

/// Holds the current value and both kinds of keyboard focus.
///
/// Every change to the selected values bumps [`Selection::generation`], which
/// the controller uses to know when to rebuild the menu and notify the host.
#[derive(Debug)]
pub struct Selection<T> {
    selected: Vec<SelectedOption<T>>,
    focused_option: Option<FocusedOption<T>>,
    focused_chip: Option<OptionKey>,
    generation: u64,
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T> Selection<T> {
    /// Creates a selection holding `selected`.
    pub fn new(selected: Vec<SelectedOption<T>>) -> Self {
        Self {
            selected,
            focused_option: None,
            focused_chip: None,
            generation: 0,
        }
    }

    /// The selected values, in selection order.
    pub fn selected(&self) -> &[SelectedOption<T>] {
        &self.selected
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Returns `true` if `value` is selected.
    pub fn contains(&self, value: &OptionKey) -> bool {
        self.selected.iter().any(|o| &o.value == value)
    }

    /// Counter bumped on every change to the selected values.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn bump(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Commits `option`.
    ///
    /// `was_selected` is the option's selected flag as displayed in the menu.
    /// In multi mode a selected option is removed and an unselected one is
    /// appended. In single mode an unselected option replaces the value and a
    /// selected one is left alone.
    ///
    /// Returns `true` if the value changed.
    pub fn select(
        &mut self,
        option: SelectedOption<T>,
        was_selected: bool,
        is_multi: bool,
    ) -> bool {
        match (is_multi, was_selected) {
            (true, true) => self.remove(&option.value),
            (true, false) => {
                trace!(target: "understory_select", value = %option.value, "append value");
                self.selected.push(option);
                self.bump();
                true
            }
            (false, true) => false,
            (false, false) => {
                trace!(target: "understory_select", value = %option.value, "replace value");
                self.selected.clear();
                self.selected.push(option);
                self.bump();
                true
            }
        }
    }

    /// Removes every entry whose value equals `value`.
    ///
    /// Returns `true` if anything was removed.
    pub fn remove(&mut self, value: &OptionKey) -> bool {
        let before = self.selected.len();
        self.selected.retain(|o| &o.value != value);
        let changed = self.selected.len() != before;
        if changed {
            trace!(target: "understory_select", %value, "remove value");
            self.bump();
        }
        changed
    }

    /// Empties the value and drops option focus.
    ///
    /// Returns `true` if the value changed.
    pub fn clear(&mut self) -> bool {
        self.focused_option = None;
        self.replace(Vec::new())
    }

    /// Replaces the whole value. Option focus is kept.
    ///
    /// Returns `true` unless both old and new values are empty.
    pub fn replace(&mut self, selected: Vec<SelectedOption<T>>) -> bool {
        if self.selected.is_empty() && selected.is_empty() {
            return false;
        }
        self.selected = selected;
        if self
            .focused_chip
            .as_ref()
            .is_some_and(|v| !self.selected.iter().any(|o| &o.value == v))
        {
            self.focused_chip = None;
        }
        self.bump();
        true
    }

    /// The option under keyboard focus, if any.
    pub fn focused_option(&self) -> Option<&FocusedOption<T>> {
        self.focused_option.as_ref()
    }

    /// Focuses `menu_options[index]`, or drops focus if out of range.
    ///
    /// Focusing an option clears chip focus.
    pub fn focus_option(&mut self, menu_options: &[MenuOption<T>], index: usize) {
        self.focused_chip = None;
        self.snapshot_option(menu_options, index);
    }

    fn snapshot_option(&mut self, menu_options: &[MenuOption<T>], index: usize) {
        self.focused_option = menu_options.get(index).map(|option| FocusedOption {
            index,
            option: option.clone(),
        });
    }

    /// Drops option focus.
    pub fn clear_option_focus(&mut self) {
        self.focused_option = None;
    }

    /// Moves option focus one step, wrapping at both ends.
    ///
    /// With no focused option, [`OptionStep::Down`] focuses the first option and
    /// [`OptionStep::Up`] the last. Moving option focus clears chip focus.
    /// Returns the newly focused index, or `None` if the list is empty.
    pub fn step_option_focus(
        &mut self,
        menu_options: &[MenuOption<T>],
        step: OptionStep,
    ) -> Option<usize> {
        let len = menu_options.len();
        if len == 0 {
            return None;
        }
        let current = self.focused_option.as_ref().map(|f| f.index);
        let index = match (step, current) {
            (OptionStep::Down, Some(i)) => (i + 1) % len,
            (OptionStep::Down, None) => 0,
            (OptionStep::Up, Some(i)) if i > 0 => (i - 1).min(len - 1),
            (OptionStep::Up, _) => len - 1,
        };
        self.focus_option(menu_options, index);
        Some(index)
    }

    /// Re-derives option focus after the menu list was rebuilt.
    ///
    /// `refocus_first` forces focus onto the first option. Otherwise the focused
    /// index is kept (with a fresh snapshot) while it is still in range. An empty
    /// list always drops focus, and so does a focused chip. Returns the index
    /// that should be scrolled into view, if any.
    pub fn reconcile_option_focus(
        &mut self,
        menu_options: &[MenuOption<T>],
        refocus_first: bool,
    ) -> Option<usize> {
        if menu_options.is_empty() || self.focused_chip.is_some() {
            self.focused_option = None;
            return None;
        }
        if refocus_first || menu_options.len() == 1 {
            self.snapshot_option(menu_options, 0);
            return Some(0);
        }
        if let Some(index) = self.focused_option.as_ref().map(|f| f.index) {
            self.snapshot_option(menu_options, index);
        }
        None
    }

    /// The value of the chip under keyboard focus, if any.
    pub fn focused_chip(&self) -> Option<&OptionKey> {
        self.focused_chip.as_ref()
    }

    /// Drops chip focus.
    pub fn clear_chip_focus(&mut self) {
        self.focused_chip = None;
    }

    /// Moves chip focus one step.
    ///
    /// [`ChipStep::Previous`] from no focus lands on the last chip and stops at
    /// the first. [`ChipStep::Next`] past the last chip drops chip focus. Moving
    /// chip focus clears option focus.
    pub fn step_chip_focus(&mut self, step: ChipStep) {
        if self.selected.is_empty() {
            return;
        }
        let last = self.selected.len() - 1;
        let current = self
            .focused_chip
            .as_ref()
            .and_then(|v| self.selected.iter().position(|o| &o.value == v));
        let next = match (step, current) {
            (ChipStep::Next, Some(i)) if i < last => Some(i + 1),
            (ChipStep::Next, _) => None,
            (ChipStep::Previous, None) => Some(last),
            (ChipStep::Previous, Some(i)) => Some(i.saturating_sub(1)),
        };
        self.focused_option = None;
        self.focused_chip = next.map(|i| self.selected[i].value.clone());
    }

    /// Removes the focused chip and moves chip focus to the chip after it.
    ///
    /// Returns `true` if a chip was removed.
    pub fn remove_focused_chip(&mut self) -> bool {
        let Some(value) = self.focused_chip.take() else {
            return false;
        };
        let next = self
            .selected
            .iter()
            .position(|o| o.value == value)
            .and_then(|i| self.selected.get(i + 1))
            .map(|o| o.value.clone());
        let removed = self.remove(&value);
        self.focused_chip = next;
        removed
    }
}
