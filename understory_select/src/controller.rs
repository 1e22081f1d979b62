// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The select controller: owned state, the reconcile pipeline, and the
//! imperative API.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use smallvec::SmallVec;
use tracing::{debug, trace};
use understory_debounce::Debounced;
use understory_menu_geometry::{MenuPositioner, MenuSurface, MenuTop, PositionerEvent};

use crate::config::{ConfigError, FilterSource, SelectConfig};
use crate::filter::build_menu_options;
use crate::input::KeyEvent;
use crate::menu_window::MenuWindow;
use crate::option::{
    Accessors, FocusedOption, MenuOption, OptionKey, SelectedOption, normalize_value,
};
use crate::selection::Selection;

/// The value reported when the selection changes.
#[derive(Debug)]
pub enum OptionChange<T> {
    /// Single-select value: the selected record, or `None` when cleared.
    Single(Option<Rc<T>>),
    /// Multi-select value: all selected records, in selection order.
    Multi(Vec<Rc<T>>),
}

/// Hook run before the control handles a key.
///
/// Receives the event, the current search text, and the focused option.
/// Calling [`KeyEvent::prevent_default`] skips the control's own handling.
pub type KeyDownHook<T> = Box<dyn FnMut(&mut KeyEvent, &str, Option<&FocusedOption<T>>)>;

/// Host notifications.
///
/// Every callback is optional. Callbacks run after the state change that
/// triggered them has been applied.
pub struct SelectCallbacks<T> {
    /// The selected value changed. Not called for the initial value.
    pub on_option_change: Option<Box<dyn FnMut(OptionChange<T>)>>,
    /// User-typed search text settled after the input delay.
    pub on_search_change: Option<Box<dyn FnMut(&str)>>,
    /// The user edited the search text; called on every edit.
    pub on_input_change: Option<Box<dyn FnMut(&str)>>,
    /// Runs before key handling.
    pub on_key_down: Option<KeyDownHook<T>>,
    /// The control gained focus.
    pub on_input_focus: Option<Box<dyn FnMut()>>,
    /// The control lost focus.
    pub on_input_blur: Option<Box<dyn FnMut()>>,
    /// The menu finished opening, including any scroll-into-view.
    pub on_menu_open: Option<Box<dyn FnMut()>>,
    /// The menu closed.
    pub on_menu_close: Option<Box<dyn FnMut()>>,
}

impl<T> Default for SelectCallbacks<T> {
    fn default() -> Self {
        Self {
            on_option_change: None,
            on_search_change: None,
            on_input_change: None,
            on_key_down: None,
            on_input_focus: None,
            on_input_blur: None,
            on_menu_open: None,
            on_menu_close: None,
        }
    }
}

impl<T> fmt::Debug for SelectCallbacks<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectCallbacks")
            .field("on_option_change", &self.on_option_change.is_some())
            .field("on_search_change", &self.on_search_change.is_some())
            .field("on_input_change", &self.on_input_change.is_some())
            .field("on_key_down", &self.on_key_down.is_some())
            .field("on_input_focus", &self.on_input_focus.is_some())
            .field("on_input_blur", &self.on_input_blur.is_some())
            .field("on_menu_open", &self.on_menu_open.is_some())
            .field("on_menu_close", &self.on_menu_close.is_some())
            .finish()
    }
}

/// Inputs the current menu list was built from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct BuildKey {
    options: u64,
    selection: u64,
    config: u64,
    search: String,
}

/// A headless select control.
///
/// `Select` owns the option list, the search text, the selection, and the menu
/// geometry, and turns host events into state changes and notifications.
/// It never reads a clock: call [`Select::advance`] with a monotonic timestamp
/// before delivering events and on every frame, and [`Select::animation_frame`]
/// while [`Select::wants_animation_frame`] is `true`. Once a mounted menu has
/// opened, its geometry is measured after the host lays it out: call
/// [`Select::layout`] from a post-layout hook, or let the next animation frame
/// do it.
///
/// After every event the controller runs one reconcile pass in a fixed order:
/// the menu list is rebuilt if its inputs changed, option focus is reconciled
/// with the new list, the menu geometry is updated, and finally host callbacks
/// run.
pub struct Select<T> {
    pub(crate) config: SelectConfig,
    config_generation: u64,
    pub(crate) accessors: Accessors<T>,
    options: Vec<Rc<T>>,
    options_generation: u64,
    pub(crate) input_value: String,
    search: Debounced<String>,
    user_search: bool,
    search_settled: bool,
    pub(crate) focused: bool,
    pub(crate) menu_open: bool,
    pub(crate) selection: Selection<T>,
    pub(crate) menu_options: Vec<MenuOption<T>>,
    built_from: BuildKey,
    prev_menu_len: Option<usize>,
    pub(crate) window: MenuWindow,
    positioner: MenuPositioner,
    surface: Option<Box<dyn MenuSurface>>,
    pub(crate) callbacks: SelectCallbacks<T>,
    notified_selection: u64,
    now: u64,
}

impl<T: fmt::Debug> fmt::Debug for Select<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Select")
            .field("config", &self.config)
            .field("input_value", &self.input_value)
            .field("focused", &self.focused)
            .field("menu_open", &self.menu_open)
            .field("selection", &self.selection)
            .field("menu_options", &self.menu_options.len())
            .field("window", &self.window)
            .field("positioner", &self.positioner)
            .field("mounted", &self.surface.is_some())
            .field("callbacks", &self.callbacks)
            .finish_non_exhaustive()
    }
}

impl<T> Select<T> {
    /// Creates a control with no options and an empty value.
    pub fn new(config: SelectConfig, accessors: Accessors<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut select = Self {
            config_generation: 0,
            accessors,
            options: Vec::new(),
            options_generation: 0,
            input_value: String::new(),
            search: Debounced::new(String::new(), config.input_delay),
            user_search: false,
            search_settled: false,
            focused: false,
            menu_open: false,
            selection: Selection::default(),
            menu_options: Vec::new(),
            built_from: BuildKey::default(),
            prev_menu_len: None,
            window: MenuWindow::new(config.menu_item_size, config.menu_overscan_count),
            positioner: MenuPositioner::new(config.positioner_config()),
            surface: None,
            callbacks: SelectCallbacks::default(),
            notified_selection: 0,
            now: 0,
            config,
        };
        select.settle_initial();
        Ok(select)
    }

    /// Sets the initial options.
    #[must_use]
    pub fn with_options(mut self, options: impl IntoIterator<Item = T>) -> Self {
        self.options = options.into_iter().map(Rc::new).collect();
        self.options_generation += 1;
        self.settle_initial();
        self
    }

    /// Sets the initial value. No change notification is sent for it.
    #[must_use]
    pub fn with_value(mut self, records: impl IntoIterator<Item = Rc<T>>) -> Self {
        let selected = normalize_value(records, &self.accessors, self.config.is_multi);
        self.selection = Selection::new(selected);
        self.settle_initial();
        self
    }

    /// Installs host callbacks.
    #[must_use]
    pub fn with_callbacks(mut self, callbacks: SelectCallbacks<T>) -> Self {
        self.callbacks = callbacks;
        self
    }

    /// Builds the menu list without focus reconciliation or notifications.
    fn settle_initial(&mut self) {
        self.rebuild_menu_options();
        self.window.set_height(self.positioner.menu_height(self.menu_options.len()));
        self.notified_selection = self.selection.generation();
    }

    // --- Host-facing configuration ---------------------------------------

    /// The active configuration.
    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Replaces the configuration.
    ///
    /// On error the previous configuration stays in effect.
    pub fn set_config(&mut self, config: SelectConfig) -> Result<(), ConfigError> {
        config.validate()?;
        if config == self.config {
            return Ok(());
        }
        if self.search.set_delay(config.input_delay) {
            self.search_settled = true;
        }
        self.positioner
            .set_config(config.positioner_config(), self.surface.as_deref());
        self.window.set_item_size(config.menu_item_size);
        self.window.set_overscan_count(config.menu_overscan_count);
        if self.config.is_multi && !config.is_multi && self.selection.selected().len() > 1 {
            let records: Vec<Rc<T>> = self
                .selection
                .selected()
                .iter()
                .map(|o| Rc::clone(&o.data))
                .collect();
            self.selection
                .replace(normalize_value(records, &self.accessors, false));
        }
        self.config = config;
        self.config_generation += 1;
        if self.config.is_disabled && self.focused {
            self.lose_focus();
        }
        self.commit();
        Ok(())
    }

    /// Mutable access to the host callbacks.
    pub fn callbacks_mut(&mut self) -> &mut SelectCallbacks<T> {
        &mut self.callbacks
    }

    /// The raw options.
    pub fn options(&self) -> &[Rc<T>] {
        &self.options
    }

    /// Replaces the raw options.
    pub fn set_options(&mut self, options: impl IntoIterator<Item = T>) {
        self.set_shared_options(options.into_iter().map(Rc::new).collect());
    }

    /// Replaces the raw options with already shared records.
    pub fn set_shared_options(&mut self, options: Vec<Rc<T>>) {
        trace!(target: "understory_select", count = options.len(), "options replaced");
        self.options = options;
        self.options_generation += 1;
        self.commit();
    }

    /// Attaches the rendering layer's measurement surface.
    ///
    /// Resolves the menu placement and, with [`SelectConfig::auto_focus`],
    /// focuses the control.
    pub fn mount(&mut self, surface: Box<dyn MenuSurface>) {
        self.surface = Some(surface);
        self.positioner.update_placement(self.surface.as_deref());
        debug!(target: "understory_select", "mounted");
        if self.config.auto_focus && !self.config.is_disabled {
            self.gain_focus();
        }
        self.commit();
    }

    /// Detaches the surface and resets transient state.
    ///
    /// Search text and chip focus are dropped without a search notification,
    /// any scroll animation is cancelled, and an open menu is closed.
    pub fn unmount(&mut self) {
        self.search = Debounced::new(String::new(), self.config.input_delay);
        self.input_value.clear();
        self.user_search = false;
        self.search_settled = false;
        self.selection.clear_chip_focus();
        self.focused = false;
        self.menu_open = false;
        self.commit();
        self.surface = None;
        debug!(target: "understory_select", "unmounted");
    }

    /// Returns `true` while a surface is attached.
    pub fn is_mounted(&self) -> bool {
        self.surface.is_some()
    }

    // --- Time --------------------------------------------------------------

    /// Advances the controller's clock to `now`, settling debounced search text.
    pub fn advance(&mut self, now: u64) {
        self.now = self.now.max(now);
        if self.search.poll(self.now) {
            self.search_settled = true;
        }
        self.commit();
    }

    /// The time most recently passed to [`Select::advance`].
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Time at which pending search text will settle, if any.
    pub fn next_deadline(&self) -> Option<u64> {
        self.search.deadline()
    }

    /// Returns `true` while an opened menu awaits layout or a scroll-into-view
    /// animation is running.
    pub fn wants_animation_frame(&self) -> bool {
        self.positioner.wants_animation_frame()
    }

    /// Returns `true` if an opened menu has not been measured yet.
    pub fn wants_layout(&self) -> bool {
        self.positioner.wants_layout()
    }

    /// Measures the opened menu after the host has laid it out.
    ///
    /// Resolves placement and starts any scroll-into-view. Does nothing unless
    /// the menu opened since the last layout.
    pub fn layout(&mut self) {
        let events = self.positioner.layout(self.surface.as_deref());
        self.sync_window_height();
        for event in events {
            self.notify_menu(event);
        }
    }

    /// Runs one frame: a pending layout, or one step of the scroll-into-view
    /// animation.
    pub fn animation_frame(&mut self) {
        let surface = self.surface.as_deref_mut().map(|s| s as &mut dyn MenuSurface);
        let event = self.positioner.animation_frame(surface);
        self.sync_window_height();
        if let Some(event) = event {
            self.notify_menu(event);
        }
    }

    // --- Imperative API ------------------------------------------------------

    /// Empties the value.
    pub fn clear_value(&mut self) {
        if self.selection.clear() {
            debug!(target: "understory_select", "value cleared");
        }
        self.commit();
    }

    /// Replaces the value. In single mode only the first record is kept.
    pub fn set_value(&mut self, records: impl IntoIterator<Item = Rc<T>>) {
        let selected = normalize_value(records, &self.accessors, self.config.is_multi);
        self.selection.replace(selected);
        self.commit();
    }

    /// Opens (`Some(true)`), closes (`Some(false)`), or toggles (`None`) the menu.
    ///
    /// Opening focuses the control; closing blurs it.
    pub fn toggle_menu(&mut self, open: Option<bool>) {
        if open.unwrap_or(!self.menu_open) {
            if !self.focused {
                self.gain_focus();
            }
            self.open_menu_and_focus(crate::router::OpenFocus::First);
        } else if self.focused {
            self.lose_focus();
        } else {
            self.close_menu();
        }
        self.commit();
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selection.is_empty()
    }

    /// Returns `true` if the menu is open.
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    // --- Render state --------------------------------------------------------

    /// Returns `true` if the control has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The live search text.
    pub fn input_value(&self) -> &str {
        &self.input_value
    }

    /// The debounced search text.
    pub fn search_value(&self) -> &str {
        self.search.value()
    }

    /// The selected values, in selection order.
    pub fn selected(&self) -> &[SelectedOption<T>] {
        self.selection.selected()
    }

    /// The options currently shown in the menu.
    pub fn menu_options(&self) -> &[MenuOption<T>] {
        &self.menu_options
    }

    /// The option under keyboard focus.
    pub fn focused_option(&self) -> Option<&FocusedOption<T>> {
        self.selection.focused_option()
    }

    /// The chip under keyboard focus.
    pub fn focused_chip(&self) -> Option<&OptionKey> {
        self.selection.focused_chip()
    }

    /// The windowed list model for the menu.
    pub fn menu_window(&self) -> &MenuWindow {
        &self.window
    }

    /// Reports a user scroll of the menu list.
    pub fn set_menu_scroll_offset(&mut self, offset: f64) {
        self.window.set_scroll_offset(offset);
    }

    /// Height of the menu.
    pub fn menu_height(&self) -> f64 {
        self.positioner.menu_height(self.menu_options.len())
    }

    /// Top offset of the menu when it is placed above the control.
    pub fn menu_top(&self) -> Option<MenuTop> {
        self.positioner
            .menu_top(self.menu_options.len(), self.surface.as_deref())
    }

    /// Returns `true` if the menu is placed above the control.
    pub fn is_menu_above(&self) -> bool {
        self.positioner.is_top_position()
    }

    /// Whether the clear indicator is shown.
    pub fn show_clear(&self) -> bool {
        self.config.is_clearable && !self.config.is_disabled && !self.selection.is_empty()
    }

    /// Whether the text input rejects typing.
    pub fn input_read_only(&self) -> bool {
        self.config.is_disabled
            || !self.config.is_searchable
            || self.selection.focused_chip().is_some()
    }

    /// Whether the menu should be rendered at all.
    pub fn render_menu(&self) -> bool {
        !self.config.lazy_load_menu || self.menu_open
    }

    /// Whether the caret indicator toggles the menu on pointer-down.
    pub fn caret_toggles_menu(&self) -> bool {
        !self.config.is_disabled && !self.config.open_menu_on_click
    }

    // --- State helpers shared with the router --------------------------------

    /// Updates the search text. `user` marks text typed by the user, which is
    /// reported through `on_search_change` once it settles.
    pub(crate) fn set_input_value(&mut self, text: String, user: bool) {
        if user {
            self.user_search = true;
        }
        if self.search.set(text.clone(), self.now) {
            self.search_settled = true;
        }
        self.input_value = text;
    }

    pub(crate) fn clear_input_value(&mut self) {
        if !self.input_value.is_empty() {
            self.set_input_value(String::new(), false);
        }
    }

    pub(crate) fn close_menu(&mut self) {
        self.menu_open = false;
    }

    pub(crate) fn gain_focus(&mut self) {
        if self.focused {
            return;
        }
        if let Some(cb) = self.callbacks.on_input_focus.as_mut() {
            cb();
        }
        self.focused = true;
        trace!(target: "understory_select", "focused");
        if self.config.open_menu_on_focus {
            self.open_menu_and_focus(crate::router::OpenFocus::First);
        }
    }

    pub(crate) fn lose_focus(&mut self) {
        if !self.focused {
            return;
        }
        if let Some(cb) = self.callbacks.on_input_blur.as_mut() {
            cb();
        }
        self.focused = false;
        self.menu_open = false;
        self.selection.clear_chip_focus();
        self.set_input_value(String::new(), false);
        trace!(target: "understory_select", "blurred");
    }

    // --- Reconcile pipeline ----------------------------------------------------

    fn build_key(&self) -> BuildKey {
        let search = if self.config.is_async {
            String::new()
        } else {
            match self.config.filter_source {
                FilterSource::Debounced => self.search.value().clone(),
                FilterSource::Immediate => self.input_value.clone(),
            }
        };
        BuildKey {
            options: self.options_generation,
            selection: self.selection.generation(),
            config: self.config_generation,
            search,
        }
    }

    fn rebuild_menu_options(&mut self) {
        let key = self.build_key();
        self.menu_options = build_menu_options(
            &self.options,
            &key.search,
            self.selection.selected(),
            &self.accessors,
            &self.config.filter_settings(),
        );
        self.window.set_item_count(self.menu_options.len());
        trace!(
            target: "understory_select",
            count = self.menu_options.len(),
            search = %key.search,
            "menu options rebuilt"
        );
        self.built_from = key;
    }

    fn reconcile_focus(&mut self) {
        let len = self.menu_options.len();
        let refocus_first = len > 0
            && (self.config.is_async
                || len != self.options.len()
                || self.prev_menu_len == Some(0));
        if let Some(index) = self
            .selection
            .reconcile_option_focus(&self.menu_options, refocus_first)
        {
            self.window.scroll_to_index(index);
        }
        self.prev_menu_len = Some(len);
    }

    /// Applies pending state changes and notifies the host.
    pub(crate) fn commit(&mut self) {
        // Filter, then focus.
        if self.build_key() != self.built_from {
            self.rebuild_menu_options();
            self.reconcile_focus();
        }

        // Geometry.
        let mut menu_events: SmallVec<[PositionerEvent; 2]> = SmallVec::new();
        if self.menu_open != self.positioner.is_open() {
            menu_events = self
                .positioner
                .set_open(self.menu_open, self.surface.as_deref());
        }
        self.sync_window_height();

        // Notifications.
        for event in menu_events {
            self.notify_menu(event);
        }
        if self.selection.generation() != self.notified_selection {
            self.notified_selection = self.selection.generation();
            self.notify_option_change();
        }
        if self.search_settled {
            self.search_settled = false;
            if self.user_search {
                self.user_search = false;
                if let Some(cb) = self.callbacks.on_search_change.as_mut() {
                    cb(self.search.value());
                }
            }
        }
    }

    fn sync_window_height(&mut self) {
        self.window
            .set_height(self.positioner.menu_height(self.menu_options.len()));
    }

    fn notify_menu(&mut self, event: PositionerEvent) {
        let cb = match event {
            PositionerEvent::Opened => self.callbacks.on_menu_open.as_mut(),
            PositionerEvent::Closed => self.callbacks.on_menu_close.as_mut(),
        };
        if let Some(cb) = cb {
            cb();
        }
    }

    fn notify_option_change(&mut self) {
        let selected = self.selection.selected();
        let change = if self.config.is_multi {
            OptionChange::Multi(selected.iter().map(|o| Rc::clone(&o.data)).collect())
        } else {
            OptionChange::Single(selected.first().map(|o| Rc::clone(&o.data)))
        };
        if let Some(cb) = self.callbacks.on_option_change.as_mut() {
            cb(change);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::testing::{
        FakeSurface, Fruit, focused_name, fruits, menu_names, record, select, selected_names, take,
    };
    use crate::{ConfigError, FilterSource, Key, KeyEvent, MenuPosition, SelectConfig};

    fn press(s: &mut super::Select<Fruit>, key: Key) -> KeyEvent {
        let mut event = KeyEvent::new(key);
        s.handle_key_down(&mut event);
        event
    }

    const FIVE: &[&str] = &["Apple", "Banana", "Cherry", "Date", "Elderberry"];

    #[test]
    fn initial_value_is_not_reported() {
        let options: Vec<Rc<Fruit>> = fruits(&["A", "B"]).into_iter().map(Rc::new).collect();
        let mut s = select(SelectConfig::default(), &[]);
        s.set_shared_options(options.clone());
        let mut s = s.with_value(vec![Rc::clone(&options[1])]);
        let log = record(&mut s);
        s.focus();
        assert_eq!(selected_names(&s), ["B"]);
        assert_eq!(take(&log), ["focus"]);
        assert!(!s.is_empty());
    }

    #[test]
    fn clear_value_reports_and_drops_focus() {
        let mut s = select(SelectConfig::default(), &["A", "B"]);
        let log = record(&mut s);
        s.focus();
        press(&mut s, Key::ArrowDown);
        press(&mut s, Key::Enter);
        assert_eq!(selected_names(&s), ["A"]);
        take(&log);

        press(&mut s, Key::ArrowDown);
        assert_eq!(focused_name(&s), Some("A"));
        assert_eq!(take(&log), ["open"]);
        s.clear_value();
        assert!(s.is_empty());
        assert!(s.focused_option().is_none());
        assert_eq!(take(&log), ["change:"]);

        // Clearing an empty value reports nothing.
        s.clear_value();
        assert!(take(&log).is_empty());
    }

    #[test]
    fn set_value_keeps_first_record_in_single_mode() {
        let mut s = select(SelectConfig::default(), &[]);
        let log = record(&mut s);
        let records: Vec<Rc<Fruit>> = fruits(&["A", "B"]).into_iter().map(Rc::new).collect();
        s.set_value(records);
        assert_eq!(selected_names(&s), ["A"]);
        assert_eq!(take(&log), ["change:A"]);
    }

    #[test]
    fn search_settles_after_the_input_delay() {
        let config = SelectConfig {
            input_delay: Some(300),
            ..SelectConfig::default()
        };
        let mut s = select(config, &["Apple", "Banana", "Grape"]);
        let log = record(&mut s);
        s.advance(0);
        s.handle_input_change("a");
        s.advance(100);
        s.handle_input_change("ap");
        assert_eq!(take(&log), ["input:a", "open", "input:ap"]);
        assert_eq!(menu_names(&s), ["Apple", "Banana", "Grape"]);
        assert_eq!(s.next_deadline(), Some(400));

        s.advance(399);
        assert!(take(&log).is_empty());
        assert_eq!(s.search_value(), "");

        s.advance(400);
        assert_eq!(take(&log), ["search:ap"]);
        assert_eq!(menu_names(&s), ["Apple", "Grape"]);

        s.advance(1_000);
        assert!(take(&log).is_empty());
    }

    #[test]
    fn immediate_source_filters_before_the_notification() {
        let config = SelectConfig {
            input_delay: Some(300),
            filter_source: FilterSource::Immediate,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["Apple", "Banana", "Grape"]);
        let log = record(&mut s);
        s.handle_input_change("ban");
        assert_eq!(menu_names(&s), ["Banana"]);
        assert_eq!(take(&log), ["input:ban", "open"]);
        s.advance(300);
        assert_eq!(take(&log), ["search:ban"]);
    }

    #[test]
    fn programmatic_clear_is_not_reported_as_search() {
        let mut s = select(SelectConfig::default(), &["Apple", "Banana"]);
        let log = record(&mut s);
        s.focus();
        s.handle_input_change("b");
        assert_eq!(take(&log), ["focus", "input:b", "open", "search:b"]);
        press(&mut s, Key::Escape);
        assert_eq!(s.input_value(), "");
        assert_eq!(take(&log), ["close"]);
        assert_eq!(menu_names(&s), ["Apple", "Banana"]);
    }

    #[test]
    fn multi_mode_hides_selected_options() {
        let config = SelectConfig {
            is_multi: true,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["A", "B", "C"]);
        s.focus();
        press(&mut s, Key::ArrowDown);
        s.handle_option_click(1);
        assert_eq!(selected_names(&s), ["B"]);
        assert_eq!(menu_names(&s), ["A", "C"]);
    }

    #[test]
    fn focus_follows_filtering() {
        let mut s = select(SelectConfig::default(), FIVE);
        s.focus();
        press(&mut s, Key::ArrowDown);
        press(&mut s, Key::ArrowDown);
        press(&mut s, Key::ArrowDown);
        assert_eq!(focused_name(&s), Some("Cherry"));

        // A shorter list moves focus to the first match.
        s.handle_input_change("e");
        assert_eq!(menu_names(&s), ["Apple", "Cherry", "Date", "Elderberry"]);
        assert_eq!(focused_name(&s), Some("Apple"));
        assert_eq!(s.focused_option().map(|f| f.index), Some(0));

        // Nothing matches: no focus.
        s.handle_input_change("zz");
        assert!(s.menu_options().is_empty());
        assert!(s.focused_option().is_none());

        // Coming back from empty focuses the first option again.
        s.handle_input_change("");
        assert_eq!(menu_names(&s).len(), 5);
        assert_eq!(focused_name(&s), Some("Apple"));
    }

    #[test]
    fn focus_index_survives_selection_refresh() {
        let config = SelectConfig {
            is_multi: true,
            hide_selected_options: Some(false),
            close_menu_on_select: false,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["A", "B", "C"]);
        s.focus();
        press(&mut s, Key::ArrowDown);
        press(&mut s, Key::ArrowDown);
        press(&mut s, Key::Enter);
        assert!(s.is_menu_open());
        let focused = s.focused_option().expect("focus kept");
        assert_eq!(focused.index, 1);
        assert!(focused.option.is_selected);
    }

    #[test]
    fn async_option_updates_focus_the_first_option() {
        let config = SelectConfig {
            is_async: true,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["A", "B", "C"]);
        s.focus();
        press(&mut s, Key::ArrowUp);
        assert_eq!(focused_name(&s), Some("C"));
        s.handle_input_change("zzz");
        // No local filtering in async mode.
        assert_eq!(menu_names(&s), ["A", "B", "C"]);
        s.set_options(fruits(&["X", "Y"]));
        assert_eq!(focused_name(&s), Some("X"));
    }

    #[test]
    fn menu_height_tracks_option_count() {
        let mut s = select(SelectConfig::default(), &["A", "B", "C"]);
        assert_eq!(s.menu_height(), 105.0);
        assert_eq!(s.menu_window().height(), 105.0);
        s.set_options(fruits(&["A"; 20]));
        assert_eq!(s.menu_height(), 300.0);
        assert_eq!(s.menu_window().content_height(), 700.0);
        assert_eq!(s.menu_window().visible_range().items, 0..10);
    }

    #[test]
    fn top_placement_reports_an_offset() {
        let config = SelectConfig {
            menu_position: MenuPosition::Top,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["A", "B", "C"]);
        s.mount(Box::new(FakeSurface::clipped()));
        assert!(s.is_menu_above());
        let top = s.menu_top().expect("placed above");
        assert_eq!(top.base, -145.0);
        assert_eq!(top.adjust, 8.0);
        assert_eq!(top.offset(), -137.0);

        let below = select(SelectConfig::default(), &["A"]);
        assert!(below.menu_top().is_none());
    }

    #[test]
    fn clipped_menu_scrolls_into_view_before_reporting_open() {
        let surface = FakeSurface::clipped();
        let scroll_top = Rc::clone(&surface.scroll_top);
        let mut s = select(SelectConfig::default(), &["A", "B", "C"]);
        s.mount(Box::new(surface));
        let log = record(&mut s);

        s.focus();
        press(&mut s, Key::ArrowDown);
        assert!(s.is_menu_open());
        assert!(s.wants_layout());
        assert_eq!(take(&log), ["focus"]);

        s.layout();
        assert!(!s.wants_layout());
        assert!(s.wants_animation_frame());
        let mut frames = 0;
        while s.wants_animation_frame() {
            s.animation_frame();
            frames += 1;
        }
        assert_eq!(frames, 60);
        assert_eq!(scroll_top.get(), 204.0);
        assert_eq!(take(&log), ["open"]);

        press(&mut s, Key::Escape);
        assert_eq!(take(&log), ["close"]);
    }

    #[test]
    fn closing_mid_animation_stops_scrolling() {
        let surface = FakeSurface::clipped();
        let scroll_top = Rc::clone(&surface.scroll_top);
        let mut s = select(SelectConfig::default(), &["A", "B", "C"]);
        s.mount(Box::new(surface));
        let log = record(&mut s);

        s.focus();
        press(&mut s, Key::ArrowDown);
        s.animation_frame();
        s.animation_frame();
        let partial = scroll_top.get();
        assert!(partial > 0.0 && partial < 204.0);

        s.blur();
        assert!(!s.wants_animation_frame());
        assert_eq!(take(&log), ["focus", "blur", "open", "close"]);
        s.animation_frame();
        assert_eq!(scroll_top.get(), partial);
    }

    #[test]
    fn lazily_rendered_menu_is_measured_after_layout() {
        let config = SelectConfig {
            lazy_load_menu: true,
            ..SelectConfig::default()
        };
        let surface = FakeSurface::clipped();
        surface.menu_rendered.set(false);
        let rendered = Rc::clone(&surface.menu_rendered);
        let scroll_top = Rc::clone(&surface.scroll_top);
        let mut s = select(config, &["A", "B", "C", "D", "E", "F", "G", "H", "I"]);
        s.mount(Box::new(surface));
        let log = record(&mut s);

        s.focus();
        press(&mut s, Key::ArrowDown);
        assert!(s.render_menu());
        assert!(s.wants_animation_frame());

        // The host renders the menu, then keeps driving frames.
        rendered.set(true);
        s.advance(16);
        let mut frames = 0;
        while s.wants_animation_frame() && frames < 100 {
            s.animation_frame();
            frames += 1;
        }
        // One layout frame, then the scroll.
        assert_eq!(frames, 61);
        assert_eq!(scroll_top.get(), 204.0);
        assert_eq!(take(&log), ["focus", "open"]);
    }

    #[test]
    fn toggle_menu_focuses_and_blurs() {
        let mut s = select(SelectConfig::default(), &["A", "B"]);
        let log = record(&mut s);
        s.toggle_menu(None);
        assert!(s.is_menu_open());
        assert!(s.is_focused());
        assert_eq!(focused_name(&s), Some("A"));
        s.toggle_menu(None);
        assert!(!s.is_menu_open());
        assert!(!s.is_focused());
        assert_eq!(take(&log), ["focus", "open", "blur", "close"]);
        s.toggle_menu(Some(false));
        assert!(take(&log).is_empty());
    }

    #[test]
    fn unmount_resets_transient_state() {
        let mut s = select(SelectConfig::default(), &["Apple", "Banana"]);
        s.mount(Box::new(FakeSurface {
            menu: kurbo::Rect::new(0.0, 100.0, 300.0, 170.0),
            ..FakeSurface::clipped()
        }));
        let log = record(&mut s);
        s.focus();
        s.handle_input_change("ban");
        s.layout();
        assert_eq!(take(&log), ["focus", "input:ban", "open"]);
        s.unmount();
        assert!(!s.is_mounted());
        assert!(!s.is_menu_open());
        assert_eq!(s.input_value(), "");
        assert_eq!(menu_names(&s), ["Apple", "Banana"]);
        assert_eq!(take(&log), ["close"]);
    }

    #[test]
    fn auto_focus_applies_on_mount() {
        let config = SelectConfig {
            auto_focus: true,
            open_menu_on_focus: true,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["A", "B"]);
        assert!(!s.is_focused());
        s.mount(Box::new(FakeSurface {
            menu: kurbo::Rect::new(0.0, 100.0, 300.0, 170.0),
            ..FakeSurface::clipped()
        }));
        assert!(s.is_focused());
        assert!(s.is_menu_open());
        assert_eq!(focused_name(&s), Some("A"));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let bad = SelectConfig {
            menu_item_size: -1.0,
            ..SelectConfig::default()
        };
        assert!(matches!(
            super::Select::<Fruit>::new(bad.clone(), crate::Accessors::default()),
            Err(ConfigError::InvalidItemSize(_))
        ));

        let mut s = select(SelectConfig::default(), &["A"]);
        assert_eq!(s.set_config(bad), Err(ConfigError::InvalidItemSize(-1.0)));
        assert_eq!(s.config().menu_item_size, 35.0);
    }

    #[test]
    fn config_changes_rebuild_the_menu() {
        let mut s = select(SelectConfig::default(), &["Crème", "Cream"]);
        s.handle_input_change("creme");
        assert!(s.menu_options().is_empty());
        let config = SelectConfig {
            filter_ignore_accents: true,
            ..s.config().clone()
        };
        s.set_config(config).expect("valid");
        assert_eq!(menu_names(&s), ["Crème"]);
    }

    #[test]
    fn leaving_multi_mode_keeps_the_first_value() {
        let config = SelectConfig {
            is_multi: true,
            hide_selected_options: Some(false),
            ..SelectConfig::default()
        };
        let mut s = select(config.clone(), &["A", "B", "C"]);
        s.handle_option_click(0);
        s.handle_option_click(1);
        assert_eq!(selected_names(&s), ["A", "B"]);

        let log = record(&mut s);
        let single = SelectConfig {
            is_multi: false,
            ..config
        };
        s.set_config(single).expect("valid");
        assert_eq!(selected_names(&s), ["A"]);
        assert_eq!(take(&log), ["change:A"]);
        let flags: Vec<bool> = s.menu_options().iter().map(|o| o.is_selected).collect();
        assert_eq!(flags, [true, false, false]);
    }

    #[test]
    fn render_flags() {
        let config = SelectConfig {
            is_clearable: true,
            lazy_load_menu: true,
            is_searchable: false,
            ..SelectConfig::default()
        };
        let mut s = select(config, &["A"]);
        assert!(!s.render_menu());
        assert!(!s.show_clear());
        assert!(s.input_read_only());
        s.toggle_menu(Some(true));
        assert!(s.render_menu());
        press(&mut s, Key::Enter);
        assert!(s.show_clear());
    }
}
