// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Option records, accessors, and the normalized option shapes.

use alloc::rc::Rc;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use tracing::warn;

/// A label or value extracted from an option record.
///
/// Hosts may key options by integers or strings; both compare and hash by
/// content.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OptionKey {
    /// An integer key.
    Int(i64),
    /// A string key.
    Str(String),
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for OptionKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for OptionKey {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<u32> for OptionKey {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for OptionKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for OptionKey {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Records that know their own label, value, and disabled flag.
///
/// Implementing this lets [`Accessors::default`] be used for the record type.
pub trait OptionData {
    /// Text shown for the option.
    fn label(&self) -> OptionKey;

    /// Identity of the option; equal values mean the same option.
    fn value(&self) -> OptionKey;

    /// Whether the option can be selected.
    fn is_disabled(&self) -> bool {
        false
    }
}

type KeyFn<T> = Rc<dyn Fn(&T) -> OptionKey>;
type FlagFn<T> = Rc<dyn Fn(&T) -> bool>;
type FilterStringFn<T> = Rc<dyn Fn(&MenuOption<T>) -> String>;

/// Extraction functions applied to host option records.
///
/// ```rust
/// use understory_select::{Accessors, OptionKey};
///
/// struct City {
///     name: &'static str,
///     id: i64,
///     closed: bool,
/// }
///
/// let accessors = Accessors::new(|c: &City| c.name.into(), |c: &City| c.id.into())
///     .with_is_disabled(|c: &City| c.closed);
///
/// let oslo = City { name: "Oslo", id: 7, closed: false };
/// assert_eq!(accessors.label(&oslo), OptionKey::from("Oslo"));
/// assert_eq!(accessors.value(&oslo), OptionKey::Int(7));
/// assert!(!accessors.is_disabled(&oslo));
/// ```
pub struct Accessors<T> {
    label: KeyFn<T>,
    value: KeyFn<T>,
    is_disabled: FlagFn<T>,
    filter_string: Option<FilterStringFn<T>>,
}

impl<T> Clone for Accessors<T> {
    fn clone(&self) -> Self {
        Self {
            label: Rc::clone(&self.label),
            value: Rc::clone(&self.value),
            is_disabled: Rc::clone(&self.is_disabled),
            filter_string: self.filter_string.clone(),
        }
    }
}

impl<T> fmt::Debug for Accessors<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessors")
            .field("custom_filter_string", &self.filter_string.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Accessors<T> {
    /// Creates accessors from label and value extractors. No option is disabled.
    pub fn new(
        label: impl Fn(&T) -> OptionKey + 'static,
        value: impl Fn(&T) -> OptionKey + 'static,
    ) -> Self {
        Self {
            label: Rc::new(label),
            value: Rc::new(value),
            is_disabled: Rc::new(|_| false),
            filter_string: None,
        }
    }

    /// Replaces the disabled-flag extractor.
    #[must_use]
    pub fn with_is_disabled(mut self, is_disabled: impl Fn(&T) -> bool + 'static) -> Self {
        self.is_disabled = Rc::new(is_disabled);
        self
    }

    /// Replaces the text that search input is matched against.
    ///
    /// Defaults to the option's label.
    #[must_use]
    pub fn with_filter_string(
        mut self,
        filter_string: impl Fn(&MenuOption<T>) -> String + 'static,
    ) -> Self {
        self.filter_string = Some(Rc::new(filter_string));
        self
    }

    /// Label of a record.
    pub fn label(&self, data: &T) -> OptionKey {
        (self.label)(data)
    }

    /// Value of a record.
    pub fn value(&self, data: &T) -> OptionKey {
        (self.value)(data)
    }

    /// Disabled flag of a record.
    pub fn is_disabled(&self, data: &T) -> bool {
        (self.is_disabled)(data)
    }

    /// Text the search input is matched against.
    pub fn filter_string(&self, option: &MenuOption<T>) -> String {
        match &self.filter_string {
            Some(f) => f(option),
            None => option.label.to_string(),
        }
    }

    /// Normalizes one record into a selected option.
    pub fn selected(&self, data: Rc<T>) -> SelectedOption<T> {
        SelectedOption {
            value: self.value(&data),
            label: self.label(&data),
            data,
        }
    }
}

impl<T: OptionData + 'static> Default for Accessors<T> {
    fn default() -> Self {
        Self::new(T::label, T::value).with_is_disabled(T::is_disabled)
    }
}

/// An option as presented in the menu.
#[derive(Debug)]
pub struct MenuOption<T> {
    /// Label, from the label accessor.
    pub label: OptionKey,
    /// Value, from the value accessor.
    pub value: OptionKey,
    /// The host record.
    pub data: Rc<T>,
    /// Whether the option can be selected.
    pub is_disabled: bool,
    /// Whether the option's value is currently selected.
    pub is_selected: bool,
}

impl<T> Clone for MenuOption<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            value: self.value.clone(),
            data: Rc::clone(&self.data),
            is_disabled: self.is_disabled,
            is_selected: self.is_selected,
        }
    }
}

impl<T> MenuOption<T> {
    /// The selected-option form of this option.
    pub fn to_selected(&self) -> SelectedOption<T> {
        SelectedOption {
            value: self.value.clone(),
            label: self.label.clone(),
            data: Rc::clone(&self.data),
        }
    }
}

/// A member of the current value.
#[derive(Debug)]
pub struct SelectedOption<T> {
    /// Value, from the value accessor.
    pub value: OptionKey,
    /// Label, from the label accessor.
    pub label: OptionKey,
    /// The host record.
    pub data: Rc<T>,
}

impl<T> Clone for SelectedOption<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            label: self.label.clone(),
            data: Rc::clone(&self.data),
        }
    }
}

/// The option under keyboard focus, with its index in the menu list.
#[derive(Debug)]
pub struct FocusedOption<T> {
    /// Index into the current menu options.
    pub index: usize,
    /// A snapshot of the option at `index`.
    pub option: MenuOption<T>,
}

impl<T> Clone for FocusedOption<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            option: self.option.clone(),
        }
    }
}

/// Normalizes a raw value into selected options.
///
/// Records are kept in order. In single mode only the first record is kept.
pub fn normalize_value<T>(
    records: impl IntoIterator<Item = Rc<T>>,
    accessors: &Accessors<T>,
    is_multi: bool,
) -> Vec<SelectedOption<T>> {
    let mut out: Vec<SelectedOption<T>> = records
        .into_iter()
        .map(|data| accessors.selected(data))
        .collect();
    if !is_multi && out.len() > 1 {
        warn!(
            target: "understory_select",
            count = out.len(),
            "single-select value has several records; keeping the first"
        );
        out.truncate(1);
    }
    out
}
