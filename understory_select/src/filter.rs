// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Search-text normalization and menu option building.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use unicode_normalization::UnicodeNormalization;

use crate::option::{Accessors, MenuOption, OptionKey, SelectedOption};

/// Where in an option's filter string the search text must match.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum FilterMatch {
    /// Anywhere in the string.
    #[default]
    Any,
    /// At the start of the string.
    Start,
}

/// Settings for [`build_menu_options`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FilterSettings {
    /// Where the search text must match.
    pub match_from: FilterMatch,
    /// Lowercase both sides before comparing.
    pub ignore_case: bool,
    /// Strip diacritics from both sides before comparing.
    pub ignore_accents: bool,
    /// Skip text filtering; the host filters options itself.
    pub is_async: bool,
    /// Leave selected options out of the menu.
    pub hide_selected: bool,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            match_from: FilterMatch::Any,
            ignore_case: true,
            ignore_accents: false,
            is_async: false,
            hide_selected: false,
        }
    }
}

/// Combining Diacritical Marks block, which canonical decomposition splits
/// accents into.
fn is_combining_diacritic(c: char) -> bool {
    ('\u{300}'..='\u{36f}').contains(&c)
}

/// Normalizes text for matching: trims, then optionally lowercases and strips
/// accents.
///
/// ```rust
/// use understory_select::format_filter_str;
///
/// assert_eq!(format_filter_str("  Crème Brûlée ", true, true), "creme brulee");
/// assert_eq!(format_filter_str("Crème", false, false), "Crème");
/// ```
pub fn format_filter_str(text: &str, ignore_case: bool, ignore_accents: bool) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len());
    let push = |out: &mut String, c: char| {
        if ignore_case {
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    };
    if ignore_accents {
        for c in trimmed.nfd().filter(|c| !is_combining_diacritic(*c)) {
            push(&mut out, c);
        }
    } else {
        for c in trimmed.chars() {
            push(&mut out, c);
        }
    }
    out
}

/// Builds the displayed menu list from the raw options.
///
/// Each option is normalized through `accessors` and marked selected when its
/// value is in `selected`. Selected options are left out when
/// [`FilterSettings::hide_selected`] is set. Unless the control is async, an
/// option is kept only when its formatted filter string contains the formatted
/// `search` text (or starts with it, for [`FilterMatch::Start`]). Empty search
/// text keeps everything.
pub fn build_menu_options<T>(
    options: &[Rc<T>],
    search: &str,
    selected: &[SelectedOption<T>],
    accessors: &Accessors<T>,
    settings: &FilterSettings,
) -> Vec<MenuOption<T>> {
    let needle = if settings.is_async {
        String::new()
    } else {
        format_filter_str(search, settings.ignore_case, settings.ignore_accents)
    };
    let selected_values: HashSet<&OptionKey> = selected.iter().map(|o| &o.value).collect();

    let mut out = Vec::with_capacity(options.len());
    for data in options {
        let value = accessors.value(data);
        let is_selected = selected_values.contains(&value);
        if is_selected && settings.hide_selected {
            continue;
        }
        let option = MenuOption {
            label: accessors.label(data),
            value,
            data: Rc::clone(data),
            is_disabled: accessors.is_disabled(data),
            is_selected,
        };
        if !needle.is_empty() {
            let haystack = format_filter_str(
                &accessors.filter_string(&option),
                settings.ignore_case,
                settings.ignore_accents,
            );
            let matched = match settings.match_from {
                FilterMatch::Any => haystack.contains(needle.as_str()),
                FilterMatch::Start => haystack.starts_with(needle.as_str()),
            };
            if !matched {
                continue;
            }
        }
        out.push(option);
    }
    out
}
