// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for controller tests.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use kurbo::Rect;
use understory_menu_geometry::{Margins, MenuSurface, ScrollParent};

use crate::{Accessors, OptionChange, OptionData, OptionKey, Select, SelectConfig};

#[derive(Debug, PartialEq)]
pub(crate) struct Fruit {
    pub(crate) name: &'static str,
    pub(crate) disabled: bool,
}

impl OptionData for Fruit {
    fn label(&self) -> OptionKey {
        self.name.into()
    }

    fn value(&self) -> OptionKey {
        self.name.into()
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

pub(crate) fn fruits(names: &[&'static str]) -> Vec<Fruit> {
    names
        .iter()
        .map(|&name| Fruit {
            name,
            disabled: false,
        })
        .collect()
}

pub(crate) fn select(config: SelectConfig, names: &[&'static str]) -> Select<Fruit> {
    Select::new(config, Accessors::default())
        .expect("valid config")
        .with_options(fruits(names))
}

pub(crate) fn selected_names(select: &Select<Fruit>) -> Vec<&'static str> {
    select.selected().iter().map(|o| o.data.name).collect()
}

pub(crate) fn menu_names(select: &Select<Fruit>) -> Vec<&'static str> {
    select.menu_options().iter().map(|o| o.data.name).collect()
}

pub(crate) fn focused_name(select: &Select<Fruit>) -> Option<&'static str> {
    select.focused_option().map(|f| f.option.data.name)
}

/// Records every callback as a short string.
pub(crate) type Log = Rc<RefCell<Vec<String>>>;

pub(crate) fn record(select: &mut Select<Fruit>) -> Log {
    let log: Log = Rc::default();
    let callbacks = select.callbacks_mut();

    let l = Rc::clone(&log);
    callbacks.on_option_change = Some(Box::new(move |change: OptionChange<Fruit>| {
        let names: Vec<&str> = match change {
            OptionChange::Single(one) => one.iter().map(|f| f.name).collect(),
            OptionChange::Multi(all) => all.iter().map(|f| f.name).collect(),
        };
        l.borrow_mut().push(format!("change:{}", names.join(",")));
    }));
    let l = Rc::clone(&log);
    callbacks.on_search_change = Some(Box::new(move |text: &str| {
        l.borrow_mut().push(format!("search:{text}"));
    }));
    let l = Rc::clone(&log);
    callbacks.on_input_change = Some(Box::new(move |text: &str| {
        l.borrow_mut().push(format!("input:{text}"));
    }));
    let l = Rc::clone(&log);
    callbacks.on_input_focus = Some(Box::new(move || l.borrow_mut().push("focus".into())));
    let l = Rc::clone(&log);
    callbacks.on_input_blur = Some(Box::new(move || l.borrow_mut().push("blur".into())));
    let l = Rc::clone(&log);
    callbacks.on_menu_open = Some(Box::new(move || l.borrow_mut().push("open".into())));
    let l = Rc::clone(&log);
    callbacks.on_menu_close = Some(Box::new(move || l.borrow_mut().push("close".into())));
    log
}

pub(crate) fn take(log: &Log) -> Vec<String> {
    core::mem::take(&mut *log.borrow_mut())
}

/// A measurable surface whose scroll offset and menu rendering can be observed
/// and toggled after it has been handed to the controller.
#[derive(Debug)]
pub(crate) struct FakeSurface {
    pub(crate) menu: Rect,
    pub(crate) menu_rendered: Rc<Cell<bool>>,
    pub(crate) control: Rect,
    pub(crate) parent_height: f64,
    pub(crate) viewport: f64,
    pub(crate) scroll_top: Rc<Cell<f64>>,
}

impl FakeSurface {
    /// A menu spanning 700..1000 in an 800px viewport, inside a tall parent.
    pub(crate) fn clipped() -> Self {
        Self {
            menu: Rect::new(0.0, 700.0, 300.0, 1000.0),
            menu_rendered: Rc::new(Cell::new(true)),
            control: Rect::new(0.0, 660.0, 300.0, 700.0),
            parent_height: 2000.0,
            viewport: 800.0,
            scroll_top: Rc::default(),
        }
    }
}

impl MenuSurface for FakeSurface {
    fn menu_rect(&self) -> Option<Rect> {
        self.menu_rendered.get().then_some(self.menu)
    }

    fn control_rect(&self) -> Option<Rect> {
        Some(self.control)
    }

    fn menu_margins(&self) -> Margins {
        Margins::new(4.0, 4.0)
    }

    fn scroll_parent(&self) -> Option<ScrollParent> {
        Some(ScrollParent {
            rect: Rect::new(0.0, 0.0, 300.0, self.parent_height),
            scroll_top: self.scroll_top.get(),
        })
    }

    fn viewport_height(&self) -> f64 {
        self.viewport
    }

    fn set_scroll_top(&mut self, top: f64) {
        self.scroll_top.set(top);
    }
}
