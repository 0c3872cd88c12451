use log::warn;
use web_sys::{Document, Element, KeyboardEvent};

use crate::config;
use crate::dom;
use crate::error::Result;

/// Where Tab should land instead of its default target, if anywhere.
///
/// Shift+Tab on the first element wraps to the last, Tab on the last wraps to
/// the first. Every other press is left alone.
pub fn wrap_target(len: usize, active: Option<usize>, shift: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    match (active, shift) {
        (Some(0), true) => Some(last),
        (Some(i), false) if i == last => Some(0),
        _ => None,
    }
}

/// Something the trap can move focus to: HTML and SVG elements alike.
pub trait Focusable: PartialEq {
    fn focus(&self) -> Result<()>;
}

impl Focusable for Element {
    fn focus(&self) -> Result<()> {
        dom::focus(self)
    }
}

/// Focusable descendants of a container, captured once.
pub struct FocusTrap<E: Focusable = Element> {
    focusables: Vec<E>,
}

impl<E: Focusable> FocusTrap<E> {
    pub fn new(focusables: Vec<E>) -> Self {
        Self { focusables }
    }

    pub fn first(&self) -> Option<&E> {
        self.focusables.first()
    }

    pub fn len(&self) -> usize {
        self.focusables.len()
    }

    /// Moves focus for a Tab press from `active`. Returns whether the press
    /// was redirected, in which case its default must be prevented.
    pub fn on_tab(&self, active: Option<&E>, shift: bool) -> Result<bool> {
        let position =
            active.and_then(|active| self.focusables.iter().position(|candidate| candidate == active));
        let Some(target) = wrap_target(self.len(), position, shift) else {
            return Ok(false);
        };
        if let Some(element) = self.focusables.get(target) {
            element.focus()?;
        }
        Ok(true)
    }
}

impl FocusTrap<Element> {
    pub fn snapshot(container: &Element) -> Self {
        Self::new(dom::select_all_in(container, config::FOCUSABLE))
    }

    pub fn handle_key(&self, document: &Document, event: &KeyboardEvent) {
        if event.key() != "Tab" {
            return;
        }
        let active = document.active_element();
        match self.on_tab(active.as_ref(), event.shift_key()) {
            Ok(true) => event.prevent_default(),
            Ok(false) => {}
            Err(err) => {
                event.prevent_default();
                warn!("focus trap could not move focus: {}", err);
            }
        }
    }
}
