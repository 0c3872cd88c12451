//! Thin helpers over `web-sys` shared by every component.
//!
//! Lookups return `Option`/`Vec` rather than errors: markup that isn't on the
//! page simply switches the matching feature off.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, NodeList, SvgElement, Window};

use crate::config;
use crate::error::{Result, UiError};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(UiError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(UiError::NoDocument)
}

pub fn select(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

pub fn select_in(root: &Element, selector: &str) -> Option<Element> {
    root.query_selector(selector).ok().flatten()
}

pub fn select_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(elements)
        .unwrap_or_default()
}

fn elements(list: NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Focuses HTML and SVG elements; anything else is left alone.
pub fn focus(element: &Element) -> Result<()> {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        html.focus()?;
    } else if let Some(svg) = element.dyn_ref::<SvgElement>() {
        svg.focus()?;
    }
    Ok(())
}

pub fn set_hidden(element: &Element, hidden: bool) -> Result<()> {
    element
        .class_list()
        .toggle_with_force(config::HIDDEN_CLASS, hidden)?;
    Ok(())
}

pub fn set_expanded(element: &Element, expanded: bool) -> Result<()> {
    element.set_attribute(config::ARIA_EXPANDED, if expanded { "true" } else { "false" })?;
    Ok(())
}

pub fn is_expanded(element: &Element) -> bool {
    element.get_attribute(config::ARIA_EXPANDED).as_deref() == Some("true")
}

/// Attaches a listener that lives as long as the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<()>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

/// A listener that can be detached again, used for the menu's focus trap.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn attach<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Self>
    where
        F: FnMut(Event) + 'static,
    {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref());
    }
}
