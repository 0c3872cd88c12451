use log::{debug, warn};
use wasm_bindgen::JsValue;
use web_sys::{Document, ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions, Window};

use crate::config;
use crate::dom;
use crate::error::Result;

/// Element id named by an in-page href, if it names one at all.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

pub fn back_to_top_visible(scroll_y: f64) -> bool {
    scroll_y > config::BACK_TO_TOP_THRESHOLD_PX
}

/// Applies the button's visibility for `scroll_y`; a failed update is logged.
pub fn sync_back_to_top<F>(scroll_y: f64, set_hidden: F) -> bool
where
    F: FnOnce(bool) -> Result<()>,
{
    match set_hidden(!back_to_top_visible(scroll_y)) {
        Ok(()) => true,
        Err(err) => {
            warn!("back-to-top visibility not updated: {}", err);
            false
        }
    }
}

fn scroll_to_fragment(window: &Window, document: &Document, href: &str) -> Result<()> {
    let Some(target) = fragment_id(href).and_then(|id| document.get_element_by_id(id)) else {
        debug!("no scroll target for {}", href);
        return Ok(());
    };

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
    window
        .history()?
        .push_state_with_url(&JsValue::NULL, "", Some(href))?;
    Ok(())
}

pub fn mount_anchors(document: &Document) -> Result<usize> {
    let window = dom::window()?;
    let links = dom::select_all(document, config::ANCHOR_LINKS);
    for link in &links {
        let window = window.clone();
        let document = document.clone();
        let anchor = link.clone();
        dom::listen(link, "click", move |e| {
            e.prevent_default();
            let href = anchor.get_attribute("href").unwrap_or_default();
            if let Err(err) = scroll_to_fragment(&window, &document, &href) {
                warn!("smooth scroll to {} failed: {}", href, err);
            }
        })?;
    }
    Ok(links.len())
}

pub fn mount_back_to_top(document: &Document) -> Result<bool> {
    let Some(button) = dom::select(document, config::BACK_TO_TOP) else {
        return Ok(false);
    };
    let window = dom::window()?;

    {
        let window = window.clone();
        dom::listen(&button, "click", move |e| {
            e.prevent_default();
            let options = ScrollToOptions::new();
            options.set_top(0.0);
            options.set_behavior(ScrollBehavior::Smooth);
            window.scroll_to_with_scroll_to_options(&options);
        })?;
    }

    let scroll_window = window.clone();
    dom::listen(&window, "scroll", move |_| {
        let scroll_y = scroll_window.scroll_y().unwrap_or(0.0);
        sync_back_to_top(scroll_y, |hidden| dom::set_hidden(&button, hidden));
    })?;
    Ok(true)
}
