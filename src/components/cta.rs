use std::rc::Rc;

use web_sys::Document;

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::config;
use crate::dom;
use crate::error::Result;
use crate::utm::utm_params;

pub fn click_event(href: Option<String>, search: &str) -> AnalyticsEvent {
    AnalyticsEvent::cta_clicked(href, utm_params(search))
}

/// Reports CTA clicks. Navigation is left to the browser.
pub fn mount(document: &Document, sink: Rc<dyn AnalyticsSink>) -> Result<usize> {
    let window = dom::window()?;
    let links = dom::select_all(document, config::CTA_LINK);
    for link in &links {
        let window = window.clone();
        let sink = sink.clone();
        let anchor = link.clone();
        dom::listen(link, "click", move |_| {
            let search = window.location().search().unwrap_or_default();
            sink.report(&click_event(anchor.get_attribute("href"), &search));
        })?;
    }
    Ok(links.len())
}
