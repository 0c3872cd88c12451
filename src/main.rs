use std::rc::Rc;

use log::{debug, info, warn};
use web_sys::Document;

mod analytics;
mod config;
mod dom;
mod error;
mod utm;
mod components {
    pub mod accordion;
    pub mod cta;
    pub mod deferred;
    pub mod email;
    pub mod focus_trap;
    pub mod menu;
    pub mod scroll;
    pub mod slider;
}

use analytics::{AnalyticsSink, ConsoleSink};
use components::{accordion, cta, deferred, email, menu, scroll, slider};
use error::Result;

fn report<T: std::fmt::Debug>(feature: &str, outcome: Result<T>) {
    match outcome {
        Ok(wired) => debug!("{}: {:?}", feature, wired),
        Err(err) => warn!("{} not wired: {}", feature, err),
    }
}

/// Wires every interactive feature. Each one is independent, so a failure is
/// logged and the rest still get wired.
fn init_page(document: &Document) {
    let sink: Rc<dyn AnalyticsSink> = Rc::new(ConsoleSink);

    report("mobile menu", menu::mount(document));
    report("anchor links", scroll::mount_anchors(document));
    report("back to top", scroll::mount_back_to_top(document));
    report("testimonial slider", slider::mount(document));
    report("faq items", accordion::mount(document));
    report("email form", email::mount(document, sink.clone()));
    report("cta links", cta::mount(document, sink));
    info!("Page interactions ready");
}

fn load_deferred_assets(document: &Document) {
    report("deferred media", deferred::run(document));
}

fn start() -> Result<()> {
    let window = dom::window()?;
    let document = dom::document()?;

    if document.ready_state() == "loading" {
        let ready = document.clone();
        dom::listen(&document, "DOMContentLoaded", move |_| init_page(&ready))?;
    } else {
        init_page(&document);
    }

    if document.ready_state() == "complete" {
        load_deferred_assets(&document);
    } else {
        let loaded = document.clone();
        dom::listen(&window, "load", move |_| load_deferred_assets(&loaded))?;
    }
    Ok(())
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting landing page interactions");
    if let Err(err) = start() {
        warn!("could not start: {}", err);
    }
}
