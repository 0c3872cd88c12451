use log::debug;
use web_sys::{Document, Element};

use crate::config;
use crate::dom;
use crate::error::Result;

/// Media whose real source is parked in a marker attribute until page load.
pub trait DeferredMedia {
    fn pending_source(&self) -> Option<String>;

    /// Moves `source` into the live attribute and drops the marker.
    fn activate(&self, source: &str) -> Result<()>;
}

impl DeferredMedia for Element {
    fn pending_source(&self) -> Option<String> {
        self.get_attribute(config::PENDING_SOURCE_ATTR)
    }

    fn activate(&self, source: &str) -> Result<()> {
        self.set_attribute(config::ACTIVE_SOURCE_ATTR, source)?;
        self.remove_attribute(config::PENDING_SOURCE_ATTR)?;
        Ok(())
    }
}

/// Returns how many items were switched to their real source.
pub fn load_deferred<M: DeferredMedia>(items: &[M]) -> Result<usize> {
    let mut loaded = 0;
    for item in items {
        if let Some(source) = item.pending_source() {
            item.activate(&source)?;
            loaded += 1;
        }
    }
    Ok(loaded)
}

pub fn run(document: &Document) -> Result<usize> {
    let items: Vec<Element> = config::DEFERRED_MEDIA
        .iter()
        .flat_map(|selector| dom::select_all(document, selector))
        .collect();
    let loaded = load_deferred(&items)?;
    debug!("activated {} deferred media elements", loaded);
    Ok(loaded)
}
