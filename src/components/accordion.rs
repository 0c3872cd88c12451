use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use web_sys::{Document, Element};

use crate::config;
use crate::dom;
use crate::error::Result;

/// Mutually exclusive expand/collapse set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accordion {
    len: usize,
    open: Option<usize>,
}

impl Accordion {
    pub fn new(len: usize, open: Option<usize>) -> Self {
        Self {
            len,
            open: open.filter(|i| *i < len),
        }
    }

    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Closes every other item, then flips `index` based on its prior state.
    pub fn activate(&mut self, index: usize) {
        if index >= self.len {
            return;
        }
        self.open = if self.is_open(index) { None } else { Some(index) };
    }
}

struct FaqItem {
    button: Element,
    content: Element,
}

struct Faq {
    state: Accordion,
    items: Vec<FaqItem>,
}

impl Faq {
    fn render(&self) -> Result<()> {
        for (i, item) in self.items.iter().enumerate() {
            let open = self.state.is_open(i);
            dom::set_expanded(&item.button, open)?;
            dom::set_hidden(&item.content, !open)?;
        }
        Ok(())
    }

    fn activate(&mut self, index: usize) -> Result<()> {
        self.state.activate(index);
        debug!("faq open item: {:?}", self.state.open_item());
        self.render()
    }
}

pub fn mount(document: &Document) -> Result<usize> {
    let items: Vec<FaqItem> = dom::select_all(document, config::FAQ_ITEM)
        .iter()
        .filter_map(|item| {
            Some(FaqItem {
                button: dom::select_in(item, config::FAQ_BUTTON)?,
                content: dom::select_in(item, config::FAQ_CONTENT)?,
            })
        })
        .collect();
    if items.is_empty() {
        return Ok(0);
    }

    let initially_open = items.iter().position(|item| dom::is_expanded(&item.button));
    let buttons: Vec<Element> = items.iter().map(|item| item.button.clone()).collect();
    let faq = Faq {
        state: Accordion::new(items.len(), initially_open),
        items,
    };
    faq.render()?;
    let faq = Rc::new(RefCell::new(faq));

    for (index, button) in buttons.iter().enumerate() {
        let faq = faq.clone();
        dom::listen(button, "click", move |_| {
            if let Err(err) = faq.borrow_mut().activate(index) {
                warn!("faq item {} failed to toggle: {}", index, err);
            }
        })?;
    }
    Ok(buttons.len())
}
