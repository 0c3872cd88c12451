use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use super::focus_trap::FocusTrap;
use crate::config;
use crate::dom::{self, Listener};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    Open,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEvent {
    ButtonActivated,
    EscapePressed,
    LinkActivated,
}

impl MenuState {
    pub fn is_open(self) -> bool {
        self == MenuState::Open
    }

    /// Next state for `event`, or `None` when the event doesn't apply.
    pub fn after(self, event: MenuEvent) -> Option<MenuState> {
        match (self, event) {
            (MenuState::Open, MenuEvent::ButtonActivated) => Some(MenuState::Closed),
            (MenuState::Closed, MenuEvent::ButtonActivated) => Some(MenuState::Open),
            (MenuState::Open, MenuEvent::EscapePressed | MenuEvent::LinkActivated) => {
                Some(MenuState::Closed)
            }
            (MenuState::Closed, _) => None,
        }
    }
}

/// Everything the menu does to the page.
pub trait MenuView {
    fn set_expanded(&mut self, expanded: bool) -> Result<()>;
    fn set_panel_hidden(&mut self, hidden: bool) -> Result<()>;
    fn set_scroll_lock(&mut self, locked: bool) -> Result<()>;
    /// Focuses the first focusable panel element once the panel has settled.
    fn focus_first_later(&mut self);
    fn install_trap(&mut self) -> Result<()>;
    fn remove_trap(&mut self);
    fn focus_button(&mut self) -> Result<()>;
}

pub struct MobileMenu<V: MenuView> {
    state: MenuState,
    view: V,
}

impl<V: MenuView> MobileMenu<V> {
    pub fn new(view: V) -> Self {
        Self {
            state: MenuState::Closed,
            view,
        }
    }

    pub fn handle(&mut self, event: MenuEvent) -> Result<()> {
        let Some(next) = self.state.after(event) else {
            return Ok(());
        };
        debug!("menu {:?} -> {:?} on {:?}", self.state, next, event);
        self.apply(next)?;
        if event == MenuEvent::EscapePressed {
            self.view.focus_button()?;
        }
        Ok(())
    }

    fn apply(&mut self, next: MenuState) -> Result<()> {
        self.state = next;
        let open = next.is_open();
        self.view.set_expanded(open)?;
        self.view.set_panel_hidden(!open)?;
        self.view.set_scroll_lock(open)?;
        if open {
            self.view.focus_first_later();
            self.view.install_trap()
        } else {
            self.view.remove_trap();
            Ok(())
        }
    }
}

pub struct DomMenu {
    document: Document,
    button: Element,
    panel: Element,
    body: Option<HtmlElement>,
    trap: Rc<FocusTrap>,
    trap_listener: Option<Listener>,
}

impl DomMenu {
    fn new(document: &Document, button: Element, panel: Element) -> Self {
        let trap = Rc::new(FocusTrap::snapshot(&panel));
        Self {
            document: document.clone(),
            button,
            panel,
            body: document.body(),
            trap,
            trap_listener: None,
        }
    }
}

impl MenuView for DomMenu {
    fn set_expanded(&mut self, expanded: bool) -> Result<()> {
        dom::set_expanded(&self.button, expanded)
    }

    fn set_panel_hidden(&mut self, hidden: bool) -> Result<()> {
        dom::set_hidden(&self.panel, hidden)
    }

    fn set_scroll_lock(&mut self, locked: bool) -> Result<()> {
        if let Some(body) = &self.body {
            body.class_list()
                .toggle_with_force(config::SCROLL_LOCK_CLASS, locked)?;
        }
        Ok(())
    }

    fn focus_first_later(&mut self) {
        // Not cancelled if the menu closes again inside the delay.
        if let Some(first) = self.trap.first().cloned() {
            Timeout::new(config::FOCUS_SETTLE_MS, move || {
                let _ = dom::focus(&first);
            })
            .forget();
        }
    }

    fn install_trap(&mut self) -> Result<()> {
        let trap = self.trap.clone();
        let document = self.document.clone();
        self.trap_listener = Some(Listener::attach(&self.document, "keydown", move |e| {
            if let Some(key) = e.dyn_ref::<KeyboardEvent>() {
                trap.handle_key(&document, key);
            }
        })?);
        Ok(())
    }

    fn remove_trap(&mut self) {
        // Dropping the listener detaches it.
        self.trap_listener = None;
    }

    fn focus_button(&mut self) -> Result<()> {
        dom::focus(&self.button)
    }
}

fn dispatch(menu: &Rc<RefCell<MobileMenu<DomMenu>>>, event: MenuEvent) {
    if let Err(err) = menu.borrow_mut().handle(event) {
        warn!("menu failed to handle {:?}: {}", event, err);
    }
}

pub fn mount(document: &Document) -> Result<bool> {
    let (Some(button), Some(panel)) = (
        dom::select(document, config::MENU_BUTTON),
        dom::select(document, config::MENU_PANEL),
    ) else {
        return Ok(false);
    };

    let starts_open = dom::is_expanded(&button);
    let links = dom::select_all_in(&panel, config::MENU_LINKS);
    let mut menu = MobileMenu::new(DomMenu::new(document, button.clone(), panel));
    if starts_open {
        menu.apply(MenuState::Open)?;
    }
    let menu = Rc::new(RefCell::new(menu));

    {
        let menu = menu.clone();
        dom::listen(&button, "click", move |_| {
            dispatch(&menu, MenuEvent::ButtonActivated);
        })?;
    }

    {
        let menu = menu.clone();
        dom::listen(document, "keydown", move |e| {
            let escape = e
                .dyn_ref::<KeyboardEvent>()
                .map_or(false, |key| key.key() == "Escape");
            if escape {
                dispatch(&menu, MenuEvent::EscapePressed);
            }
        })?;
    }

    for link in links {
        let menu = menu.clone();
        dom::listen(&link, "click", move |_| {
            dispatch(&menu, MenuEvent::LinkActivated);
        })?;
    }

    Ok(true)
}
