use std::rc::Rc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, Window};

use crate::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::config;
use crate::dom;
use crate::error::Result;

/// ECMAScript WhiteSpace + LineTerminator, the set JS `trim` and `\s` use.
const JS_WHITESPACE_CLASS: &str = r"\t\n\x0B\x0C\r \x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

static EMAIL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    let ws = JS_WHITESPACE_CLASS;
    Regex::new(&format!(r"^[^{ws}@]+@[^{ws}@]+\.[^{ws}@]+$")).expect("email pattern compiles")
});

fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\u{0B}'
            | '\u{0C}'
            | '\r'
            | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", config::INVALID_EMAIL_MESSAGE)]
pub struct InvalidEmail;

/// Trims `raw` and checks it has a `local@domain.tld` shape.
pub fn validate(raw: &str) -> std::result::Result<&str, InvalidEmail> {
    let email = raw.trim_matches(is_js_whitespace);
    if EMAIL_SHAPE.is_match(email) {
        Ok(email)
    } else {
        Err(InvalidEmail)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Accepted(String),
    Rejected(InvalidEmail),
}

pub fn submit(raw: &str, sink: &dyn AnalyticsSink) -> Submission {
    match validate(raw) {
        Ok(email) => {
            sink.report(&AnalyticsEvent::email_submitted(email));
            Submission::Accepted(email.to_string())
        }
        Err(err) => Submission::Rejected(err),
    }
}

/// The capture form's input plus the page's blocking alert.
pub trait EmailField {
    fn value(&self) -> String;
    fn clear(&self);
    fn alert(&self, message: &str) -> Result<()>;
}

/// An accepted address is reported and the field cleared; a rejected one
/// keeps the field as typed and alerts.
pub fn handle_submit(field: &dyn EmailField, sink: &dyn AnalyticsSink) -> Result<Submission> {
    let outcome = submit(&field.value(), sink);
    match &outcome {
        Submission::Accepted(_) => field.clear(),
        Submission::Rejected(err) => field.alert(&err.to_string())?,
    }
    Ok(outcome)
}

struct DomEmailField {
    input: HtmlInputElement,
    window: Window,
}

impl EmailField for DomEmailField {
    fn value(&self) -> String {
        self.input.value()
    }

    fn clear(&self) {
        self.input.set_value("");
    }

    fn alert(&self, message: &str) -> Result<()> {
        self.window.alert_with_message(message)?;
        Ok(())
    }
}

pub fn mount(document: &Document, sink: Rc<dyn AnalyticsSink>) -> Result<bool> {
    let Some(form) = dom::select(document, config::EMAIL_FORM) else {
        return Ok(false);
    };
    let window = dom::window()?;
    let lookup = form.clone();

    dom::listen(&form, "submit", move |e| {
        e.prevent_default();
        let Some(input) = dom::select_in(&lookup, config::EMAIL_INPUT)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            debug!("email form has no input");
            return;
        };
        let field = DomEmailField {
            input,
            window: window.clone(),
        };
        if let Err(err) = handle_submit(&field, sink.as_ref()) {
            warn!("email submission not handled: {}", err);
        }
    })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::testing::RecordingSink;
    use std::cell::RefCell;

    struct FakeField {
        value: RefCell<String>,
        alerts: RefCell<Vec<String>>,
    }

    impl FakeField {
        fn typed(value: &str) -> Self {
            Self {
                value: RefCell::new(value.to_string()),
                alerts: RefCell::new(Vec::new()),
            }
        }
    }

    impl EmailField for FakeField {
        fn value(&self) -> String {
            self.value.borrow().clone()
        }

        fn clear(&self) {
            self.value.borrow_mut().clear();
        }

        fn alert(&self, message: &str) -> Result<()> {
            self.alerts.borrow_mut().push(message.to_string());
            Ok(())
        }
    }

    #[test]
    fn accepts_ordinary_and_minimal_addresses() {
        assert_eq!(validate("user@example.com"), Ok("user@example.com"));
        assert_eq!(validate("a@b.c"), Ok("a@b.c"));
        assert_eq!(validate("  first.last@sub.example.org \n"), Ok("first.last@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_shapes() {
        for raw in ["not-an-email", "@b.c", "a@", "a@b", "a@.c", "a@b.", "a b@c.d", "a@@b.c", "", "   "] {
            assert_eq!(validate(raw), Err(InvalidEmail), "{:?}", raw);
        }
    }

    #[test]
    fn trims_and_matches_whitespace_like_js() {
        assert_eq!(validate("\u{feff}a@b.c\u{3000}"), Ok("a@b.c"));
        assert_eq!(validate("a\u{feff}b@c.d"), Err(InvalidEmail));
        assert_eq!(validate("a\u{a0}b@c.d"), Err(InvalidEmail));
        // NEL is not whitespace in JS, so it is neither trimmed nor rejected.
        assert_eq!(validate("\u{85}a@b.c"), Ok("\u{85}a@b.c"));
        assert_eq!(validate("a\u{85}b@c.d"), Ok("a\u{85}b@c.d"));
    }

    #[test]
    fn alert_text_matches_the_page_copy() {
        assert_eq!(InvalidEmail.to_string(), "Please enter a valid email address.");
    }

    #[test]
    fn accepted_submission_is_reported_and_field_cleared() {
        let sink = RecordingSink::default();
        let field = FakeField::typed(" user@example.com ");
        assert_eq!(
            handle_submit(&field, &sink),
            Ok(Submission::Accepted("user@example.com".into()))
        );
        assert_eq!(*field.value.borrow(), "");
        assert!(field.alerts.borrow().is_empty());

        let events = sink.events.borrow();
        assert_eq!(events.len(), 1);
        match &events[0] {
            AnalyticsEvent::EmailSubmitted { email, .. } => assert_eq!(email, "user@example.com"),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn rejected_submission_alerts_and_keeps_the_value() {
        let sink = RecordingSink::default();
        let field = FakeField::typed("not-an-email");
        assert_eq!(
            handle_submit(&field, &sink),
            Ok(Submission::Rejected(InvalidEmail))
        );
        assert_eq!(*field.value.borrow(), "not-an-email");
        assert_eq!(
            *field.alerts.borrow(),
            vec!["Please enter a valid email address.".to_string()]
        );
        assert!(sink.events.borrow().is_empty());
    }
}
