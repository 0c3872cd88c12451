//! Reporting seam for email captures and CTA clicks.
//!
//! Only a console sink exists; a real transport would implement
//! [`AnalyticsSink`] and be handed to the components instead.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    EmailSubmitted {
        email: String,
        at: DateTime<Utc>,
    },
    CtaClicked {
        href: Option<String>,
        utm: BTreeMap<String, String>,
        at: DateTime<Utc>,
    },
}

impl AnalyticsEvent {
    pub fn email_submitted(email: impl Into<String>) -> Self {
        AnalyticsEvent::EmailSubmitted {
            email: email.into(),
            at: Utc::now(),
        }
    }

    pub fn cta_clicked(href: Option<String>, utm: BTreeMap<String, String>) -> Self {
        AnalyticsEvent::CtaClicked {
            href,
            utm,
            at: Utc::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalyticsEvent::EmailSubmitted { .. } => "Email submitted:",
            AnalyticsEvent::CtaClicked { .. } => "CTA Clicked:",
        }
    }
}

pub trait AnalyticsSink {
    fn report(&self, event: &AnalyticsEvent);
}

pub struct ConsoleSink;

impl AnalyticsSink for ConsoleSink {
    fn report(&self, event: &AnalyticsEvent) {
        match serde_json::to_string(event) {
            Ok(json) => gloo_console::log!(event.label(), json),
            Err(err) => log::warn!("could not serialize analytics event: {}", err),
        }
    }
}

#[cfg(test)]
pub mod testing {
    use std::cell::RefCell;

    use super::{AnalyticsEvent, AnalyticsSink};

    #[derive(Default)]
    pub struct RecordingSink {
        pub events: RefCell<Vec<AnalyticsEvent>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn report(&self, event: &AnalyticsEvent) {
            self.events.borrow_mut().push(event.clone());
        }
    }
}
