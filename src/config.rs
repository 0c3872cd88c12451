use log::Level;

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose transitions while developing locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

pub const HIDDEN_CLASS: &str = "hidden";
pub const SCROLL_LOCK_CLASS: &str = "overflow-hidden";
pub const ARIA_EXPANDED: &str = "aria-expanded";

// Mobile menu
pub const MENU_BUTTON: &str = "[data-menu-button]";
pub const MENU_PANEL: &str = "[data-mobile-menu]";
pub const MENU_LINKS: &str = "a";
pub const FOCUSABLE: &str =
    "button, [href], input, select, textarea, [tabindex]:not([tabindex=\"-1\"])";
pub const FOCUS_SETTLE_MS: u32 = 100;

// Smooth scroll / back to top
pub const ANCHOR_LINKS: &str = "a[href^=\"#\"]";
pub const BACK_TO_TOP: &str = "[data-back-to-top]";
pub const BACK_TO_TOP_THRESHOLD_PX: f64 = 300.0;

// Testimonials
pub const SLIDER: &str = "[data-testimonial-slider]";
pub const SLIDE: &str = "[data-testimonial-slide]";
pub const SLIDE_PREV: &str = "[data-testimonial-prev]";
pub const SLIDE_NEXT: &str = "[data-testimonial-next]";
pub const SLIDE_INTERVAL_MS: u32 = 5_000;

// FAQ
pub const FAQ_ITEM: &str = "[data-faq-item]";
pub const FAQ_BUTTON: &str = "[data-faq-button]";
pub const FAQ_CONTENT: &str = "[data-faq-content]";

// Email capture
pub const EMAIL_FORM: &str = "[data-email-form]";
pub const EMAIL_INPUT: &str = "[data-email-input]";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";

// CTA logging
pub const CTA_LINK: &str = "[data-cta-link]";
pub const UTM_PREFIX: &str = "utm_";

// Deferred media. Add iframe/video selectors here once their markup exists.
pub const DEFERRED_MEDIA: &[&str] = &["img[data-src]"];
pub const PENDING_SOURCE_ATTR: &str = "data-src";
pub const ACTIVE_SOURCE_ATTR: &str = "src";
