//! HTTP request handlers

pub mod auth;
pub mod health;
pub mod messages;
pub mod preferences;
pub mod system;
pub mod users;

use axum::http::StatusCode;

use crate::middleware::{HX_REFRESH, HX_TRIGGER};

/// HTMX event fired after a list-changing form succeeds
pub(crate) const ITEM_SAVED_TRIGGER: &str = "updated, hide_offcanvas";

/// Empty response asking HTMX to fire `events`
pub(crate) fn hx_trigger(events: &'static str) -> (StatusCode, [(&'static str, &'static str); 1]) {
    (StatusCode::NO_CONTENT, [(HX_TRIGGER, events)])
}

/// Empty response asking HTMX to reload the page
pub(crate) fn hx_refresh() -> (StatusCode, [(&'static str, &'static str); 1]) {
    (StatusCode::NO_CONTENT, [(HX_REFRESH, "true")])
}
