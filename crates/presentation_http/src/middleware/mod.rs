//! Request extractors for HTMX and session handling

pub mod htmx;
pub mod session;

pub use htmx::{HX_REDIRECT, HX_REFRESH, HX_REQUEST, HX_TRIGGER, HxRequest, RequireHtmx};
pub use session::{AuthRejection, CurrentUser, SESSION_COOKIE, clear_session_cookie, session_cookie};
