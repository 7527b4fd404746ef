//! Spendbook HTTP presentation layer
//!
//! Server-rendered account and preference endpoints driven by HTMX, plus
//! health and configuration diagnostics.

pub mod bootstrap;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod tasks;

pub use bootstrap::build_state;
pub use error::{ApiError, set_expose_internal_errors};
pub use middleware::{CurrentUser, HxRequest, RequireHtmx};
pub use routes::create_router;
pub use server::{ShutdownOutcome, serve_until};
pub use state::AppState;
