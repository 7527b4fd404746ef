//! Route definitions

use axum::{
    Router,
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

use crate::{handlers, state::AppState};

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_body_size_bytes;

    Router::new()
        // Health and diagnostics
        .route("/health", get(handlers::health::health_check))
        .route("/v1/system/checks", get(handlers::system::checks))
        // Authentication
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route("/logout", get(handlers::auth::logout))
        .route("/", get(handlers::auth::index))
        // Preferences
        .route(
            "/users/toggle-amount-visibility",
            get(handlers::preferences::toggle_amount_visibility),
        )
        .route(
            "/users/toggle-sound-playing",
            get(handlers::preferences::toggle_sound_playing),
        )
        .route(
            "/users/settings",
            get(handlers::preferences::settings_page).post(handlers::preferences::update_settings),
        )
        .route(
            "/users/toggle-sidebar",
            get(handlers::preferences::toggle_sidebar),
        )
        .route("/users/toggle-theme", get(handlers::preferences::toggle_theme))
        // User administration
        .route("/users", get(handlers::users::list_users))
        .route(
            "/users/add",
            get(handlers::users::add_user_page).post(handlers::users::add_user),
        )
        .route(
            "/users/{id}/edit",
            get(handlers::users::edit_user_page).post(handlers::users::edit_user),
        )
        .route("/messages", get(handlers::messages::take_messages))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state)
}
