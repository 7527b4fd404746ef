//! Login and logout handlers

use application::{ExternalProvider, LoginEntry, SessionId};
use axum::{
    Form, Json,
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::{
    error::ApiError,
    middleware::{CurrentUser, SESSION_COOKIE, clear_session_cookie, session_cookie},
    state::AppState,
};

/// Login form submission
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Description of the login form
#[derive(Debug, Serialize)]
pub struct LoginPage {
    /// Whether email and password are accepted
    pub password_login: bool,
    pub providers: Vec<ExternalProvider>,
}

/// Show the login form, or hand off to the only identity provider
///
/// Visitors who are already logged in go straight to the index.
pub async fn login_page(State(state): State<AppState>, current: Option<CurrentUser>) -> Response {
    if current.is_some() {
        return Redirect::to("/").into_response();
    }
    match state.auth.login_entry() {
        LoginEntry::Redirect(url) => Redirect::to(&url).into_response(),
        LoginEntry::Form { providers } => Json(LoginPage {
            password_login: !state.config.auth.oidc_only,
            providers,
        })
        .into_response(),
    }
}

/// Check credentials and open a session
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.auth.login(&form.email, &form.password).await?;
    let cookie = session_cookie(
        &session,
        state.config.security.session_expiry_secs,
        state.config.security.secure_cookies,
    );
    Ok(([(header::SET_COOKIE, cookie)], Redirect::to("/")))
}

/// Close the session, if any, and return to the login page
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state
            .auth
            .logout(&SessionId::from_client(cookie.value()))
            .await?;
    }
    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Redirect::to("/login"),
    ))
}

/// Send the user to their configured start page
pub async fn index(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
) -> Result<Redirect, ApiError> {
    let route = state.preferences.start_page_route(&user).await?;
    Ok(Redirect::to(route))
}
