//! Session cookie authentication

use application::{Session, SessionId};
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use domain::User;

use super::htmx::{HX_REDIRECT, HxRequest};
use crate::{error::ApiError, state::AppState};

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "sessionid";

const LOGIN_PATH: &str = "/login";

/// `Set-Cookie` value for a freshly opened session
pub fn session_cookie(session: &Session, max_age_secs: u64, secure: bool) -> String {
    let cookie = Cookie::build((SESSION_COOKIE, session.id.as_str()))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build();
    format!("{cookie}; Max-Age={max_age_secs}")
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie() -> String {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    format!("{cookie}; Max-Age=0")
}

/// Why a request could not be tied to a logged-in user
#[derive(Debug)]
pub enum AuthRejection {
    /// Browser navigation: send to the login page
    Login,
    /// HTMX request: ask the client to navigate to the login page
    HtmxLogin,
    Error(ApiError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Login => Redirect::to(LOGIN_PATH).into_response(),
            Self::HtmxLogin => (
                StatusCode::UNAUTHORIZED,
                [(HX_REDIRECT, LOGIN_PATH)],
            )
                .into_response(),
            Self::Error(e) => e.into_response(),
        }
    }
}

/// The authenticated user and their live session
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl CurrentUser {
    /// Resolve the session cookie, if any, to a live session
    async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<Self>, ApiError> {
        let jar = CookieJar::from_headers(&parts.headers);
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };

        let id = SessionId::from_client(cookie.value());
        match state.auth.authenticate(&id).await? {
            Some((session, user)) => Ok(Some(Self { user, session })),
            None => {
                tracing::debug!(path = %parts.uri.path(), "Unknown or expired session");
                Ok(None)
            },
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match Self::resolve(parts, state).await {
            Ok(Some(current)) => Ok(current),
            Ok(None) => {
                let Ok(HxRequest(htmx)) = HxRequest::from_request_parts(parts, state).await;
                Err(if htmx {
                    AuthRejection::HtmxLogin
                } else {
                    AuthRejection::Login
                })
            },
            Err(e) => Err(AuthRejection::Error(e)),
        }
    }
}

/// Pages open to anonymous visitors can still tell whether someone is logged in
impl OptionalFromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        Self::resolve(parts, state).await
    }
}
