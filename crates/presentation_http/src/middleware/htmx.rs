//! HTMX request detection
//!
//! HTMX marks its requests with `HX-Request: true`; responses steer the
//! client with the `HX-Trigger`, `HX-Refresh` and `HX-Redirect` headers.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

pub const HX_REQUEST: &str = "hx-request";
pub const HX_TRIGGER: &str = "hx-trigger";
pub const HX_REFRESH: &str = "hx-refresh";
pub const HX_REDIRECT: &str = "hx-redirect";

fn is_htmx(parts: &Parts) -> bool {
    parts
        .headers
        .get(HX_REQUEST)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

/// Whether the request was issued by HTMX
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(is_htmx(parts)))
    }
}

/// Guard for endpoints that only serve HTMX fragments
#[derive(Debug, Clone, Copy)]
pub struct RequireHtmx;

impl<S> FromRequestParts<S> for RequireHtmx
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if is_htmx(parts) {
            Ok(Self)
        } else {
            Err(ApiError::BadRequest(
                "This endpoint only accepts HTMX requests".to_string(),
            ))
        }
    }
}
