//! Preference toggles and the settings form

use application::{FlashMessage, ToggleOutcome, UpdateSettingsRequest};
use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{StartPage, UserSettings};
use serde::Serialize;

use super::hx_refresh;
use crate::{
    error::ApiError,
    middleware::{CurrentUser, HX_TRIGGER, RequireHtmx},
    state::AppState,
};

/// Result of a boolean toggle
#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    pub enabled: bool,
    pub message: &'static str,
}

impl From<ToggleOutcome> for ToggleResponse {
    fn from(outcome: ToggleOutcome) -> Self {
        Self {
            enabled: outcome.enabled,
            message: outcome.message,
        }
    }
}

/// A selectable start page
#[derive(Debug, Serialize)]
pub struct StartPageOption {
    pub value: &'static str,
    pub label: &'static str,
}

/// Current settings plus the choices offered by the form
#[derive(Debug, Serialize)]
pub struct SettingsPage {
    pub settings: UserSettings,
    pub start_pages: Vec<StartPageOption>,
}

async fn flash_toggle(
    state: &AppState,
    current: &mut CurrentUser,
    outcome: ToggleOutcome,
) -> Result<Response, ApiError> {
    state
        .auth
        .flash(&mut current.session, FlashMessage::info(outcome.message))
        .await?;
    Ok((
        [(HX_TRIGGER, "updated")],
        Json(ToggleResponse::from(outcome)),
    )
        .into_response())
}

pub async fn toggle_amount_visibility(
    _: RequireHtmx,
    State(state): State<AppState>,
    mut current: CurrentUser,
) -> Result<Response, ApiError> {
    let outcome = state
        .preferences
        .toggle_amount_visibility(&current.user)
        .await?;
    flash_toggle(&state, &mut current, outcome).await
}

pub async fn toggle_sound_playing(
    _: RequireHtmx,
    State(state): State<AppState>,
    mut current: CurrentUser,
) -> Result<Response, ApiError> {
    let outcome = state.preferences.toggle_sound_playing(&current.user).await?;
    flash_toggle(&state, &mut current, outcome).await
}

/// Settings form contents
pub async fn settings_page(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
) -> Result<Json<SettingsPage>, ApiError> {
    let settings = state.preferences.settings(&user).await?;
    let start_pages = StartPage::ALL
        .iter()
        .map(|page| StartPageOption {
            value: page.as_str(),
            label: page.label(),
        })
        .collect();
    Ok(Json(SettingsPage {
        settings,
        start_pages,
    }))
}

/// Save the settings form and reload the page
pub async fn update_settings(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { user, mut session }: CurrentUser,
    Form(request): Form<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.preferences.update_settings(&user, request).await?;
    state
        .auth
        .flash(
            &mut session,
            FlashMessage::success("Your settings have been updated"),
        )
        .await?;
    Ok(hx_refresh())
}

pub async fn toggle_sidebar(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { mut session, .. }: CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.preferences.toggle_sidebar_status(&mut session).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn toggle_theme(
    State(state): State<AppState>,
    CurrentUser { mut session, .. }: CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.preferences.toggle_theme(&mut session).await?;
    Ok(StatusCode::NO_CONTENT)
}
