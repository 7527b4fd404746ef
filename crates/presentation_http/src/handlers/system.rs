//! System handlers

use axum::{Json, extract::State};
use infrastructure::CheckReport;

use crate::{error::ApiError, middleware::CurrentUser, state::AppState};

/// Re-run the startup checks against the captured environment
///
/// Findings name configuration variables, so only superusers see them.
pub async fn checks(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
) -> Result<Json<CheckReport>, ApiError> {
    state.users.authorize_admin(&user)?;
    let findings = state.validator.validate(&state.env, &state.config);
    Ok(Json(CheckReport::new(findings)))
}
