//! Flash message handler

use application::FlashMessage;
use axum::{Json, extract::State};

use crate::{error::ApiError, middleware::CurrentUser, state::AppState};

/// Return and clear the pending flash messages
pub async fn take_messages(
    State(state): State<AppState>,
    CurrentUser { mut session, .. }: CurrentUser,
) -> Result<Json<Vec<FlashMessage>>, ApiError> {
    Ok(Json(state.auth.take_messages(&mut session).await?))
}
