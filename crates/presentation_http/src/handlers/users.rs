//! User administration handlers

use application::{FlashMessage, NewUserRequest, UpdateUserRequest};
use axum::{
    Form, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use domain::{User, UserId};
use serde::Serialize;

use super::{ITEM_SAVED_TRIGGER, hx_trigger};
use crate::{
    error::ApiError,
    middleware::{CurrentUser, RequireHtmx},
    state::AppState,
};

fn user_id(raw: i64) -> Result<UserId, ApiError> {
    UserId::new(raw).map_err(|_| ApiError::NotFound(format!("User {raw}")))
}

/// All accounts, for superusers
pub async fn list_users(
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users(&user).await?))
}

/// One input of a server-described form
#[derive(Debug, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub input: &'static str,
    pub required: bool,
}

/// Empty account form shown to superusers
#[derive(Debug, Serialize)]
pub struct UserForm {
    pub action: &'static str,
    pub fields: &'static [FormField],
}

const NEW_USER_FIELDS: &[FormField] = &[
    FormField {
        name: "email",
        label: "E-mail",
        input: "email",
        required: true,
    },
    FormField {
        name: "first_name",
        label: "First name",
        input: "text",
        required: false,
    },
    FormField {
        name: "last_name",
        label: "Last name",
        input: "text",
        required: false,
    },
    FormField {
        name: "password",
        label: "Password",
        input: "password",
        required: true,
    },
    FormField {
        name: "is_superuser",
        label: "Superuser",
        input: "checkbox",
        required: false,
    },
];

pub async fn add_user_page(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
) -> Result<Json<UserForm>, ApiError> {
    state.users.authorize_admin(&user)?;
    Ok(Json(UserForm {
        action: "/users/add",
        fields: NEW_USER_FIELDS,
    }))
}

pub async fn add_user(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { user, mut session }: CurrentUser,
    Form(request): Form<NewUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.add_user(&user, request).await?;
    state
        .auth
        .flash(&mut session, FlashMessage::success("Item added successfully"))
        .await?;
    Ok(hx_trigger(ITEM_SAVED_TRIGGER))
}

/// Account shown in the edit form
pub async fn edit_user_page(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { user, .. }: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.get_for_edit(&user, user_id(id)?).await?))
}

pub async fn edit_user(
    _: RequireHtmx,
    State(state): State<AppState>,
    CurrentUser { user, mut session }: CurrentUser,
    Path(id): Path<i64>,
    Form(request): Form<UpdateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    state.users.edit_user(&user, user_id(id)?, request).await?;
    state
        .auth
        .flash(&mut session, FlashMessage::success("Item updated successfully"))
        .await?;
    Ok(hx_trigger(ITEM_SAVED_TRIGGER))
}
