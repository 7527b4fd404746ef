//! User management service
//!
//! Superusers list and create accounts; every user may edit their own
//! account. Editing is switched off entirely in demo deployments.

use std::{fmt, sync::Arc};

use domain::{EmailAddress, User, UserId};
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

use crate::{
    error::ApplicationError,
    ports::{NewUser, PasswordHasherPort, UserSettingsStore, UserStore},
};

/// Form for creating an account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUserRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    #[validate(length(min = 8, max = 256))]
    pub password: String,
    #[serde(default)]
    pub is_superuser: bool,
}

/// Form for editing an account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 3, max = 254))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
    /// Leave empty to keep the current password
    #[serde(default)]
    #[validate(length(min = 8, max = 256))]
    pub new_password: Option<String>,
    /// Only superusers may change account flags
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_superuser: Option<bool>,
}

/// Service for account administration
pub struct UserService {
    users: Arc<dyn UserStore>,
    settings: Arc<dyn UserSettingsStore>,
    hasher: Arc<dyn PasswordHasherPort>,
    demo_mode: bool,
}

impl fmt::Debug for UserService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserService")
            .field("demo_mode", &self.demo_mode)
            .finish_non_exhaustive()
    }
}

impl UserService {
    /// Create a new user service
    pub fn new(
        users: Arc<dyn UserStore>,
        settings: Arc<dyn UserSettingsStore>,
        hasher: Arc<dyn PasswordHasherPort>,
        demo_mode: bool,
    ) -> Self {
        Self {
            users,
            settings,
            hasher,
            demo_mode,
        }
    }

    /// Fail unless `actor` may administer accounts
    pub fn authorize_admin(&self, actor: &User) -> Result<(), ApplicationError> {
        require_superuser(actor)
    }

    /// All accounts, ordered by id
    pub async fn list_users(&self, actor: &User) -> Result<Vec<User>, ApplicationError> {
        require_superuser(actor)?;
        self.users.list().await
    }

    /// Create an account on behalf of a superuser
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn add_user(
        &self,
        actor: &User,
        request: NewUserRequest,
    ) -> Result<User, ApplicationError> {
        require_superuser(actor)?;
        self.create(request).await
    }

    /// Create the first superuser, bypassing the actor check
    #[instrument(skip(self, request))]
    pub async fn create_superuser(&self, request: NewUserRequest) -> Result<User, ApplicationError> {
        self.create(NewUserRequest {
            is_superuser: true,
            ..request
        })
        .await
    }

    /// Load an account for editing
    pub async fn get_for_edit(&self, actor: &User, id: UserId) -> Result<User, ApplicationError> {
        self.ensure_editable()?;
        let target = self
            .users
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::NotFound(format!("User {id}")))?;

        if !actor.can_edit(target.id) {
            return Err(ApplicationError::Forbidden(
                "You can only edit your own account".to_string(),
            ));
        }
        Ok(target)
    }

    /// Apply an edit form to an account
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn edit_user(
        &self,
        actor: &User,
        id: UserId,
        mut request: UpdateUserRequest,
    ) -> Result<User, ApplicationError> {
        let mut target = self.get_for_edit(actor, id).await?;
        // an empty password field means "keep the current password"
        request.new_password = request.new_password.filter(|p| !p.is_empty());
        request.validate()?;

        if !actor.is_superuser
            && (request.is_superuser.is_some_and(|v| v != target.is_superuser)
                || request.is_active.is_some_and(|v| v != target.is_active))
        {
            return Err(ApplicationError::Forbidden(
                "Only superusers can change account status".to_string(),
            ));
        }

        let email = EmailAddress::new(request.email)?;
        if email != target.email {
            if let Some(other) = self.users.find_by_email(&email).await? {
                if other.id != target.id {
                    return Err(ApplicationError::Conflict(format!(
                        "A user with email {email} already exists"
                    )));
                }
            }
        }

        target.email = email;
        target.first_name = request.first_name.trim().to_string();
        target.last_name = request.last_name.trim().to_string();
        if let Some(password) = request.new_password {
            target.password_hash = self.hasher.hash(&password)?;
        }
        if let Some(active) = request.is_active {
            target.is_active = active;
        }
        if let Some(superuser) = request.is_superuser {
            target.is_superuser = superuser;
        }

        self.users.update(&target).await?;
        info!(user_id = %target.id, "User updated");
        Ok(target)
    }

    async fn create(&self, request: NewUserRequest) -> Result<User, ApplicationError> {
        request.validate()?;
        let email = EmailAddress::new(request.email)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::Conflict(format!(
                "A user with email {email} already exists"
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .users
            .insert(NewUser {
                email,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                password_hash,
                is_active: true,
                is_superuser: request.is_superuser,
            })
            .await?;
        self.settings.get_or_create(user.id).await?;

        info!(user_id = %user.id, superuser = user.is_superuser, "User created");
        Ok(user)
    }

    fn ensure_editable(&self) -> Result<(), ApplicationError> {
        if self.demo_mode {
            Err(ApplicationError::Forbidden(
                "This action is disabled on demo mode".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

fn require_superuser(actor: &User) -> Result<(), ApplicationError> {
    if actor.is_superuser {
        Ok(())
    } else {
        Err(ApplicationError::Forbidden(
            "Superuser permission required".to_string(),
        ))
    }
}
