//! Preference service
//!
//! Per-user settings persisted in the settings store, and the theme and
//! sidebar layout kept in the browser session.

use std::{fmt, sync::Arc};

use domain::{SidebarStatus, StartPage, Theme, Timezone, User, UserSettings};
use serde::Deserialize;
use tracing::{debug, instrument};
use validator::Validate;

use crate::{
    error::ApplicationError,
    ports::{Session, SessionStore, UserSettingsStore},
};

const THEME_KEY: &str = "theme";
const SIDEBAR_KEY: &str = "sidebar_status";

/// Result of flipping a boolean preference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Value after the toggle
    pub enabled: bool,
    /// Confirmation shown to the user
    pub message: &'static str,
}

/// Settings form submission
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    pub start_page: StartPage,
    #[validate(length(min = 1, max = 64))]
    pub timezone: String,
    #[validate(length(min = 2, max = 16))]
    pub language: String,
    #[serde(default)]
    pub hide_amounts: bool,
    #[serde(default)]
    pub mute_sounds: bool,
}

/// Service for reading and changing user preferences
pub struct PreferenceService {
    settings: Arc<dyn UserSettingsStore>,
    sessions: Arc<dyn SessionStore>,
}

impl fmt::Debug for PreferenceService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreferenceService").finish_non_exhaustive()
    }
}

impl PreferenceService {
    /// Create a new preference service
    pub fn new(settings: Arc<dyn UserSettingsStore>, sessions: Arc<dyn SessionStore>) -> Self {
        Self { settings, sessions }
    }

    /// Current settings of a user
    pub async fn settings(&self, user: &User) -> Result<UserSettings, ApplicationError> {
        self.settings.get_or_create(user.id).await
    }

    /// Path the application root should redirect this user to
    pub async fn start_page_route(&self, user: &User) -> Result<&'static str, ApplicationError> {
        Ok(self.settings(user).await?.start_page.route())
    }

    /// Hide or reveal transaction amounts
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn toggle_amount_visibility(
        &self,
        user: &User,
    ) -> Result<ToggleOutcome, ApplicationError> {
        let mut settings = self.settings(user).await?;
        let hidden = settings.toggle_hide_amounts();
        self.settings.save(&settings).await?;
        debug!(hidden, "Amount visibility toggled");

        Ok(ToggleOutcome {
            enabled: hidden,
            message: if hidden {
                "Transaction amounts are now hidden"
            } else {
                "Transaction amounts are now displayed"
            },
        })
    }

    /// Mute or unmute interface sounds
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn toggle_sound_playing(&self, user: &User) -> Result<ToggleOutcome, ApplicationError> {
        let mut settings = self.settings(user).await?;
        let muted = settings.toggle_mute_sounds();
        self.settings.save(&settings).await?;
        debug!(muted, "Sound playing toggled");

        Ok(ToggleOutcome {
            enabled: muted,
            message: if muted {
                "Sounds are now muted"
            } else {
                "Sounds will now play"
            },
        })
    }

    /// Apply a settings form submission
    #[instrument(skip(self, user, request), fields(user_id = %user.id))]
    pub async fn update_settings(
        &self,
        user: &User,
        request: UpdateSettingsRequest,
    ) -> Result<UserSettings, ApplicationError> {
        request.validate()?;
        let timezone = Timezone::try_new(&request.timezone)?;

        let mut settings = self.settings(user).await?;
        settings.start_page = request.start_page;
        settings.timezone = timezone;
        settings.language = request.language;
        settings.hide_amounts = request.hide_amounts;
        settings.mute_sounds = request.mute_sounds;
        self.settings.save(&settings).await?;

        debug!("Settings updated");
        Ok(settings)
    }

    /// Switch between the dark and light theme
    pub async fn toggle_theme(&self, session: &mut Session) -> Result<Theme, ApplicationError> {
        let theme = Theme::toggle_from(session.get(THEME_KEY));
        session.set(THEME_KEY, theme.as_str());
        self.sessions.save(session).await?;
        Ok(theme)
    }

    /// Switch the sidebar between floating and fixed
    pub async fn toggle_sidebar_status(
        &self,
        session: &mut Session,
    ) -> Result<SidebarStatus, ApplicationError> {
        let status = SidebarStatus::toggle_from(session.get(SIDEBAR_KEY));
        session.set(SIDEBAR_KEY, status.as_str());
        self.sessions.save(session).await?;
        Ok(status)
    }
}
