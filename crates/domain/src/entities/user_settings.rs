//! Per-user interface preferences

use serde::{Deserialize, Serialize};

use crate::value_objects::{StartPage, Timezone, UserId};

/// Preferences stored alongside each user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Owner of these settings
    pub user_id: UserId,
    /// Mask transaction amounts in the interface
    pub hide_amounts: bool,
    /// Suppress interface sounds
    pub mute_sounds: bool,
    /// Landing page for the application root
    pub start_page: StartPage,
    /// Display timezone
    pub timezone: Timezone,
    /// Interface language code, `auto` follows the browser
    pub language: String,
}

impl UserSettings {
    /// Default settings for a user that has none yet
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            hide_amounts: false,
            mute_sounds: false,
            start_page: StartPage::default(),
            timezone: Timezone::default(),
            language: "auto".to_string(),
        }
    }

    /// Flip amount visibility and return the new `hide_amounts` value
    pub fn toggle_hide_amounts(&mut self) -> bool {
        self.hide_amounts = !self.hide_amounts;
        self.hide_amounts
    }

    /// Flip sound muting and return the new `mute_sounds` value
    pub fn toggle_mute_sounds(&mut self) -> bool {
        self.mute_sounds = !self.mute_sounds;
        self.mute_sounds
    }
}
