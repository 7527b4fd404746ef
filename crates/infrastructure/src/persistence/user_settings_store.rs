//! SQLite user settings store implementation

use std::sync::Arc;

use application::{error::ApplicationError, ports::UserSettingsStore};
use async_trait::async_trait;
use domain::{StartPage, Timezone, UserId, UserSettings};
use rusqlite::{OptionalExtension, Row, params};
use tokio::task;
use tracing::{debug, instrument, warn};

use super::{
    connection::ConnectionPool,
    error::{map_join_error, map_pool_error, map_sqlite_error},
};

/// SQLite-based user settings store
#[derive(Debug, Clone)]
pub struct SqliteUserSettingsStore {
    pool: Arc<ConnectionPool>,
}

impl SqliteUserSettingsStore {
    /// Create a new SQLite user settings store
    #[must_use]
    pub const fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

fn row_to_settings(user_id: UserId, row: &Row<'_>) -> Result<UserSettings, rusqlite::Error> {
    let start_page: String = row.get(2)?;
    let timezone: String = row.get(3)?;

    // Rows written by older releases may carry names chrono-tz no longer knows
    let timezone = Timezone::try_new(&timezone).unwrap_or_else(|_| {
        warn!(timezone = %timezone, "Invalid timezone in database, falling back to UTC");
        Timezone::utc()
    });

    Ok(UserSettings {
        user_id,
        hide_amounts: row.get(0)?,
        mute_sounds: row.get(1)?,
        start_page: StartPage::from_stored(&start_page),
        timezone,
        language: row.get(4)?,
    })
}

#[async_trait]
impl UserSettingsStore for SqliteUserSettingsStore {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_or_create(&self, user_id: UserId) -> Result<UserSettings, ApplicationError> {
        let pool = Arc::clone(&self.pool);

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            let existing = conn
                .query_row(
                    "SELECT hide_amounts, mute_sounds, start_page, timezone, language
                     FROM user_settings WHERE user_id = ?1",
                    [user_id.as_i64()],
                    |row| row_to_settings(user_id, row),
                )
                .optional()
                .map_err(map_sqlite_error)?;

            if let Some(settings) = existing {
                return Ok(settings);
            }

            let settings = UserSettings::new(user_id);
            conn.execute(
                "INSERT OR IGNORE INTO user_settings (user_id, hide_amounts, mute_sounds, start_page, timezone, language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user_id.as_i64(),
                    settings.hide_amounts,
                    settings.mute_sounds,
                    settings.start_page.as_str(),
                    settings.timezone.as_str(),
                    settings.language,
                ],
            )
            .map_err(map_sqlite_error)?;

            debug!("Created default settings");
            Ok(settings)
        })
        .await
        .map_err(map_join_error)?
    }

    #[instrument(skip(self, settings), fields(user_id = %settings.user_id))]
    async fn save(&self, settings: &UserSettings) -> Result<(), ApplicationError> {
        let pool = Arc::clone(&self.pool);
        let settings = settings.clone();

        task::spawn_blocking(move || {
            let conn = pool.get().map_err(map_pool_error)?;
            conn.execute(
                "INSERT INTO user_settings (user_id, hide_amounts, mute_sounds, start_page, timezone, language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(user_id) DO UPDATE SET
                     hide_amounts = excluded.hide_amounts,
                     mute_sounds = excluded.mute_sounds,
                     start_page = excluded.start_page,
                     timezone = excluded.timezone,
                     language = excluded.language",
                params![
                    settings.user_id.as_i64(),
                    settings.hide_amounts,
                    settings.mute_sounds,
                    settings.start_page.as_str(),
                    settings.timezone.as_str(),
                    settings.language,
                ],
            )
            .map_err(map_sqlite_error)?;

            debug!("Saved user settings");
            Ok(())
        })
        .await
        .map_err(map_join_error)?
    }
}
