//! Wiring of adapters and services into the shared state

use std::{sync::Arc, time::Duration};

use application::{AuthOptions, AuthService, PreferenceService, UserService};
use infrastructure::{
    AppConfig, Argon2PasswordHasher, EnvSnapshot, InMemorySessionStore, SqliteUserSettingsStore,
    SqliteUserStore, StartupValidator, create_pool,
};

use crate::state::AppState;

/// Open the database and assemble every service from the resolved configuration
pub fn build_state(config: AppConfig, env: EnvSnapshot) -> anyhow::Result<AppState> {
    let pool = Arc::new(create_pool(&config.database)?);
    let users = Arc::new(SqliteUserStore::new(Arc::clone(&pool)));
    let settings = Arc::new(SqliteUserSettingsStore::new(pool));
    let sessions = Arc::new(InMemorySessionStore::new());
    let hasher = Arc::new(Argon2PasswordHasher::new());

    let options = AuthOptions {
        oidc_only: config.auth.oidc_only,
        providers: config
            .auth
            .providers
            .iter()
            .map(|p| p.to_external())
            .collect(),
        session_ttl: Duration::from_secs(config.security.session_expiry_secs),
    };

    Ok(AppState {
        auth: Arc::new(AuthService::new(
            users.clone(),
            sessions.clone(),
            hasher.clone(),
            options,
        )),
        users: Arc::new(UserService::new(
            users,
            settings.clone(),
            hasher,
            config.security.demo,
        )),
        preferences: Arc::new(PreferenceService::new(settings, sessions)),
        config: Arc::new(config),
        env: Arc::new(env),
        validator: Arc::new(StartupValidator::standard()),
    })
}
