//! Application configuration
//!
//! Split into focused sub-modules:
//! - `server`: HTTP server settings
//! - `security`: Signing key, session lifetime, demo mode
//! - `database`: SQLite database settings
//! - `auth`: External identity providers
//! - `features`: Task workers, frontend assets, soft-delete retention
//!
//! Sources are layered: built-in defaults, an optional `spendbook.toml`,
//! `SPENDBOOK__SECTION__KEY` variables, and finally the well-known raw
//! variables (`SECRET_KEY`, `INTERNAL_PORT`, ...) read from the snapshot.

mod auth;
mod database;
mod features;
mod security;
mod server;

use std::{fmt, path::Path, str::FromStr};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use auth::{AuthConfig, AuthProviderConfig};
pub use database::DatabaseConfig;
pub use features::{FrontendConfig, SoftDeleteConfig, TasksConfig};
pub use security::SecurityConfig;
pub use server::ServerConfig;

use crate::env::EnvSnapshot;

/// Prefix of structured override variables
pub const ENV_PREFIX: &str = "SPENDBOOK";

/// Default configuration file name, looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "spendbook";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Application environment (development or production)
///
/// Controls how much error detail reaches HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Development environment, full error details
    #[default]
    Development,
    /// Production environment, sanitised errors
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub security: SecurityConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub tasks: TasksConfig,

    #[serde(default)]
    pub frontend: FrontendConfig,

    #[serde(default)]
    pub soft_delete: SoftDeleteConfig,

    #[serde(default)]
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Load configuration using `spendbook.toml` from the working directory if present
    pub fn load(env: &EnvSnapshot) -> Result<Self, config::ConfigError> {
        Self::load_from(None, env)
    }

    /// Load configuration, reading `path` instead of the default file when given
    ///
    /// An explicit path must exist; the default file is optional.
    pub fn load_from(path: Option<&Path>, env: &EnvSnapshot) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let overrides: config::Map<String, String> = env
            .with_prefix(ENV_PREFIX)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        let builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .add_source(file)
            // e.g. SPENDBOOK__SERVER__LOG_FORMAT=json
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(overrides)),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.apply_raw_variables(env);
        Ok(config)
    }

    /// Overlay the well-known flat variables
    ///
    /// Malformed integers leave the current value untouched; the startup
    /// checks report them.
    pub fn apply_raw_variables(&mut self, env: &EnvSnapshot) {
        if let Some(key) = env.non_empty("SECRET_KEY") {
            self.security.secret_key = Some(SecretString::from(key.to_owned()));
        }
        if let Some(path) = env.non_empty("SQL_DATABASE") {
            self.database.path = path.to_owned();
        }

        override_int(env, "TASK_WORKERS", &mut self.tasks.workers);
        override_int(env, "SESSION_EXPIRY_TIME", &mut self.security.session_expiry_secs);
        override_int(env, "INTERNAL_PORT", &mut self.server.port);
        override_int(
            env,
            "DJANGO_VITE_DEV_SERVER_PORT",
            &mut self.frontend.dev_server_port,
        );
        override_int(
            env,
            "KEEP_DELETED_TRANSACTIONS_FOR",
            &mut self.soft_delete.keep_deleted_for_days,
        );

        override_flag(env, "ENABLE_SOFT_DELETE", &mut self.soft_delete.enabled);
        override_flag(env, "DEBUG", &mut self.frontend.debug);
        override_flag(env, "DEMO", &mut self.security.demo);
        override_flag(env, "OIDC_ONLY", &mut self.auth.oidc_only);

        if let Some(client_id) = env.non_empty("OIDC_CLIENT_ID") {
            let name = env.non_empty("OIDC_CLIENT_NAME").unwrap_or("OpenID Connect");
            self.auth.providers.push(AuthProviderConfig {
                id: "oidc".to_string(),
                name: name.to_string(),
                server_url: env.get("OIDC_SERVER_URL").unwrap_or_default().to_string(),
                client_id: client_id.to_string(),
                client_secret: env
                    .non_empty("OIDC_CLIENT_SECRET")
                    .map(|s| SecretString::from(s.to_owned())),
            });
        }
    }

    /// Whether the application runs in production
    #[must_use]
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Render the configuration as TOML; secrets are never included
    pub fn to_redacted_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn override_int<T: FromStr>(env: &EnvSnapshot, name: &str, target: &mut T) {
    let Some(raw) = env.get(name) else {
        return;
    };
    let cleaned: String = raw.trim().chars().filter(|c| *c != '_').collect();
    match cleaned.parse::<T>() {
        Ok(value) => *target = value,
        Err(_) => debug!(variable = name, value = raw, "Ignoring malformed integer variable"),
    }
}

fn override_flag(env: &EnvSnapshot, name: &str, target: &mut bool) {
    if let Some(raw) = env.get(name) {
        *target = raw.eq_ignore_ascii_case("true");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> EnvSnapshot {
        EnvSnapshot::from_pairs(pairs.iter().copied())
    }

    fn missing_file() -> std::path::PathBuf {
        let dir = tempfile::tempdir().unwrap();
        dir.path().join("absent.toml")
    }

    #[test]
    fn defaults_without_any_source() {
        let config = AppConfig::load_from(None, &EnvSnapshot::default()).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.tasks.workers, 1);
        assert_eq!(config.security.session_expiry_secs, 2_592_000);
        assert_eq!(config.frontend.dev_server_port, 5173);
        assert_eq!(config.soft_delete.keep_deleted_for_days, 365);
        assert!(!config.auth.oidc_only);
        assert!(config.auth.providers.is_empty());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(AppConfig::load_from(Some(&missing_file()), &EnvSnapshot::default()).is_err());
    }

    #[test]
    fn raw_variables_override_defaults() {
        let snapshot = env(&[
            ("SECRET_KEY", "s3cret"),
            ("SQL_DATABASE", "/data/spendbook.db"),
            ("TASK_WORKERS", "4"),
            ("INTERNAL_PORT", " 9000 "),
            ("SESSION_EXPIRY_TIME", "3_600"),
            ("ENABLE_SOFT_DELETE", "TRUE"),
            ("KEEP_DELETED_TRANSACTIONS_FOR", "0"),
            ("DEMO", "true"),
        ]);
        let config = AppConfig::load_from(None, &snapshot).unwrap();

        assert_eq!(config.security.secret_key_str(), Some("s3cret"));
        assert_eq!(config.database.path, "/data/spendbook.db");
        assert_eq!(config.tasks.workers, 4);
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.security.session_expiry_secs, 3600);
        assert!(config.soft_delete.enabled);
        assert_eq!(config.soft_delete.retention_days(), None);
        assert!(config.security.demo);
    }

    #[test]
    fn malformed_integers_keep_defaults() {
        let snapshot = env(&[("TASK_WORKERS", "4a"), ("INTERNAL_PORT", "99999")]);
        let config = AppConfig::load_from(None, &snapshot).unwrap();
        assert_eq!(config.tasks.workers, 1);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn flags_are_true_only_for_true() {
        let snapshot = env(&[("ENABLE_SOFT_DELETE", "yes"), ("DEBUG", "True")]);
        let config = AppConfig::load_from(None, &snapshot).unwrap();
        assert!(!config.soft_delete.enabled);
        assert!(config.frontend.debug);
    }

    #[test]
    fn prefixed_variables_reach_nested_sections() {
        let snapshot = env(&[
            ("SPENDBOOK__SERVER__LOG_FORMAT", "json"),
            ("SPENDBOOK__DATABASE__MAX_CONNECTIONS", "12"),
            ("SPENDBOOK__ENVIRONMENT", "production"),
        ]);
        let config = AppConfig::load_from(None, &snapshot).unwrap();
        assert!(config.server.json_logs());
        assert_eq!(config.database.max_connections, 12);
        assert!(config.is_production());
    }

    #[test]
    fn file_providers_and_raw_oidc_provider_are_combined() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spendbook.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[auth]
oidc_only = true

[[auth.providers]]
id = "keycloak"
name = "Keycloak"
server_url = "https://sso.example.com/realms/main"
client_id = "spendbook"
"#
        )
        .unwrap();

        let only_file = AppConfig::load_from(Some(&path), &EnvSnapshot::default()).unwrap();
        assert!(only_file.auth.oidc_only);
        assert_eq!(only_file.auth.providers.len(), 1);

        let snapshot = env(&[
            ("OIDC_CLIENT_ID", "web"),
            ("OIDC_SERVER_URL", "https://id.example.org"),
            ("OIDC_CLIENT_SECRET", "hush"),
        ]);
        let combined = AppConfig::load_from(Some(&path), &snapshot).unwrap();
        assert_eq!(combined.auth.providers.len(), 2);
        assert_eq!(combined.auth.providers[1].name, "OpenID Connect");
    }

    #[test]
    fn oidc_only_raw_flag_can_disable_file_setting() {
        let mut config = AppConfig::default();
        config.auth.oidc_only = true;
        config.apply_raw_variables(&env(&[("OIDC_ONLY", "false")]));
        assert!(!config.auth.oidc_only);
    }

    #[test]
    fn redacted_toml_omits_secrets() {
        let mut config = AppConfig::default();
        config.apply_raw_variables(&env(&[
            ("SECRET_KEY", "do-not-print"),
            ("OIDC_CLIENT_ID", "web"),
            ("OIDC_CLIENT_SECRET", "also-hidden"),
        ]));
        let rendered = config.to_redacted_toml().unwrap();
        assert!(!rendered.contains("do-not-print"));
        assert!(!rendered.contains("also-hidden"));
        assert!(rendered.contains("[server]"));
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::default();
        config.apply_raw_variables(&env(&[("SECRET_KEY", "do-not-print")]));
        let debug = format!("{config:?}");
        assert!(!debug.contains("do-not-print"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn environment_parses_short_names() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("DEV".parse::<Environment>().unwrap(), Environment::Development);
        assert!("staging".parse::<Environment>().is_err());
        assert_eq!(Environment::Production.to_string(), "production");
    }
}
