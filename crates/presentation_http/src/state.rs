//! Application state shared across handlers

use std::sync::Arc;

use application::{AuthService, PreferenceService, UserService};
use infrastructure::{AppConfig, EnvSnapshot, StartupValidator};

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Login, logout and session resolution
    pub auth: Arc<AuthService>,
    /// Account administration
    pub users: Arc<UserService>,
    /// Per-user and per-session preferences
    pub preferences: Arc<PreferenceService>,
    /// Resolved configuration
    pub config: Arc<AppConfig>,
    /// Environment captured at startup, re-checked by `/v1/system/checks`
    pub env: Arc<EnvSnapshot>,
    pub validator: Arc<StartupValidator>,
}
