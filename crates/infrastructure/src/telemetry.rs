//! Tracing subscriber setup shared by the binaries

use tracing_subscriber::{
    EnvFilter,
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
};

/// Output format of the fmt layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl LogFormat {
    /// `"json"` (any case) selects JSON; everything else is text
    #[must_use]
    pub fn from_setting(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Text
        }
    }
}

/// Build the filter from `RUST_LOG`, falling back to `default_filter`
#[must_use]
pub fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Install the global subscriber
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(format: LogFormat, default_filter: &str) -> Result<(), TryInitError> {
    let registry = tracing_subscriber::registry().with(env_filter(default_filter));
    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .try_init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_from_setting() {
        assert_eq!(LogFormat::from_setting("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::from_setting("text"), LogFormat::Text);
        assert_eq!(LogFormat::from_setting("pretty"), LogFormat::Text);
    }

    #[test]
    fn second_init_is_rejected() {
        let _ = init_tracing(LogFormat::Text, "warn");
        assert!(init_tracing(LogFormat::Json, "warn").is_err());
    }
}
