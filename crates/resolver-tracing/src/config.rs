//! Tracing configuration
//!
//! Settings can be built in code or read from the environment:
//!
//! - `RESOLVER_TRACING_ENABLED`: `true`/`false` (also `1`/`0`, `yes`/`no`, `on`/`off`)
//! - `RESOLVER_TRACING_EXTENSION_KEY`: extensions key for the report

use crate::error::ConfigError;
use crate::report::DEFAULT_EXTENSION_KEY;

pub const ENV_ENABLED: &str = "RESOLVER_TRACING_ENABLED";
pub const ENV_EXTENSION_KEY: &str = "RESOLVER_TRACING_EXTENSION_KEY";

/// Tracing configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Trace executions at all. When false every execution is skipped.
    pub enabled: bool,

    /// Extensions key the report is written to
    pub extension_key: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            extension_key: DEFAULT_EXTENSION_KEY.to_string(),
        }
    }
}

impl TracingConfig {
    /// Create a new config builder
    pub fn builder() -> TracingConfigBuilder {
        TracingConfigBuilder::new()
    }

    /// Create config from environment variables, falling back to defaults
    /// for anything missing or invalid.
    pub fn from_env() -> Self {
        Self::try_from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Ignoring invalid tracing configuration");
            Self::default()
        })
    }

    /// Create config from environment variables, rejecting invalid values.
    pub fn try_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_ENABLED) {
            config.enabled = parse_bool(&raw)
                .ok_or_else(|| ConfigError::invalid_value(ENV_ENABLED, &raw, "expected a boolean"))?;
        }

        if let Some(raw) = lookup(ENV_EXTENSION_KEY) {
            let key = raw.trim();
            if key.is_empty() {
                return Err(ConfigError::invalid_value(
                    ENV_EXTENSION_KEY,
                    raw.as_str(),
                    "must not be empty",
                ));
            }
            config.extension_key = key.to_string();
        }

        Ok(config)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Builder for TracingConfig
pub struct TracingConfigBuilder {
    config: TracingConfig,
}

impl TracingConfigBuilder {
    /// Create a new builder with defaults
    pub fn new() -> Self {
        Self {
            config: TracingConfig::default(),
        }
    }

    /// Enable or disable tracing
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the extensions key
    pub fn extension_key(mut self, key: impl Into<String>) -> Self {
        self.config.extension_key = key.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> TracingConfig {
        self.config
    }
}

impl Default for TracingConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert!(config.enabled);
        assert_eq!(config.extension_key, "tracing");
    }

    #[test]
    fn test_builder() {
        let config = TracingConfig::builder()
            .enabled(false)
            .extension_key("timing")
            .build();

        assert!(!config.enabled);
        assert_eq!(config.extension_key, "timing");
    }

    #[test]
    fn test_lookup_defaults_when_unset() {
        let config = TracingConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, TracingConfig::default());
    }

    #[test]
    fn test_lookup_reads_values() {
        let config = TracingConfig::from_lookup(lookup(&[
            (ENV_ENABLED, "Off"),
            (ENV_EXTENSION_KEY, " apolloTracing "),
        ]))
        .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.extension_key, "apolloTracing");
    }

    #[test]
    fn test_lookup_rejects_bad_bool() {
        let err = TracingConfig::from_lookup(lookup(&[(ENV_ENABLED, "sometimes")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref variable, .. } if variable == ENV_ENABLED));
    }

    #[test]
    fn test_lookup_rejects_empty_key() {
        let err = TracingConfig::from_lookup(lookup(&[(ENV_EXTENSION_KEY, "  ")])).unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }
}
