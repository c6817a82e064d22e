//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "GATEWAY_BIND_ADDRESS";
/// Environment variable overriding `upstream.url`.
pub const ENV_UPSTREAM_URL: &str = "GATEWAY_UPSTREAM_URL";
/// Environment variable overriding `timeouts.request_secs`.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "GATEWAY_REQUEST_TIMEOUT_SECS";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "GATEWAY_LOG_LEVEL";
/// Environment variable overriding `health.bind_address`.
pub const ENV_HEALTH_BIND_ADDRESS: &str = "HEALTH_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, then apply environment
/// overrides. The result is not validated yet; see [`finalize`].
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Overlay environment values onto `config`.
///
/// `lookup` resolves a variable name to its value, if set.
pub fn apply_env_overrides<F>(mut config: GatewayConfig, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup(ENV_BIND_ADDRESS) {
        config.listener.bind_address = value;
    }
    if let Some(value) = lookup(ENV_UPSTREAM_URL) {
        config.upstream.url = value;
    }
    if let Some(value) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
        config.timeouts.request_secs = value.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_REQUEST_TIMEOUT_SECS,
            value,
        })?;
    }
    if let Some(value) = lookup(ENV_LOG_LEVEL) {
        config.observability.log_level = value;
    }
    if let Some(value) = lookup(ENV_HEALTH_BIND_ADDRESS) {
        config.health.bind_address = value;
    }
    Ok(config)
}

/// Validate a fully assembled configuration.
pub fn finalize(config: GatewayConfig) -> Result<GatewayConfig, ConfigError> {
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides_apply() {
        let config = apply_env_overrides(
            GatewayConfig::default(),
            env(&[
                (ENV_UPSTREAM_URL, "http://127.0.0.1:9999"),
                (ENV_REQUEST_TIMEOUT_SECS, "5"),
                (ENV_BIND_ADDRESS, "127.0.0.1:18000"),
            ]),
        )
        .unwrap();

        assert_eq!(config.upstream.url, "http://127.0.0.1:9999");
        assert_eq!(config.timeouts.request_secs, 5);
        assert_eq!(config.listener.bind_address, "127.0.0.1:18000");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_bad_timeout_env_is_rejected() {
        let err = apply_env_overrides(
            GatewayConfig::default(),
            env(&[(ENV_REQUEST_TIMEOUT_SECS, "soon")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Env { name: ENV_REQUEST_TIMEOUT_SECS, .. }));
    }

    #[test]
    fn test_finalize_reports_validation_errors() {
        let mut config = GatewayConfig::default();
        config.upstream.url = "nope".into();
        let err = finalize(config).unwrap_err();
        assert!(err.to_string().starts_with("Validation failed: upstream.url"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
