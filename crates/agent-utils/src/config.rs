//! Configuration management utilities

use crate::LogFormat;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while reading configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or blank
    #[error("missing environment variable: {0}")]
    Missing(String),

    /// A value is present but unusable
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

/// Read an environment variable, treating blank values as unset
pub fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Tracing output format
    #[serde(default)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "stock-agents".to_string(),
            environment: "development".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    /// Build from `APP_ENV` and `LOG_FORMAT`, keeping defaults for unset keys
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(environment) = optional_env("APP_ENV") {
            config.environment = environment;
        }
        if let Some(format) = optional_env("LOG_FORMAT") {
            config.log_format = format.parse()?;
        }
        Ok(config)
    }

    /// True when running with `APP_ENV=production` (or `prod`)
    pub fn is_production(&self) -> bool {
        matches!(self.environment.as_str(), "production" | "prod")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_env() {
        assert!(optional_env("AGENT_UTILS_TEST_SURELY_UNSET").is_none());
    }

    #[test]
    fn test_config_deserializes_without_log_format() {
        let config: Config =
            serde_json::from_str(r#"{"app_name":"x","environment":"prod"}"#).unwrap();
        assert!(config.is_production());
        assert_eq!(config.log_format, LogFormat::Pretty);
    }
}
