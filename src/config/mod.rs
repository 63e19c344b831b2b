//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! and an optional config file using the `config` and `dotenvy` crates.
//! Environment variables use the `DECISION_DEBT` prefix and nested values use
//! double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use decision_debt::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! let settings = config.validate().expect("Invalid configuration");
//!
//! println!("Cause-only debt weight: {}", settings.debt.cause_only());
//! ```

mod engine;
mod error;
mod logging;
mod source;

pub use engine::{DebtConfig, EngineConfig, RecommendationConfig, SupportConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};
pub use source::SourceConfig;

use serde::Deserialize;
use std::path::Path;

use crate::domain::analysis::EngineSettings;

/// Root application configuration
///
/// Every section has defaults, so an empty environment is a valid
/// configuration. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Debt weights, recommendation weights and support policy
    #[serde(default)]
    pub engine: EngineConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Default record source
    #[serde(default)]
    pub source: SourceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DECISION_DEBT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DECISION_DEBT__ENGINE__DEBT__CAUSE_ONLY=4` -> `engine.debt.cause_only = 4`
    /// - `DECISION_DEBT__LOGGING__FORMAT=json` -> `logging.format = json`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_file(None)
    }

    /// Load configuration from an optional file, then environment variables.
    ///
    /// The file format follows its extension (TOML, YAML, JSON). Environment
    /// variables take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing or unreadable, or if
    /// values cannot be parsed into expected types.
    pub fn load_with_file(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::default()
                    .prefix("DECISION_DEBT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values and build the engine settings
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<EngineSettings, ValidationError> {
        self.logging.validate()?;
        self.source.validate()?;
        self.engine.to_settings()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DECISION_DEBT__ENGINE__DEBT__CAUSE_ONLY",
        "DECISION_DEBT__ENGINE__RECOMMENDATION__SUPPORT_WEIGHT",
        "DECISION_DEBT__ENGINE__SUPPORT__METRIC",
        "DECISION_DEBT__LOGGING__FORMAT",
        "DECISION_DEBT__SOURCE__SNAPSHOT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let config = AppConfig::load().unwrap();

        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.source.snapshot.is_none());
        assert_eq!(config.validate().unwrap(), EngineSettings::default());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_DEBT__ENGINE__DEBT__CAUSE_ONLY", "4.5");
        env::set_var("DECISION_DEBT__ENGINE__SUPPORT__METRIC", "overlap");
        env::set_var("DECISION_DEBT__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.debt.cause_only, 4.5);
        assert!(config.logging.is_json());

        let settings = config.validate().unwrap();
        assert_eq!(settings.debt.cause_only(), 4.5);
    }

    #[test]
    fn test_invalid_weight_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_DEBT__ENGINE__RECOMMENDATION__SUPPORT_WEIGHT", "-2");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidEngineOption { .. })
        ));
    }

    #[test]
    fn test_unsupported_snapshot_extension_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DECISION_DEBT__SOURCE__SNAPSHOT", "records.txt");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(
            result.unwrap().validate(),
            Err(ValidationError::UnsupportedSnapshotFormat(_))
        ));
    }

    #[test]
    fn test_file_values_are_overridden_by_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[engine.debt]\ncause_only = 2.0\norphan = 0.25").unwrap();

        env::set_var("DECISION_DEBT__ENGINE__DEBT__CAUSE_ONLY", "6");
        let result = AppConfig::load_with_file(Some(file.path()));
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.engine.debt.cause_only, 6.0);
        assert_eq!(config.engine.debt.orphan, 0.25);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let result = AppConfig::load_with_file(Some(Path::new("/nonexistent/decision-debt.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
