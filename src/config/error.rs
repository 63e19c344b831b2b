//! Configuration error types

use thiserror::Error;

use crate::domain::analysis::AnalysisError;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid engine option '{option}': {reason}")]
    InvalidEngineOption { option: String, reason: String },

    #[error("Unsupported snapshot format for '{0}' (expected .json, .yaml or .yml)")]
    UnsupportedSnapshotFormat(String),

    #[error("Log level filter must not be empty")]
    EmptyLogLevel,
}

impl From<AnalysisError> for ValidationError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidConfiguration { option, reason } => {
                ValidationError::InvalidEngineOption { option, reason }
            }
            other => ValidationError::InvalidEngineOption {
                option: "engine".to_string(),
                reason: other.to_string(),
            },
        }
    }
}
