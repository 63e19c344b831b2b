//! Record source configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::adapters::SnapshotFormat;

use super::error::ValidationError;

/// Where records are read from when no path is given on the command line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    /// Default snapshot file (`.json`, `.yaml` or `.yml`)
    pub snapshot: Option<PathBuf>,
}

impl SourceConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(path) = &self.snapshot {
            if SnapshotFormat::from_path(path).is_none() {
                return Err(ValidationError::UnsupportedSnapshotFormat(
                    path.display().to_string(),
                ));
            }
        }
        Ok(())
    }
}
