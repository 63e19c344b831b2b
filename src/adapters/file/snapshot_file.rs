//! Snapshot File Adapter - reads and writes record snapshots as JSON or YAML.
//!
//! # File layout
//!
//! ```yaml
//! records:
//!   - id: C1
//!     kind: cause
//!     context: TeamA
//!     timestamp: 2024-03-01T10:00:00Z
//!     links: [A1]
//!     tags: { system: db }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::record::{Record, RecordSnapshot};
use crate::ports::RecordSource;

/// Serialization format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// `.json` is JSON, `.yaml` / `.yml` are YAML. Case-insensitive.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(SnapshotFormat::Json),
            "yaml" | "yml" => Some(SnapshotFormat::Yaml),
            _ => None,
        }
    }

    pub fn parse(&self, content: &str) -> Result<SnapshotDocument, DomainError> {
        match self {
            SnapshotFormat::Json => serde_json::from_str(content).map_err(|e| {
                DomainError::new(ErrorCode::ValidationFailed, format!("Invalid JSON snapshot: {}", e))
            }),
            SnapshotFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
                DomainError::new(ErrorCode::ValidationFailed, format!("Invalid YAML snapshot: {}", e))
            }),
        }
    }

    pub fn render(&self, document: &SnapshotDocument) -> Result<String, DomainError> {
        match self {
            SnapshotFormat::Json => serde_json::to_string_pretty(document)
                .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string())),
            SnapshotFormat::Yaml => serde_yaml::to_string(document)
                .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string())),
        }
    }
}

/// On-disk shape of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub records: Vec<Record>,
}

impl SnapshotDocument {
    pub fn into_snapshot(self) -> Result<RecordSnapshot, DomainError> {
        Ok(RecordSnapshot::from_records(self.records)?)
    }
}

impl From<RecordSnapshot> for SnapshotDocument {
    fn from(snapshot: RecordSnapshot) -> Self {
        Self {
            records: snapshot.into_records(),
        }
    }
}

/// Record source backed by one snapshot file.
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn format(&self) -> Result<SnapshotFormat, DomainError> {
        SnapshotFormat::from_path(&self.path).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ValidationFailed,
                "Snapshot file must end in .json, .yaml or .yml",
            )
            .with_detail("path", self.path.display().to_string())
        })
    }

    /// Writes `snapshot` to this source's path in the matching format.
    pub async fn write_snapshot(&self, snapshot: RecordSnapshot) -> Result<(), DomainError> {
        let format = self.format()?;
        let content = format.render(&SnapshotDocument::from(snapshot))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, content).await.map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "Snapshot written");
        Ok(())
    }

    fn io_error(&self, err: std::io::Error) -> DomainError {
        DomainError::new(ErrorCode::SourceUnavailable, format!("IO error: {}", err))
            .with_detail("path", self.path.display().to_string())
    }
}

#[async_trait]
impl RecordSource for FileRecordSource {
    async fn load_snapshot(&self) -> Result<RecordSnapshot, DomainError> {
        let format = self.format()?;

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        let snapshot = format.parse(&content)?.into_snapshot()?;
        debug!(
            path = %self.path.display(),
            records = snapshot.len(),
            "Snapshot loaded"
        );
        Ok(snapshot)
    }
}
