//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the analysis engine to external systems:
//! - `memory` - In-memory record store and report sink (tests, embedding)
//! - `file` - JSON/YAML snapshot files and JSON report output
//! - `narrative` - Rule-based import of free-text narratives

pub mod file;
pub mod memory;
pub mod narrative;

pub use file::{FileRecordSource, JsonReportWriter, ReportTarget, SnapshotDocument, SnapshotFormat};
pub use memory::{InMemoryRecordStore, InMemoryReportSink};
pub use narrative::{NarrativeImporter, NarrativeRecordSource};
