//! Filesystem adapters: snapshot files in, JSON reports out.

mod json_report_writer;
mod snapshot_file;

pub use json_report_writer::{JsonReportWriter, ReportTarget};
pub use snapshot_file::{FileRecordSource, SnapshotDocument, SnapshotFormat};
