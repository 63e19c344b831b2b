//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the analysis engine and the outside world. Adapters implement these ports.
//!
//! - `RecordSource` - Supplies the record snapshot to analyze
//! - `ReportSink` - Receives analysis reports and ranked scorecards

mod record_source;
mod report_sink;

pub use record_source::RecordSource;
pub use report_sink::{
    AnalysisReport, ContextFailure, ContextOutcome, RecommendationReport, ReportSink,
};
