//! In-memory adapters for tests and embedding.

mod record_store;
mod report_sink;

pub use record_store::InMemoryRecordStore;
pub use report_sink::InMemoryReportSink;
