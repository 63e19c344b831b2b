//! JSON Report Writer - ReportSink that renders reports as pretty JSON.

use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AnalysisReport, RecommendationReport, ReportSink};

/// Where rendered reports go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportTarget {
    Stdout,
    /// Overwritten on every publish.
    File(PathBuf),
}

/// Writes each published report as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonReportWriter {
    target: ReportTarget,
}

impl JsonReportWriter {
    pub fn new(target: ReportTarget) -> Self {
        Self { target }
    }

    pub fn stdout() -> Self {
        Self::new(ReportTarget::Stdout)
    }

    async fn write<T: Serialize + Sync>(&self, value: &T) -> Result<(), DomainError> {
        let mut rendered = serde_json::to_string_pretty(value)
            .map_err(|e| DomainError::new(ErrorCode::InternalError, e.to_string()))?;
        rendered.push('\n');

        match &self.target {
            ReportTarget::Stdout => {
                let mut out = tokio::io::stdout();
                out.write_all(rendered.as_bytes())
                    .await
                    .map_err(sink_error)?;
                out.flush().await.map_err(sink_error)?;
            }
            ReportTarget::File(path) => {
                fs::write(path, rendered).await.map_err(sink_error)?;
                debug!(path = %path.display(), "Report written");
            }
        }
        Ok(())
    }
}

fn sink_error(err: std::io::Error) -> DomainError {
    DomainError::new(ErrorCode::SinkUnavailable, format!("IO error: {}", err))
}

#[async_trait]
impl ReportSink for JsonReportWriter {
    async fn publish_report(&self, report: &AnalysisReport) -> Result<(), DomainError> {
        self.write(report).await
    }

    async fn publish_recommendations(
        &self,
        report: &RecommendationReport,
    ) -> Result<(), DomainError> {
        self.write(report).await
    }
}
