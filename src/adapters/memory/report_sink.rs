//! In-Memory Report Sink Adapter
//!
//! Collects published reports so tests can inspect them.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{AnalysisReport, RecommendationReport, ReportSink};

/// In-memory sink keeping every published report
#[derive(Debug, Clone, Default)]
pub struct InMemoryReportSink {
    reports: Arc<RwLock<Vec<AnalysisReport>>>,
    recommendations: Arc<RwLock<Vec<RecommendationReport>>>,
    fail_publish: bool,
}

impl InMemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that rejects every publish with `SinkUnavailable`
    pub fn failing() -> Self {
        Self {
            fail_publish: true,
            ..Self::default()
        }
    }

    /// All analysis reports published so far
    pub async fn reports(&self) -> Vec<AnalysisReport> {
        self.reports.read().await.clone()
    }

    /// All recommendation reports published so far
    pub async fn recommendations(&self) -> Vec<RecommendationReport> {
        self.recommendations.read().await.clone()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.fail_publish {
            return Err(DomainError::new(
                ErrorCode::SinkUnavailable,
                "In-memory report sink is marked unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ReportSink for InMemoryReportSink {
    async fn publish_report(&self, report: &AnalysisReport) -> Result<(), DomainError> {
        self.check_available()?;
        self.reports.write().await.push(report.clone());
        Ok(())
    }

    async fn publish_recommendations(
        &self,
        report: &RecommendationReport,
    ) -> Result<(), DomainError> {
        self.check_available()?;
        self.recommendations.write().await.push(report.clone());
        Ok(())
    }
}
