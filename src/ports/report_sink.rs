//! ReportSink port - receives computed results for audit export.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::analysis::{
    AnalysisError, CausalChain, ContextMetrics, ContextSignals, EngineSettings, MaturityRank,
    Scorecard,
};
use crate::domain::foundation::{AnalysisRunId, ContextId, DomainError, RecordId, Timestamp};

/// Consumer of engine output. Implementations format and persist; the engine
/// only hands over finished values.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Publishes a full analysis report.
    async fn publish_report(&self, report: &AnalysisReport) -> Result<(), DomainError>;

    /// Publishes ranked scorecards for one open cause.
    async fn publish_recommendations(
        &self,
        report: &RecommendationReport,
    ) -> Result<(), DomainError>;
}

/// Why a context could not be analyzed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextFailure {
    /// `ErrorCode` rendered as SCREAMING_SNAKE_CASE.
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record: Option<RecordId>,
}

impl From<&AnalysisError> for ContextFailure {
    fn from(err: &AnalysisError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
            record: err.record().cloned(),
        }
    }
}

/// Result of analyzing one context. Failures stay local to their context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ContextOutcome {
    Analyzed {
        chains: Vec<CausalChain>,
        metrics: ContextMetrics,
    },
    Failed(ContextFailure),
}

impl ContextOutcome {
    pub fn metrics(&self) -> Option<&ContextMetrics> {
        match self {
            ContextOutcome::Analyzed { metrics, .. } => Some(metrics),
            ContextOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ContextOutcome::Failed(_))
    }
}

/// Envelope of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub run_id: AnalysisRunId,
    pub generated_at: Timestamp,
    /// SHA-256 of the analyzed snapshot.
    pub snapshot_fingerprint: String,
    pub record_count: usize,
    pub settings: EngineSettings,
    pub contexts: BTreeMap<ContextId, ContextOutcome>,
    /// Ranking over the successfully analyzed contexts only.
    pub maturity: Vec<MaturityRank>,
    /// Description signals of every selected context, failed ones included.
    pub signals: BTreeMap<ContextId, ContextSignals>,
}

impl AnalysisReport {
    pub fn failed_contexts(&self) -> impl Iterator<Item = (&ContextId, &ContextOutcome)> {
        self.contexts.iter().filter(|(_, outcome)| outcome.is_failed())
    }
}

/// Ranked scorecards for one open cause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationReport {
    pub run_id: AnalysisRunId,
    pub generated_at: Timestamp,
    pub snapshot_fingerprint: String,
    pub context: ContextId,
    pub cause: RecordId,
    pub scorecards: Vec<Scorecard>,
}

impl RecommendationReport {
    pub fn top(&self) -> Option<&Scorecard> {
        self.scorecards.first()
    }
}
