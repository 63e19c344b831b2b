//! RecommendActionsHandler - ranks candidate actions for an open cause.

use std::sync::Arc;

use tokio::task;
use tracing::{debug, info};

use crate::domain::analysis::{
    AnalysisError, ChainBuilder, CoverageAnalyzer, EngineSettings, RecommendationEngine,
    RecommendationInput, RecommendationSummary, Scorecard,
};
use crate::domain::foundation::{AnalysisRunId, ContextId, DomainError, ErrorCode, RecordId, Timestamp};
use crate::domain::record::RecordSnapshot;
use crate::ports::{RecommendationReport, RecordSource, ReportSink};

/// Where the candidate actions come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateSelection {
    /// Exactly these actions, in any order.
    Explicit(Vec<RecordId>),
    /// Every action in the cause's context the cause does not yet reach.
    FromHistory,
}

/// Command to rank candidate actions for one open cause.
#[derive(Debug, Clone)]
pub struct RecommendActionsCommand {
    pub cause: RecordId,
    pub candidates: CandidateSelection,
}

/// Result of a recommendation request.
#[derive(Debug, Clone)]
pub struct RecommendActionsResult {
    pub report: RecommendationReport,
    pub summary: RecommendationSummary,
}

/// Handler for recommendation requests.
pub struct RecommendActionsHandler {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn ReportSink>,
    engine: RecommendationEngine,
}

impl RecommendActionsHandler {
    pub fn new(
        source: Arc<dyn RecordSource>,
        sink: Arc<dyn ReportSink>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            source,
            sink,
            engine: RecommendationEngine::new(settings),
        }
    }

    /// Ranks the candidates and publishes the scorecards.
    ///
    /// # Errors
    /// - `RecordNotFound` / `InvalidRecordKind` for a bad cause or candidate
    /// - `NoCandidates` when the selection is empty
    /// - `MalformedLink` / `CycleDetected` when the cause's context is broken
    pub async fn handle(
        &self,
        cmd: RecommendActionsCommand,
    ) -> Result<RecommendActionsResult, DomainError> {
        let snapshot = self.source.load_snapshot().await?;
        let fingerprint = snapshot.fingerprint();

        let candidates = match cmd.candidates {
            CandidateSelection::Explicit(ids) => ids,
            CandidateSelection::FromHistory => {
                RecommendationEngine::history_candidates(&snapshot, &cmd.cause)?
            }
        };

        debug!(
            cause = %cmd.cause,
            candidates = candidates.len(),
            "Scoring candidate actions"
        );

        let engine = self.engine.clone();
        let cause = cmd.cause.clone();
        let (context, scorecards) =
            task::spawn_blocking(move || rank(&engine, &snapshot, &cause, &candidates))
                .await
                .map_err(|e| {
                    DomainError::new(
                        ErrorCode::InternalError,
                        format!("Recommendation task failed: {}", e),
                    )
                })??;

        let summary = RecommendationSummary::from_ranked(cmd.cause.clone(), scorecards.clone())
            .ok_or_else(|| {
                DomainError::from(AnalysisError::NoCandidates {
                    cause: cmd.cause.clone(),
                })
            })?;

        let report = RecommendationReport {
            run_id: AnalysisRunId::new(),
            generated_at: Timestamp::now(),
            snapshot_fingerprint: fingerprint,
            context,
            cause: cmd.cause,
            scorecards,
        };

        self.sink.publish_recommendations(&report).await?;

        info!(
            run_id = %report.run_id,
            cause = %report.cause,
            top = %summary.top.candidate,
            score = summary.top.final_score,
            "Recommendation complete"
        );

        Ok(RecommendActionsResult { report, summary })
    }
}

fn rank(
    engine: &RecommendationEngine,
    snapshot: &RecordSnapshot,
    cause: &RecordId,
    candidates: &[RecordId],
) -> Result<(ContextId, Vec<Scorecard>), AnalysisError> {
    let context = snapshot
        .get(cause)
        .map(|r| r.context.clone())
        .ok_or_else(|| AnalysisError::UnknownRecord {
            record: cause.clone(),
        })?;

    let chains = ChainBuilder::build_context(snapshot, &context)?;
    let metrics = CoverageAnalyzer::analyze(&chains, &context, &engine.settings().debt);
    let input = RecommendationInput {
        snapshot,
        chains: &chains,
        metrics: &metrics,
    };

    let scorecards = engine.recommend(&input, cause, candidates)?;
    Ok((context, scorecards))
}
