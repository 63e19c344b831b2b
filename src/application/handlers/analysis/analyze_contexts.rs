//! AnalyzeContextsHandler - builds chains, metrics and the maturity ranking.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::analysis::{EngineSettings, MaturityComparator, SignalAnalyzer};
use crate::domain::foundation::{AnalysisRunId, ContextId, DomainError, ErrorCode, Timestamp};
use crate::ports::{AnalysisReport, RecordSource, ReportSink};

use super::context_fan_out::analyze_contexts;

/// Command to analyze some or all contexts of the record store.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeContextsCommand {
    /// Contexts to analyze. Empty means every context in the snapshot.
    pub contexts: Vec<ContextId>,
}

impl AnalyzeContextsCommand {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(contexts: Vec<ContextId>) -> Self {
        Self { contexts }
    }
}

/// Handler for full analysis runs.
pub struct AnalyzeContextsHandler {
    source: Arc<dyn RecordSource>,
    sink: Arc<dyn ReportSink>,
    settings: EngineSettings,
}

impl AnalyzeContextsHandler {
    pub fn new(
        source: Arc<dyn RecordSource>,
        sink: Arc<dyn ReportSink>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            source,
            sink,
            settings,
        }
    }

    /// Runs the analysis and publishes the report.
    ///
    /// # Errors
    /// - `ContextNotFound` when a requested context has no records
    /// - Source and sink errors are passed through
    ///
    /// Per-context faults (malformed links, cycles) do not fail the run; they
    /// are reported as failed contexts and left out of the maturity ranking.
    pub async fn handle(&self, cmd: AnalyzeContextsCommand) -> Result<AnalysisReport, DomainError> {
        let snapshot = self.source.load_snapshot().await?;
        let available = snapshot.contexts();

        let contexts = if cmd.contexts.is_empty() {
            available
        } else {
            let mut requested = cmd.contexts;
            requested.sort();
            requested.dedup();
            if let Some(missing) = requested.iter().find(|c| !available.contains(c)) {
                return Err(DomainError::new(
                    ErrorCode::ContextNotFound,
                    format!("Context '{}' has no records", missing),
                )
                .with_detail("context", missing.as_str()));
            }
            requested
        };

        debug!(
            contexts = contexts.len(),
            records = snapshot.len(),
            "Starting analysis run"
        );

        let snapshot = snapshot.restricted_to(&contexts);
        let fingerprint = snapshot.fingerprint();
        let record_count = snapshot.len();
        let signals = SignalAnalyzer::analyze_all(&snapshot)?;
        let outcomes = analyze_contexts(Arc::new(snapshot), contexts, self.settings.debt).await?;

        let analyzed: BTreeMap<_, _> = outcomes
            .iter()
            .filter_map(|(context, outcome)| {
                outcome.metrics().map(|m| (context.clone(), m.clone()))
            })
            .collect();
        let maturity = MaturityComparator::compare(&analyzed);

        let report = AnalysisReport {
            run_id: AnalysisRunId::new(),
            generated_at: Timestamp::now(),
            snapshot_fingerprint: fingerprint,
            record_count,
            settings: self.settings,
            contexts: outcomes,
            maturity,
            signals,
        };

        self.sink.publish_report(&report).await?;

        info!(
            run_id = %report.run_id,
            analyzed = analyzed.len(),
            failed = report.failed_contexts().count(),
            "Analysis run complete"
        );

        Ok(report)
    }
}
