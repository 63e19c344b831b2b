//! Per-context fan-out of chain building and coverage analysis.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::task;
use tracing::warn;

use crate::domain::analysis::{ChainBuilder, CoverageAnalyzer, DebtWeights};
use crate::domain::foundation::{ContextId, DomainError, ErrorCode};
use crate::domain::record::RecordSnapshot;
use crate::ports::{ContextFailure, ContextOutcome};

/// Analyzes each context on its own blocking task.
///
/// A malformed link or cycle fails only its own context. The only error
/// returned is a task that could not be joined.
pub(crate) async fn analyze_contexts(
    snapshot: Arc<RecordSnapshot>,
    contexts: Vec<ContextId>,
    weights: DebtWeights,
) -> Result<BTreeMap<ContextId, ContextOutcome>, DomainError> {
    let tasks = contexts.into_iter().map(|context| {
        let snapshot = Arc::clone(&snapshot);
        task::spawn_blocking(move || {
            let outcome = match ChainBuilder::build_context(&snapshot, &context) {
                Ok(chains) => {
                    let metrics = CoverageAnalyzer::analyze(&chains, &context, &weights);
                    ContextOutcome::Analyzed { chains, metrics }
                }
                Err(err) => ContextOutcome::Failed(ContextFailure::from(&err)),
            };
            (context, outcome)
        })
    });

    let mut outcomes = BTreeMap::new();
    for joined in join_all(tasks).await {
        let (context, outcome) = joined.map_err(|e| {
            DomainError::new(ErrorCode::InternalError, format!("Analysis task failed: {}", e))
        })?;

        if let ContextOutcome::Failed(failure) = &outcome {
            warn!(
                context = %context,
                code = %failure.code,
                error = %failure.message,
                "Context analysis failed"
            );
        }
        outcomes.insert(context, outcome);
    }
    Ok(outcomes)
}
