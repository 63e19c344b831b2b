//! Recommendation Engine - deterministic ranking of candidate actions.

use std::collections::BTreeSet;

use crate::domain::foundation::{RecordId, RecordKind};
use crate::domain::record::{Record, RecordSnapshot};

use super::chain_builder::reachable_from;
use super::{
    AnalysisError, CausalChain, Completeness, ContextMetrics, CoverageMetric, EngineSettings,
    Evidence, RecommendationSummary, Scorecard, Signal, SubScores,
};

/// Everything the engine reads for one recommendation request.
///
/// `chains` may span several contexts; only those of the open cause's context
/// are used. `metrics` must be the metrics of that context.
#[derive(Debug, Clone, Copy)]
pub struct RecommendationInput<'a> {
    pub snapshot: &'a RecordSnapshot,
    pub chains: &'a [CausalChain],
    pub metrics: &'a ContextMetrics,
}

/// Outcome of linking one candidate to the open cause, computed on a copy of
/// the chain set.
struct LinkSimulation {
    before: Completeness,
    after: Completeness,
    absorbed_orphan: Option<Completeness>,
    action_ratio_after: f64,
}

/// Scores candidate actions for an open cause.
#[derive(Debug, Clone, Default)]
pub struct RecommendationEngine {
    settings: EngineSettings,
}

impl RecommendationEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Ranks `candidates` for `open_cause`, best first.
    ///
    /// # Algorithm
    /// Each candidate gets four sub-scores (coverage, support, constraint,
    /// debt) combined with the normalized recommendation weights. Sorted by
    /// final score descending, ties broken by candidate identifier ascending.
    ///
    /// # Errors
    /// - `NoCandidates` when `candidates` is empty
    /// - `UnknownRecord` when the cause or a candidate is not in the snapshot
    /// - `InvalidRecordKind` when the cause is not a Cause or a candidate is
    ///   not an Action
    /// - `DuplicateRecord` when a candidate is listed twice
    pub fn recommend(
        &self,
        input: &RecommendationInput<'_>,
        open_cause: &RecordId,
        candidates: &[RecordId],
    ) -> Result<Vec<Scorecard>, AnalysisError> {
        let cause = lookup(input.snapshot, open_cause, RecordKind::Cause)?;

        if candidates.is_empty() {
            return Err(AnalysisError::NoCandidates {
                cause: open_cause.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        let mut resolved = Vec::with_capacity(candidates.len());
        for id in candidates {
            if !seen.insert(id) {
                return Err(AnalysisError::DuplicateRecord { record: id.clone() });
            }
            resolved.push(lookup(input.snapshot, id, RecordKind::Action)?);
        }

        let context_chains: Vec<&CausalChain> = input
            .chains
            .iter()
            .filter(|c| c.context == cause.context)
            .collect();

        let mut scorecards: Vec<Scorecard> = resolved
            .into_iter()
            .map(|candidate| self.score(input, cause, candidate, &context_chains))
            .collect();

        scorecards.sort_by(|a, b| {
            b.final_score
                .total_cmp(&a.final_score)
                .then_with(|| a.candidate.cmp(&b.candidate))
        });
        for (i, card) in scorecards.iter_mut().enumerate() {
            card.rank = i + 1;
        }
        Ok(scorecards)
    }

    /// Ranks candidates and keeps the top pick plus up to three alternatives.
    pub fn summarize(
        &self,
        input: &RecommendationInput<'_>,
        open_cause: &RecordId,
        candidates: &[RecordId],
    ) -> Result<RecommendationSummary, AnalysisError> {
        let ranked = self.recommend(input, open_cause, candidates)?;
        RecommendationSummary::from_ranked(open_cause.clone(), ranked).ok_or_else(|| {
            AnalysisError::NoCandidates {
                cause: open_cause.clone(),
            }
        })
    }

    /// Every Action in the cause's context that the cause does not already
    /// reach, directly or through other records, in ascending identifier
    /// order.
    pub fn history_candidates(
        snapshot: &RecordSnapshot,
        open_cause: &RecordId,
    ) -> Result<Vec<RecordId>, AnalysisError> {
        let cause = lookup(snapshot, open_cause, RecordKind::Cause)?;
        let reached: BTreeSet<&RecordId> = reachable_from(snapshot, cause)
            .into_iter()
            .map(|r| &r.id)
            .collect();
        Ok(snapshot
            .in_context(&cause.context)
            .filter(|r| r.is_action() && !reached.contains(&r.id))
            .map(|r| r.id.clone())
            .collect())
    }

    fn score(
        &self,
        input: &RecommendationInput<'_>,
        cause: &Record,
        candidate: &Record,
        context_chains: &[&CausalChain],
    ) -> Scorecard {
        let simulation = simulate_link(input.snapshot, cause, candidate, context_chains);
        let action_ratio_before = input.metrics.coverage.action_ratio.value();

        let mut evidence = Vec::with_capacity(4);

        let coverage = (simulation.action_ratio_after - action_ratio_before).max(0.0);
        evidence.push(Evidence::new(
            Signal::Coverage,
            format!(
                "action coverage {:.3} -> {:.3}",
                action_ratio_before, simulation.action_ratio_after
            ),
        ));

        let (support, precedents) = self.support(input.snapshot, cause, candidate, context_chains);
        evidence.push(
            Evidence::new(
                Signal::Support,
                format!(
                    "{} of {} chains are complete precedents with a similar cause and action",
                    precedents.len(),
                    context_chains.len()
                ),
            )
            .with_records(precedents),
        );

        let (constraint, matched) = constraint_fit(cause, candidate);
        let constraint_detail = if cause.tags.is_empty() {
            "cause carries no constraints".to_string()
        } else {
            format!("matches {} of {} cause tags", matched, cause.tags.len())
        };
        evidence.push(Evidence::new(Signal::Constraint, constraint_detail));

        let (debt, debt_evidence) = self.debt_reduction(cause, candidate, &simulation);
        evidence.push(debt_evidence);

        let sub_scores = SubScores {
            coverage,
            support,
            constraint,
            debt,
        };

        Scorecard {
            rank: 0,
            candidate: candidate.id.clone(),
            final_score: sub_scores.weighted(&self.settings.recommendation),
            sub_scores,
            evidence,
        }
    }

    /// Complete chains (other than the cause's own) whose cause is similar to
    /// the open cause and which hold an action similar to the candidate,
    /// divided by every chain in the context.
    fn support(
        &self,
        snapshot: &RecordSnapshot,
        cause: &Record,
        candidate: &Record,
        context_chains: &[&CausalChain],
    ) -> (f64, Vec<RecordId>) {
        let policy = &self.settings.support;

        let precedents: Vec<RecordId> = context_chains
            .iter()
            .filter(|chain| chain.completeness.is_complete() && chain.root != cause.id)
            .filter(|chain| {
                snapshot
                    .get(&chain.root)
                    .is_some_and(|historical| policy.causes_similar(cause, historical))
            })
            .filter(|chain| {
                chain.actions.iter().any(|id| {
                    snapshot
                        .get(id)
                        .is_some_and(|action| policy.actions_similar(candidate, action))
                })
            })
            .map(|chain| chain.root.clone())
            .collect();

        if context_chains.is_empty() {
            return (0.0, precedents);
        }
        (precedents.len() as f64 / context_chains.len() as f64, precedents)
    }

    fn debt_reduction(
        &self,
        cause: &Record,
        candidate: &Record,
        simulation: &LinkSimulation,
    ) -> (f64, Evidence) {
        let weights = &self.settings.debt;
        let mut reduction = 0.0;
        let mut resolved = Vec::new();
        let mut records = Vec::new();

        if simulation.before != simulation.after {
            reduction += weights.weight_of(simulation.before);
            resolved.push(format!(
                "{} becomes {} (-{:.2})",
                simulation.before,
                simulation.after,
                weights.weight_of(simulation.before)
            ));
            records.push(cause.id.clone());
        }
        if let Some(orphan) = simulation.absorbed_orphan {
            reduction += weights.weight_of(orphan);
            resolved.push(format!("{} is attached (-{:.2})", orphan, weights.weight_of(orphan)));
            records.push(candidate.id.clone());
        }

        let detail = if resolved.is_empty() {
            "resolves no broken chain".to_string()
        } else {
            resolved.join("; ")
        };
        (reduction, Evidence::new(Signal::Debt, detail).with_records(records))
    }
}

fn lookup<'a>(
    snapshot: &'a RecordSnapshot,
    id: &RecordId,
    expected: RecordKind,
) -> Result<&'a Record, AnalysisError> {
    let record = snapshot
        .get(id)
        .ok_or_else(|| AnalysisError::UnknownRecord { record: id.clone() })?;
    if record.kind != expected {
        return Err(AnalysisError::InvalidRecordKind {
            record: id.clone(),
            expected,
            actual: record.kind,
        });
    }
    Ok(record)
}

/// Fraction of the cause's tags the candidate matches exactly, and the
/// number matched. 1.0 when the cause has no tags.
fn constraint_fit(cause: &Record, candidate: &Record) -> (f64, usize) {
    if cause.tags.is_empty() {
        return (1.0, 0);
    }
    let matched = cause.tags.shared_count(&candidate.tags);
    (matched as f64 / cause.tags.len() as f64, matched)
}

/// Links `candidate` to the cause's chain on a copy of the context's chains.
///
/// The candidate brings its own downstream closure when it lives in the same
/// context. An orphan chain rooted at the candidate is absorbed.
fn simulate_link(
    snapshot: &RecordSnapshot,
    cause: &Record,
    candidate: &Record,
    context_chains: &[&CausalChain],
) -> LinkSimulation {
    let mut added_actions = vec![candidate.id.clone()];
    let mut added_outcomes = Vec::new();
    if candidate.context == cause.context {
        for record in reachable_from(snapshot, candidate) {
            match record.kind {
                RecordKind::Action => added_actions.push(record.id.clone()),
                RecordKind::Outcome => added_outcomes.push(record.id.clone()),
                RecordKind::Cause => {}
            }
        }
    }

    let mut simulated: Vec<CausalChain> = Vec::with_capacity(context_chains.len() + 1);
    let mut before = None;
    let mut after = Completeness::CauseOnly;
    let mut absorbed_orphan = None;

    for chain in context_chains {
        if chain.root == candidate.id && chain.completeness.is_orphan() {
            absorbed_orphan = Some(chain.completeness);
            continue;
        }
        if chain.root == cause.id && chain.has_cause() {
            let linked = extend(chain, &added_actions, &added_outcomes);
            before = Some(chain.completeness);
            after = linked.completeness;
            simulated.push(linked);
            continue;
        }
        simulated.push((*chain).clone());
    }

    if before.is_none() {
        let linked = CausalChain::new(
            cause.context.clone(),
            cause.id.clone(),
            RecordKind::Cause,
            added_actions,
            added_outcomes,
        );
        after = linked.completeness;
        simulated.push(linked);
    }

    LinkSimulation {
        before: before.unwrap_or(Completeness::CauseOnly),
        after,
        absorbed_orphan,
        action_ratio_after: CoverageMetric::from_chains(&simulated).action_ratio.value(),
    }
}

fn extend(chain: &CausalChain, actions: &[RecordId], outcomes: &[RecordId]) -> CausalChain {
    let mut all_actions = chain.actions.clone();
    for id in actions {
        if !all_actions.contains(id) {
            all_actions.push(id.clone());
        }
    }
    let mut all_outcomes = chain.outcomes.clone();
    for id in outcomes {
        if !all_outcomes.contains(id) {
            all_outcomes.push(id.clone());
        }
    }
    CausalChain::new(
        chain.context.clone(),
        chain.root.clone(),
        RecordKind::Cause,
        all_actions,
        all_outcomes,
    )
}
