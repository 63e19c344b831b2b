//! Coverage Analyzer - per-context coverage ratios, debt and completeness mix.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::{ContextId, Ratio};

use super::{CausalChain, Completeness, DebtScore, DebtWeights};

/// Coverage ratios of one context plus the counts behind them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetric {
    /// Cause-rooted chains with at least one Action / cause-rooted chains.
    pub action_ratio: Ratio,
    /// Chains with an Action and an Outcome / chains with an Action.
    pub outcome_ratio: Ratio,
    pub cause_chains: usize,
    pub causes_with_action: usize,
    pub action_chains: usize,
    pub action_chains_with_outcome: usize,
}

impl CoverageMetric {
    /// Computes coverage over the given chains.
    ///
    /// Orphan-action chains count towards the outcome ratio but never towards
    /// the action ratio.
    pub fn from_chains<'a>(chains: impl IntoIterator<Item = &'a CausalChain>) -> Self {
        let mut metric = Self::default();
        for chain in chains {
            if chain.has_cause() {
                metric.cause_chains += 1;
                if chain.has_action() {
                    metric.causes_with_action += 1;
                }
            }
            if chain.has_action() {
                metric.action_chains += 1;
                if chain.has_outcome() {
                    metric.action_chains_with_outcome += 1;
                }
            }
        }
        metric.action_ratio = Ratio::of(metric.causes_with_action, metric.cause_chains);
        metric.outcome_ratio = Ratio::of(metric.action_chains_with_outcome, metric.action_chains);
        metric
    }

    /// Mean of the action and outcome ratios.
    pub fn scalar(&self) -> f64 {
        (self.action_ratio.value() + self.outcome_ratio.value()) / 2.0
    }
}

/// Number of chains per completeness classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletenessDistribution {
    pub complete: usize,
    pub action_only: usize,
    pub cause_only: usize,
    pub orphan_action: usize,
    pub orphan_outcome: usize,
    pub total: usize,
    /// Every chain that is not `complete`.
    pub broken: usize,
    pub broken_ratio: Ratio,
}

impl CompletenessDistribution {
    pub fn from_chains<'a>(chains: impl IntoIterator<Item = &'a CausalChain>) -> Self {
        let mut dist = Self::default();
        for chain in chains {
            match chain.completeness {
                Completeness::Complete => dist.complete += 1,
                Completeness::ActionOnly => dist.action_only += 1,
                Completeness::CauseOnly => dist.cause_only += 1,
                Completeness::OrphanAction => dist.orphan_action += 1,
                Completeness::OrphanOutcome => dist.orphan_outcome += 1,
            }
            dist.total += 1;
            if chain.completeness.is_broken() {
                dist.broken += 1;
            }
        }
        dist.broken_ratio = Ratio::of(dist.broken, dist.total);
        dist
    }

    pub fn count(&self, completeness: Completeness) -> usize {
        match completeness {
            Completeness::Complete => self.complete,
            Completeness::ActionOnly => self.action_only,
            Completeness::CauseOnly => self.cause_only,
            Completeness::OrphanAction => self.orphan_action,
            Completeness::OrphanOutcome => self.orphan_outcome,
        }
    }

    pub fn orphans(&self) -> usize {
        self.orphan_action + self.orphan_outcome
    }
}

/// Everything computed for one context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextMetrics {
    pub context: ContextId,
    pub coverage: CoverageMetric,
    pub debt: DebtScore,
    pub distribution: CompletenessDistribution,
}

/// Coverage and debt analysis functions.
pub struct CoverageAnalyzer;

impl CoverageAnalyzer {
    /// Computes coverage, debt and distribution of `context`.
    ///
    /// Chains belonging to other contexts are ignored.
    ///
    /// # Edge Cases
    /// - No chains in the context: both ratios 0, debt 0
    pub fn analyze(
        chains: &[CausalChain],
        context: &ContextId,
        weights: &DebtWeights,
    ) -> ContextMetrics {
        let in_context: Vec<&CausalChain> =
            chains.iter().filter(|c| &c.context == context).collect();

        let coverage = CoverageMetric::from_chains(in_context.iter().copied());
        let distribution = CompletenessDistribution::from_chains(in_context.iter().copied());
        let debt = Self::debt(&distribution, weights);

        ContextMetrics {
            context: context.clone(),
            coverage,
            debt,
            distribution,
        }
    }

    /// Analyzes every context present in `chains`.
    pub fn analyze_all(
        chains: &[CausalChain],
        weights: &DebtWeights,
    ) -> BTreeMap<ContextId, ContextMetrics> {
        let mut contexts: Vec<&ContextId> = chains.iter().map(|c| &c.context).collect();
        contexts.sort();
        contexts.dedup();

        contexts
            .into_iter()
            .map(|context| (context.clone(), Self::analyze(chains, context, weights)))
            .collect()
    }

    /// Weighted debt of a completeness distribution.
    pub fn debt(distribution: &CompletenessDistribution, weights: &DebtWeights) -> DebtScore {
        DebtScore::compute(
            weights,
            distribution.cause_only,
            distribution.action_only,
            distribution.orphans(),
        )
    }
}
