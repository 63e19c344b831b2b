//! Maturity Comparator - cross-context benchmark ranking.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::foundation::ContextId;

use super::ContextMetrics;

/// One context's position in the maturity benchmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaturityRank {
    /// 1-based position, best first.
    pub rank: usize,
    pub context: ContextId,
    /// Normalized coverage minus normalized debt, in [-1, 1].
    pub composite: f64,
    pub coverage: f64,
    pub debt: f64,
    pub normalized_coverage: f64,
    pub normalized_debt: f64,
}

/// Maturity comparison functions.
pub struct MaturityComparator;

impl MaturityComparator {
    /// Ranks contexts by composite maturity.
    ///
    /// # Algorithm
    /// Coverage (mean of action and outcome ratios) and debt are min-max
    /// normalized across the compared set. Composite = coverage − debt.
    /// Sorted descending, ties broken by context identifier ascending.
    ///
    /// # Edge Cases
    /// - Empty input: empty output
    /// - Every context ties on a metric: that metric contributes 0 for all
    pub fn compare(per_context: &BTreeMap<ContextId, ContextMetrics>) -> Vec<MaturityRank> {
        if per_context.is_empty() {
            return Vec::new();
        }

        let coverage: Vec<f64> = per_context.values().map(|m| m.coverage.scalar()).collect();
        let debt: Vec<f64> = per_context.values().map(|m| m.debt.value()).collect();
        let norm_coverage = min_max_normalize(&coverage);
        let norm_debt = min_max_normalize(&debt);

        let mut ranks: Vec<MaturityRank> = per_context
            .keys()
            .enumerate()
            .map(|(i, context)| MaturityRank {
                rank: 0,
                context: context.clone(),
                composite: norm_coverage[i] - norm_debt[i],
                coverage: coverage[i],
                debt: debt[i],
                normalized_coverage: norm_coverage[i],
                normalized_debt: norm_debt[i],
            })
            .collect();

        ranks.sort_by(|a, b| {
            b.composite
                .total_cmp(&a.composite)
                .then_with(|| a.context.cmp(&b.context))
        });
        for (i, rank) in ranks.iter_mut().enumerate() {
            rank.rank = i + 1;
        }
        ranks
    }
}

/// Maps each value to `(v - min) / (max - min)`; all zero when the spread is 0.
fn min_max_normalize(values: &[f64]) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let spread = max - min;

    if spread <= 0.0 || !spread.is_finite() {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / spread).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{CompletenessDistribution, CoverageMetric, DebtScore, DebtWeights};
    use crate::domain::foundation::Ratio;

    fn metrics(context: &str, action: f64, outcome: f64, debt: (usize, usize, usize)) -> ContextMetrics {
        let coverage = CoverageMetric {
            action_ratio: Ratio::try_new(action).unwrap(),
            outcome_ratio: Ratio::try_new(outcome).unwrap(),
            ..CoverageMetric::default()
        };
        ContextMetrics {
            context: ContextId::new(context).unwrap(),
            coverage,
            debt: DebtScore::compute(&DebtWeights::default(), debt.0, debt.1, debt.2),
            distribution: CompletenessDistribution::default(),
        }
    }

    fn input(list: Vec<ContextMetrics>) -> BTreeMap<ContextId, ContextMetrics> {
        list.into_iter().map(|m| (m.context.clone(), m)).collect()
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(MaturityComparator::compare(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn better_coverage_and_less_debt_ranks_first() {
        let ranks = MaturityComparator::compare(&input(vec![
            metrics("TeamA", 0.5, 0.0, (1, 0, 0)),
            metrics("TeamB", 1.0, 1.0, (0, 0, 0)),
        ]));

        assert_eq!(ranks[0].context.as_str(), "TeamB");
        assert_eq!(ranks[0].rank, 1);
        assert!((ranks[0].composite - 1.0).abs() < 1e-12);
        assert!((ranks[1].composite + 1.0).abs() < 1e-12);
    }

    #[test]
    fn full_tie_contributes_zero_and_breaks_by_context() {
        let ranks = MaturityComparator::compare(&input(vec![
            metrics("TeamC", 1.0, 0.0, (0, 1, 0)),
            metrics("TeamA", 1.0, 0.0, (0, 1, 0)),
        ]));

        let order: Vec<_> = ranks.iter().map(|r| r.context.as_str()).collect();
        assert_eq!(order, vec!["TeamA", "TeamC"]);
        assert!(ranks.iter().all(|r| r.composite == 0.0));
    }

    #[test]
    fn single_context_scores_zero() {
        let ranks = MaturityComparator::compare(&input(vec![metrics("TeamA", 1.0, 1.0, (2, 0, 0))]));
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks[0].composite, 0.0);
        assert_eq!(ranks[0].rank, 1);
    }

    #[test]
    fn ranks_are_consecutive() {
        let ranks = MaturityComparator::compare(&input(vec![
            metrics("TeamA", 0.2, 0.1, (3, 0, 0)),
            metrics("TeamB", 0.9, 0.4, (0, 1, 0)),
            metrics("TeamC", 0.5, 0.5, (0, 0, 4)),
        ]));
        let positions: Vec<_> = ranks.iter().map(|r| r.rank).collect();
        assert_eq!(positions, vec![1, 2, 3]);
    }
}
