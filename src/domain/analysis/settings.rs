//! Engine settings - validated weights and the support similarity policy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::record::{Record, Tags};

use super::debt::check_weight;
use super::{AnalysisError, DebtWeights};

/// Sub-score weights of the recommendation engine, normalized to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RecommendationWeights {
    coverage: f64,
    support: f64,
    constraint: f64,
    debt: f64,
}

impl RecommendationWeights {
    /// Validates and normalizes raw weights.
    ///
    /// # Errors
    /// `InvalidConfiguration` when a weight is negative or non-finite, or when
    /// every weight is zero.
    pub fn new(coverage: f64, support: f64, constraint: f64, debt: f64) -> Result<Self, AnalysisError> {
        check_weight("recommendation.coverage_weight", coverage)?;
        check_weight("recommendation.support_weight", support)?;
        check_weight("recommendation.constraint_weight", constraint)?;
        check_weight("recommendation.debt_weight", debt)?;

        let total = coverage + support + constraint + debt;
        if total <= 0.0 {
            return Err(AnalysisError::invalid_configuration(
                "recommendation",
                "at least one weight must be positive",
            ));
        }
        if !total.is_finite() {
            return Err(AnalysisError::invalid_configuration(
                "recommendation",
                "weights overflow when summed",
            ));
        }

        Ok(Self {
            coverage: coverage / total,
            support: support / total,
            constraint: constraint / total,
            debt: debt / total,
        })
    }

    pub fn coverage(&self) -> f64 {
        self.coverage
    }

    pub fn support(&self) -> f64 {
        self.support
    }

    pub fn constraint(&self) -> f64 {
        self.constraint
    }

    pub fn debt(&self) -> f64 {
        self.debt
    }
}

impl Default for RecommendationWeights {
    fn default() -> Self {
        Self {
            coverage: 0.25,
            support: 0.25,
            constraint: 0.25,
            debt: 0.25,
        }
    }
}

/// Tag similarity measure used to match historical chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Jaccard,
    Overlap,
}

impl SimilarityMetric {
    pub fn score(&self, a: &Tags, b: &Tags) -> f64 {
        match self {
            SimilarityMetric::Jaccard => a.jaccard(b),
            SimilarityMetric::Overlap => a.overlap_coefficient(b),
        }
    }
}

impl fmt::Display for SimilarityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimilarityMetric::Jaccard => write!(f, "jaccard"),
            SimilarityMetric::Overlap => write!(f, "overlap"),
        }
    }
}

/// Decides when a historical cause or action counts as similar.
///
/// A similarity of exactly 0 never matches, whatever the threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportPolicy {
    metric: SimilarityMetric,
    cause_threshold: f64,
    action_threshold: f64,
}

impl SupportPolicy {
    /// # Errors
    /// `InvalidConfiguration` when a threshold is outside [0, 1].
    pub fn new(
        metric: SimilarityMetric,
        cause_threshold: f64,
        action_threshold: f64,
    ) -> Result<Self, AnalysisError> {
        check_threshold("support.cause_threshold", cause_threshold)?;
        check_threshold("support.action_threshold", action_threshold)?;
        Ok(Self {
            metric,
            cause_threshold,
            action_threshold,
        })
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn cause_threshold(&self) -> f64 {
        self.cause_threshold
    }

    pub fn action_threshold(&self) -> f64 {
        self.action_threshold
    }

    pub fn causes_similar(&self, a: &Record, b: &Record) -> bool {
        let score = self.metric.score(&a.tags, &b.tags);
        score > 0.0 && score >= self.cause_threshold
    }

    /// The same action, or one whose tags are similar enough.
    pub fn actions_similar(&self, a: &Record, b: &Record) -> bool {
        if a.id == b.id {
            return true;
        }
        let score = self.metric.score(&a.tags, &b.tags);
        score > 0.0 && score >= self.action_threshold
    }
}

impl Default for SupportPolicy {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::Jaccard,
            cause_threshold: 0.5,
            action_threshold: 0.5,
        }
    }
}

fn check_threshold(option: &str, value: f64) -> Result<(), AnalysisError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(AnalysisError::invalid_configuration(option, "must be between 0 and 1"));
    }
    Ok(())
}

/// Everything the engine is configured with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EngineSettings {
    pub debt: DebtWeights,
    pub recommendation: RecommendationWeights,
    pub support: SupportPolicy,
}

impl EngineSettings {
    pub fn new(
        debt: DebtWeights,
        recommendation: RecommendationWeights,
        support: SupportPolicy,
    ) -> Self {
        Self {
            debt,
            recommendation,
            support,
        }
    }
}
