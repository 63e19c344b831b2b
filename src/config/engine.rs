//! Engine configuration: debt weights, recommendation weights, support policy

use serde::Deserialize;

use crate::domain::analysis::{
    DebtWeights, EngineSettings, RecommendationWeights, SimilarityMetric, SupportPolicy,
    DEFAULT_ACTION_ONLY_WEIGHT, DEFAULT_CAUSE_ONLY_WEIGHT, DEFAULT_ORPHAN_WEIGHT,
};

use super::error::ValidationError;

/// Raw engine options as read from the environment or a config file.
///
/// Nothing here is trusted until [`EngineConfig::to_settings`] has run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub debt: DebtConfig,

    #[serde(default)]
    pub recommendation: RecommendationConfig,

    #[serde(default)]
    pub support: SupportConfig,
}

/// Per-class debt weights
#[derive(Debug, Clone, Deserialize)]
pub struct DebtConfig {
    /// Weight of a cause with no action
    #[serde(default = "default_cause_only")]
    pub cause_only: f64,

    /// Weight of an action with no outcome
    #[serde(default = "default_action_only")]
    pub action_only: f64,

    /// Weight of an orphan action or outcome
    #[serde(default = "default_orphan")]
    pub orphan: f64,
}

/// Recommendation sub-score weights, normalized on load
#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "default_sub_score_weight")]
    pub coverage_weight: f64,

    #[serde(default = "default_sub_score_weight")]
    pub support_weight: f64,

    #[serde(default = "default_sub_score_weight")]
    pub constraint_weight: f64,

    #[serde(default = "default_sub_score_weight")]
    pub debt_weight: f64,
}

/// Similarity policy for historical support
#[derive(Debug, Clone, Deserialize)]
pub struct SupportConfig {
    #[serde(default)]
    pub metric: SimilarityMetric,

    #[serde(default = "default_threshold")]
    pub cause_threshold: f64,

    #[serde(default = "default_threshold")]
    pub action_threshold: f64,
}

impl EngineConfig {
    /// Validate every option and build the engine settings.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidEngineOption` naming the first
    /// offending option.
    pub fn to_settings(&self) -> Result<EngineSettings, ValidationError> {
        let debt = DebtWeights::new(self.debt.cause_only, self.debt.action_only, self.debt.orphan)?;
        let recommendation = RecommendationWeights::new(
            self.recommendation.coverage_weight,
            self.recommendation.support_weight,
            self.recommendation.constraint_weight,
            self.recommendation.debt_weight,
        )?;
        let support = SupportPolicy::new(
            self.support.metric,
            self.support.cause_threshold,
            self.support.action_threshold,
        )?;
        Ok(EngineSettings::new(debt, recommendation, support))
    }
}

impl Default for DebtConfig {
    fn default() -> Self {
        Self {
            cause_only: default_cause_only(),
            action_only: default_action_only(),
            orphan: default_orphan(),
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            coverage_weight: default_sub_score_weight(),
            support_weight: default_sub_score_weight(),
            constraint_weight: default_sub_score_weight(),
            debt_weight: default_sub_score_weight(),
        }
    }
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            metric: SimilarityMetric::default(),
            cause_threshold: default_threshold(),
            action_threshold: default_threshold(),
        }
    }
}

fn default_cause_only() -> f64 {
    DEFAULT_CAUSE_ONLY_WEIGHT
}

fn default_action_only() -> f64 {
    DEFAULT_ACTION_ONLY_WEIGHT
}

fn default_orphan() -> f64 {
    DEFAULT_ORPHAN_WEIGHT
}

fn default_sub_score_weight() -> f64 {
    1.0
}

fn default_threshold() -> f64 {
    0.5
}
