//! Scorecard - auditable output of the recommendation engine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::RecordId;

use super::RecommendationWeights;

/// Number of runner-up scorecards kept in a [`RecommendationSummary`].
pub const MAX_ALTERNATIVES: usize = 3;

/// The four named sub-scores of a candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SubScores {
    pub coverage: f64,
    pub support: f64,
    pub constraint: f64,
    pub debt: f64,
}

impl SubScores {
    /// Weighted sum, accumulated as coverage, support, constraint, debt.
    pub fn weighted(&self, weights: &RecommendationWeights) -> f64 {
        let mut total = 0.0;
        total += weights.coverage() * self.coverage;
        total += weights.support() * self.support;
        total += weights.constraint() * self.constraint;
        total += weights.debt() * self.debt;
        total
    }
}

/// Which sub-score a piece of evidence explains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Coverage,
    Support,
    Constraint,
    Debt,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Signal::Coverage => "coverage",
            Signal::Support => "support",
            Signal::Constraint => "constraint",
            Signal::Debt => "debt",
        };
        write!(f, "{}", label)
    }
}

/// One human-readable justification, with the records it refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub signal: Signal,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub records: Vec<RecordId>,
}

impl Evidence {
    pub fn new(signal: Signal, detail: impl Into<String>) -> Self {
        Self {
            signal,
            detail: detail.into(),
            records: Vec::new(),
        }
    }

    pub fn with_records(mut self, records: Vec<RecordId>) -> Self {
        self.records = records;
        self
    }
}

/// Score of one candidate action for one open cause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scorecard {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub candidate: RecordId,
    pub sub_scores: SubScores,
    pub final_score: f64,
    pub evidence: Vec<Evidence>,
}

impl Scorecard {
    /// Evidence entries for one signal.
    pub fn evidence_for(&self, signal: Signal) -> impl Iterator<Item = &Evidence> {
        self.evidence.iter().filter(move |e| e.signal == signal)
    }
}

/// Best candidate plus a few ranked alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationSummary {
    pub cause: RecordId,
    pub top: Scorecard,
    pub alternatives: Vec<Scorecard>,
}

impl RecommendationSummary {
    /// Builds a summary from an already ranked list. `None` when empty.
    pub fn from_ranked(cause: RecordId, ranked: Vec<Scorecard>) -> Option<Self> {
        let mut iter = ranked.into_iter();
        let top = iter.next()?;
        Some(Self {
            cause,
            top,
            alternatives: iter.take(MAX_ALTERNATIVES).collect(),
        })
    }
}
