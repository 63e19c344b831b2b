//! Decision debt - weights and the per-context debt score.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AnalysisError, Completeness};

/// Default weight of a cause with no action.
pub const DEFAULT_CAUSE_ONLY_WEIGHT: f64 = 3.0;

/// Default weight of an action with no outcome.
pub const DEFAULT_ACTION_ONLY_WEIGHT: f64 = 1.0;

/// Default weight of an orphan action or outcome.
pub const DEFAULT_ORPHAN_WEIGHT: f64 = 0.5;

/// Per-classification debt weights (`w1`, `w2`, `w3`).
///
/// Always non-negative and finite once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebtWeights {
    cause_only: f64,
    action_only: f64,
    orphan: f64,
}

impl DebtWeights {
    /// Creates validated weights.
    ///
    /// # Errors
    /// `InvalidConfiguration` when any weight is negative, NaN or infinite.
    pub fn new(cause_only: f64, action_only: f64, orphan: f64) -> Result<Self, AnalysisError> {
        check_weight("debt.cause_only", cause_only)?;
        check_weight("debt.action_only", action_only)?;
        check_weight("debt.orphan", orphan)?;
        Ok(Self {
            cause_only,
            action_only,
            orphan,
        })
    }

    /// `w1`
    pub fn cause_only(&self) -> f64 {
        self.cause_only
    }

    /// `w2`
    pub fn action_only(&self) -> f64 {
        self.action_only
    }

    /// `w3`
    pub fn orphan(&self) -> f64 {
        self.orphan
    }

    /// Weight a chain of the given classification contributes. Complete
    /// chains contribute nothing.
    pub fn weight_of(&self, completeness: Completeness) -> f64 {
        match completeness {
            Completeness::Complete => 0.0,
            Completeness::CauseOnly => self.cause_only,
            Completeness::ActionOnly => self.action_only,
            Completeness::OrphanAction | Completeness::OrphanOutcome => self.orphan,
        }
    }
}

impl Default for DebtWeights {
    fn default() -> Self {
        Self {
            cause_only: DEFAULT_CAUSE_ONLY_WEIGHT,
            action_only: DEFAULT_ACTION_ONLY_WEIGHT,
            orphan: DEFAULT_ORPHAN_WEIGHT,
        }
    }
}

pub(crate) fn check_weight(option: &str, value: f64) -> Result<(), AnalysisError> {
    if !value.is_finite() {
        return Err(AnalysisError::invalid_configuration(option, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(AnalysisError::invalid_configuration(option, "must be non-negative"));
    }
    Ok(())
}

/// Non-negative decision debt of one context.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebtScore(f64);

impl DebtScore {
    pub const ZERO: Self = Self(0.0);

    /// `w1·cause_only + w2·action_only + w3·orphans`, summed in that order.
    pub fn compute(
        weights: &DebtWeights,
        cause_only: usize,
        action_only: usize,
        orphans: usize,
    ) -> Self {
        let mut total = 0.0;
        total += weights.cause_only() * cause_only as f64;
        total += weights.action_only() * action_only as f64;
        total += weights.orphan() * orphans as f64;
        Self(total)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for DebtScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
