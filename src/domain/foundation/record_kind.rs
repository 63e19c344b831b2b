//! RecordKind enum for the three decision record roles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The role a decision record plays in a causal chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Cause,
    Action,
    Outcome,
}

impl RecordKind {
    /// Returns all record kinds in canonical order.
    pub fn all() -> &'static [RecordKind] {
        &[RecordKind::Cause, RecordKind::Action, RecordKind::Outcome]
    }

    /// Returns true if a link from a record of this kind to one of `target`
    /// kind is a permitted causal direction.
    ///
    /// Permitted: Cause→Action, Action→Action, Action→Outcome, Outcome→Action.
    /// Causes are always roots and never link targets.
    pub fn can_link_to(&self, target: RecordKind) -> bool {
        matches!(
            (self, target),
            (RecordKind::Cause, RecordKind::Action)
                | (RecordKind::Action, RecordKind::Action)
                | (RecordKind::Action, RecordKind::Outcome)
                | (RecordKind::Outcome, RecordKind::Action)
        )
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            RecordKind::Cause => "Cause",
            RecordKind::Action => "Action",
            RecordKind::Outcome => "Outcome",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
