//! Causal Chain - derived Cause → Actions → Outcomes structure.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{ChainId, ContextId, RecordId, RecordKind};

/// Completeness classification. Every chain carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Completeness {
    /// Cause → Action → Outcome all present.
    Complete,
    /// Cause → Action, no Outcome.
    ActionOnly,
    /// Cause with no linked Action.
    CauseOnly,
    /// Action with no upstream Cause.
    OrphanAction,
    /// Outcome with no upstream Action or Cause.
    OrphanOutcome,
}

impl Completeness {
    /// All classifications in canonical order.
    pub fn all() -> &'static [Completeness] {
        &[
            Completeness::Complete,
            Completeness::ActionOnly,
            Completeness::CauseOnly,
            Completeness::OrphanAction,
            Completeness::OrphanOutcome,
        ]
    }

    /// Classifies a chain from its root kind and collected members.
    ///
    /// Orphan chains are classified by their root alone.
    pub fn classify(root_kind: RecordKind, has_action: bool, has_outcome: bool) -> Self {
        match root_kind {
            RecordKind::Cause => match (has_action, has_outcome) {
                (false, _) => Completeness::CauseOnly,
                (true, false) => Completeness::ActionOnly,
                (true, true) => Completeness::Complete,
            },
            RecordKind::Action => Completeness::OrphanAction,
            RecordKind::Outcome => Completeness::OrphanOutcome,
        }
    }

    pub fn is_complete(&self) -> bool {
        *self == Completeness::Complete
    }

    pub fn is_orphan(&self) -> bool {
        matches!(self, Completeness::OrphanAction | Completeness::OrphanOutcome)
    }

    /// Anything other than `Complete` contributes to decision debt.
    pub fn is_broken(&self) -> bool {
        !self.is_complete()
    }

    /// Returns the kebab-case label.
    pub fn label(&self) -> &'static str {
        match self {
            Completeness::Complete => "complete",
            Completeness::ActionOnly => "action-only",
            Completeness::CauseOnly => "cause-only",
            Completeness::OrphanAction => "orphan-action",
            Completeness::OrphanOutcome => "orphan-outcome",
        }
    }
}

impl fmt::Display for Completeness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One root record plus the transitive closure of linked Actions and Outcomes.
///
/// For cause-rooted chains `root` is the Cause. For orphan chains `root` is the
/// orphan Action or Outcome, and it also appears first in its member list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CausalChain {
    pub id: ChainId,
    pub context: ContextId,
    pub root: RecordId,
    /// Actions in breadth-first discovery order.
    pub actions: Vec<RecordId>,
    /// Outcomes in breadth-first discovery order.
    pub outcomes: Vec<RecordId>,
    pub completeness: Completeness,
}

impl CausalChain {
    /// Creates a chain and classifies it.
    pub fn new(
        context: ContextId,
        root: RecordId,
        root_kind: RecordKind,
        actions: Vec<RecordId>,
        outcomes: Vec<RecordId>,
    ) -> Self {
        let completeness =
            Completeness::classify(root_kind, !actions.is_empty(), !outcomes.is_empty());
        Self {
            id: ChainId::derive(&context, &root),
            context,
            root,
            actions,
            outcomes,
            completeness,
        }
    }

    /// The root Cause, `None` for orphan chains.
    pub fn cause(&self) -> Option<&RecordId> {
        if self.completeness.is_orphan() {
            None
        } else {
            Some(&self.root)
        }
    }

    pub fn has_cause(&self) -> bool {
        self.cause().is_some()
    }

    pub fn has_action(&self) -> bool {
        !self.actions.is_empty()
    }

    pub fn has_outcome(&self) -> bool {
        !self.outcomes.is_empty()
    }

    /// Every record in the chain: cause (if any), actions, then outcomes.
    pub fn records(&self) -> impl Iterator<Item = &RecordId> {
        self.cause()
            .into_iter()
            .chain(self.actions.iter())
            .chain(self.outcomes.iter())
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records().any(|r| r == id)
    }
}
