//! Record - a single documented Cause, Action or Outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::domain::foundation::{ContextId, RecordId, RecordKind, Timestamp};

use super::Tags;

/// A documented decision record, supplied by the record store.
///
/// Records are immutable for the duration of an analysis run; the engine only
/// ever reads them through a [`super::RecordSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    pub context: ContextId,
    #[serde(default)]
    pub description: String,
    pub timestamp: Timestamp,
    /// Outgoing directional links (Cause→Action, Action→Outcome, ...).
    #[serde(default)]
    pub links: BTreeSet<RecordId>,
    #[serde(default)]
    pub tags: Tags,
}

impl Record {
    /// Creates a record with no description, links or tags.
    pub fn new(id: RecordId, kind: RecordKind, context: ContextId, timestamp: Timestamp) -> Self {
        Self {
            id,
            kind,
            context,
            description: String::new(),
            timestamp,
            links: BTreeSet::new(),
            tags: Tags::new(),
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Adds an outgoing link.
    pub fn with_link(mut self, target: RecordId) -> Self {
        self.links.insert(target);
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key, value);
        self
    }

    /// Replaces all tags.
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn is_cause(&self) -> bool {
        self.kind == RecordKind::Cause
    }

    pub fn is_action(&self) -> bool {
        self.kind == RecordKind::Action
    }

    pub fn is_outcome(&self) -> bool {
        self.kind == RecordKind::Outcome
    }

    /// Returns true if this record links directly to `target`.
    pub fn links_to(&self, target: &RecordId) -> bool {
        self.links.contains(target)
    }
}
