//! RecordSnapshot - arena of records for one analysis run.

use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

use crate::domain::analysis::AnalysisError;
use crate::domain::foundation::{ContextId, RecordId};

use super::Record;

/// Immutable, fully-materialized set of records keyed by identifier.
///
/// Links between records are plain identifiers resolved through this arena;
/// no record holds a reference to another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    records: BTreeMap<RecordId, Record>,
}

impl RecordSnapshot {
    /// Creates an empty snapshot.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot, rejecting duplicate identifiers.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Result<Self, AnalysisError> {
        let mut by_id = BTreeMap::new();
        for record in records {
            if by_id.contains_key(&record.id) {
                return Err(AnalysisError::DuplicateRecord { record: record.id });
            }
            by_id.insert(record.id.clone(), record);
        }
        Ok(Self { records: by_id })
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in ascending identifier order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Records of one context in ascending identifier order.
    pub fn in_context<'a>(&'a self, context: &'a ContextId) -> impl Iterator<Item = &'a Record> {
        self.records.values().filter(move |r| &r.context == context)
    }

    /// Distinct contexts in ascending order.
    pub fn contexts(&self) -> Vec<ContextId> {
        self.records
            .values()
            .map(|r| r.context.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns a snapshot containing only records of the given contexts.
    pub fn restricted_to(&self, contexts: &[ContextId]) -> Self {
        let wanted: BTreeSet<&ContextId> = contexts.iter().collect();
        Self {
            records: self
                .records
                .iter()
                .filter(|(_, r)| wanted.contains(&r.context))
                .map(|(id, r)| (id.clone(), r.clone()))
                .collect(),
        }
    }

    /// Returns a copy with `record` inserted or replaced.
    pub fn with_record(&self, record: Record) -> Self {
        let mut records = self.records.clone();
        records.insert(record.id.clone(), record);
        Self { records }
    }

    /// Consumes the snapshot, returning records in ascending identifier order.
    pub fn into_records(self) -> Vec<Record> {
        self.records.into_values().collect()
    }

    /// SHA-256 over the canonical JSON encoding of every record, hex encoded.
    ///
    /// Identical snapshots always produce the same fingerprint regardless of
    /// the order records were supplied in.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for record in self.records.values() {
            // Serializing plain data with string keys cannot fail.
            if let Ok(bytes) = serde_json::to_vec(record) {
                hasher.update(&bytes);
            }
            hasher.update(b"\n");
        }
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{RecordKind, Timestamp};

    fn record(id: &str, kind: RecordKind, context: &str) -> Record {
        Record::new(
            RecordId::new(id).unwrap(),
            kind,
            ContextId::new(context).unwrap(),
            Timestamp::from_unix_secs(0).unwrap(),
        )
    }

    #[test]
    fn rejects_duplicate_ids() {
        let result = RecordSnapshot::from_records(vec![
            record("C1", RecordKind::Cause, "TeamA"),
            record("C1", RecordKind::Cause, "TeamB"),
        ]);

        match result {
            Err(AnalysisError::DuplicateRecord { record }) => assert_eq!(record.as_str(), "C1"),
            other => panic!("Expected DuplicateRecord, got {:?}", other),
        }
    }

    #[test]
    fn contexts_are_sorted_and_distinct() {
        let snapshot = RecordSnapshot::from_records(vec![
            record("C2", RecordKind::Cause, "TeamB"),
            record("C1", RecordKind::Cause, "TeamA"),
            record("A1", RecordKind::Action, "TeamB"),
        ])
        .unwrap();

        let contexts: Vec<_> = snapshot.contexts().into_iter().map(String::from).collect();
        assert_eq!(contexts, vec!["TeamA", "TeamB"]);
    }

    #[test]
    fn in_context_filters_and_orders() {
        let snapshot = RecordSnapshot::from_records(vec![
            record("C2", RecordKind::Cause, "TeamA"),
            record("A1", RecordKind::Action, "TeamA"),
            record("C1", RecordKind::Cause, "TeamB"),
        ])
        .unwrap();
        let team_a = ContextId::new("TeamA").unwrap();

        let ids: Vec<_> = snapshot.in_context(&team_a).map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["A1", "C2"]);
    }

    #[test]
    fn restricted_to_keeps_only_requested_contexts() {
        let snapshot = RecordSnapshot::from_records(vec![
            record("C1", RecordKind::Cause, "TeamA"),
            record("C2", RecordKind::Cause, "TeamB"),
        ])
        .unwrap();

        let only_b = snapshot.restricted_to(&[ContextId::new("TeamB").unwrap()]);
        assert_eq!(only_b.len(), 1);
        assert!(only_b.contains(&RecordId::new("C2").unwrap()));
    }

    #[test]
    fn fingerprint_ignores_input_order() {
        let a = RecordSnapshot::from_records(vec![
            record("C1", RecordKind::Cause, "TeamA"),
            record("A1", RecordKind::Action, "TeamA"),
        ])
        .unwrap();
        let b = RecordSnapshot::from_records(vec![
            record("A1", RecordKind::Action, "TeamA"),
            record("C1", RecordKind::Cause, "TeamA"),
        ])
        .unwrap();

        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64);
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = RecordSnapshot::from_records(vec![record("C1", RecordKind::Cause, "TeamA")]).unwrap();
        let b = a.with_record(record("C1", RecordKind::Cause, "TeamA").with_tag("system", "db"));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }
}
