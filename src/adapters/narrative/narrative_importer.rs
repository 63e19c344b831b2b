//! Narrative Importer - rule-based conversion of prose into decision records.
//!
//! Sentences are classified with [`RoleClassifier`] and grouped in reading
//! order: a Cause opens a group, Actions hang off the group's cause, Outcomes
//! hang off the group's most recent action.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::domain::foundation::{ContextId, DomainError, ErrorCode, RecordId, RecordKind, Timestamp};
use crate::domain::record::{Record, RecordSnapshot, RoleClassifier, SentenceRole};
use crate::ports::RecordSource;

/// Fragments shorter than this (in characters) are dropped.
pub const MIN_SENTENCE_CHARS: usize = 20;

static SENTENCE_BOUNDARY: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(r"[.!?]\s+"));

fn pattern_error(err: regex::Error) -> DomainError {
    DomainError::new(ErrorCode::InternalError, format!("Narrative pattern failed to compile: {}", err))
}

/// Builds records for one context from narrative text.
#[derive(Debug, Clone)]
pub struct NarrativeImporter {
    context: ContextId,
    timestamp: Timestamp,
}

impl NarrativeImporter {
    /// Records are stamped with the current time.
    pub fn new(context: ContextId) -> Self {
        Self::with_timestamp(context, Timestamp::now())
    }

    pub fn with_timestamp(context: ContextId, timestamp: Timestamp) -> Self {
        Self { context, timestamp }
    }

    /// Splits on `.`, `!` or `?` followed by whitespace, keeping the
    /// punctuation, and drops short fragments.
    pub fn split_sentences(text: &str) -> Result<Vec<String>, DomainError> {
        let boundary = SENTENCE_BOUNDARY.as_ref().map_err(|e| pattern_error(e.clone()))?;
        let mut pieces = Vec::new();
        let mut start = 0;

        for m in boundary.find_iter(text) {
            // The punctuation mark is a single ASCII byte.
            pieces.push(&text[start..m.start() + 1]);
            start = m.end();
        }
        pieces.push(&text[start..]);

        Ok(pieces
            .into_iter()
            .map(str::trim)
            .filter(|s| s.chars().count() >= MIN_SENTENCE_CHARS)
            .map(str::to_string)
            .collect())
    }

    /// Classifies every sentence and builds the linked records.
    ///
    /// Identifiers are `<context>-C<n>`, `<context>-A<n>` and `<context>-O<n>`
    /// numbered from 1 in reading order. Constraint sentences become
    /// `constraint.<n>` tags on the current cause. Problems and observations
    /// produce nothing.
    pub fn import_records(&self, text: &str) -> Result<Vec<Record>, DomainError> {
        let mut records: Vec<Record> = Vec::new();
        let mut counts = [0usize; 3];
        let mut cause: Option<usize> = None;
        let mut last_action: Option<usize> = None;
        let mut constraints = 0usize;

        for sentence in Self::split_sentences(text)? {
            let role = RoleClassifier::classify(&sentence).map_err(pattern_error)?;

            if role == SentenceRole::Constraint {
                if let Some(idx) = cause {
                    constraints += 1;
                    records[idx]
                        .tags
                        .insert(format!("constraint.{}", constraints), sentence);
                }
                continue;
            }

            let Some(kind) = role.record_kind() else {
                continue;
            };
            let Some(record) = self.next_record(kind, &mut counts, sentence) else {
                continue;
            };
            let id = record.id.clone();
            records.push(record);
            let idx = records.len() - 1;

            match kind {
                RecordKind::Cause => {
                    cause = Some(idx);
                    last_action = None;
                    constraints = 0;
                }
                RecordKind::Action => {
                    if let Some(c) = cause {
                        records[c].links.insert(id);
                    }
                    last_action = Some(idx);
                }
                RecordKind::Outcome => {
                    if let Some(a) = last_action {
                        records[a].links.insert(id);
                    }
                }
            }
        }
        Ok(records)
    }

    /// Imports `text` into a snapshot.
    pub fn import(&self, text: &str) -> Result<RecordSnapshot, DomainError> {
        Ok(RecordSnapshot::from_records(self.import_records(text)?)?)
    }

    fn next_record(&self, kind: RecordKind, counts: &mut [usize; 3], sentence: String) -> Option<Record> {
        let (slot, prefix) = match kind {
            RecordKind::Cause => (0, 'C'),
            RecordKind::Action => (1, 'A'),
            RecordKind::Outcome => (2, 'O'),
        };
        counts[slot] += 1;
        let id = RecordId::new(format!("{}-{}{}", self.context, prefix, counts[slot])).ok()?;
        Some(Record::new(id, kind, self.context.clone(), self.timestamp).with_description(sentence))
    }
}

/// Record source reading one narrative text file.
#[derive(Debug, Clone)]
pub struct NarrativeRecordSource {
    path: PathBuf,
    importer: NarrativeImporter,
}

impl NarrativeRecordSource {
    pub fn new<P: AsRef<Path>>(path: P, importer: NarrativeImporter) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            importer,
        }
    }
}

#[async_trait]
impl RecordSource for NarrativeRecordSource {
    async fn load_snapshot(&self) -> Result<RecordSnapshot, DomainError> {
        let text = fs::read_to_string(&self.path).await.map_err(|e| {
            DomainError::new(ErrorCode::SourceUnavailable, format!("IO error: {}", e))
                .with_detail("path", self.path.display().to_string())
        })?;

        let snapshot = self.importer.import(&text)?;
        debug!(
            path = %self.path.display(),
            context = %self.importer.context,
            records = snapshot.len(),
            "Narrative imported"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::{ChainBuilder, Completeness};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn importer() -> NarrativeImporter {
        NarrativeImporter::with_timestamp(
            ContextId::new("ops").unwrap(),
            Timestamp::from_unix_secs(0).unwrap(),
        )
    }

    const NARRATIVE: &str = "Checkout failed because the connection pool was exhausted. \
        Raising the limit is not possible without a maintenance window. \
        We restarted the primary database node. \
        Latency recovered within five minutes of the change. \
        Short one. \
        The batch job was slow due to a missing index on orders. \
        Someone noted the dashboard looked odd today.";

    #[test]
    fn split_keeps_punctuation_and_drops_fragments() {
        let sentences =
            NarrativeImporter::split_sentences("This sentence is long enough! Tiny. Is this one long enough too?")
                .unwrap();
        assert_eq!(
            sentences,
            vec!["This sentence is long enough!", "Is this one long enough too?"]
        );
    }

    #[test]
    fn split_empty_text() {
        assert!(NarrativeImporter::split_sentences("").unwrap().is_empty());
    }

    #[test]
    fn sentence_boundary_compiles() {
        assert!(SENTENCE_BOUNDARY.is_ok());
    }

    #[test]
    fn builds_linked_records_in_reading_order() {
        let records = importer().import_records(NARRATIVE).unwrap();
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["ops-C1", "ops-A1", "ops-O1", "ops-C2"]);

        let c1 = &records[0];
        assert!(c1.links_to(&RecordId::new("ops-A1").unwrap()));
        assert_eq!(
            c1.tags.get("constraint.1"),
            Some("Raising the limit is not possible without a maintenance window.")
        );
        assert!(records[1].links_to(&RecordId::new("ops-O1").unwrap()));
    }

    #[test]
    fn imported_snapshot_builds_chains() {
        let snapshot = importer().import(NARRATIVE).unwrap();
        let chains = ChainBuilder::build_chains(&snapshot).unwrap();

        assert_eq!(chains.len(), 2);
        assert_eq!(chains[0].completeness, Completeness::Complete);
        assert_eq!(chains[1].completeness, Completeness::CauseOnly);
    }

    #[test]
    fn action_before_any_cause_is_an_orphan() {
        let records = importer()
            .import_records("We restarted the ingestion workers twice. Throughput recovered by the afternoon.")
            .unwrap();
        let snapshot = RecordSnapshot::from_records(records).unwrap();
        let chains = ChainBuilder::build_chains(&snapshot).unwrap();

        assert_eq!(chains.len(), 1);
        assert_eq!(chains[0].completeness, Completeness::OrphanAction);
        assert_eq!(chains[0].outcomes.len(), 1);
    }

    #[tokio::test]
    async fn source_reads_text_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", NARRATIVE).unwrap();

        let source = NarrativeRecordSource::new(file.path(), importer());
        let snapshot = source.load_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 4);
    }
}
