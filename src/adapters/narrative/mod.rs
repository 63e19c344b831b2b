//! Narrative import - turns free-text incident narratives into records.

mod narrative_importer;

pub use narrative_importer::{NarrativeImporter, NarrativeRecordSource, MIN_SENTENCE_CHARS};
