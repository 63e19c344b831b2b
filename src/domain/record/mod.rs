//! Record module - decision records and the snapshot they are analyzed in.
//!
//! # Components
//!
//! - `Record` - a Cause, Action or Outcome with links and tags
//! - `Tags` - key-value constraints with exact-match and similarity helpers
//! - `RecordSnapshot` - arena keyed by `RecordId`, the engine's only input
//! - `RoleClassifier` - rule-based sentence roles for narrative import

mod decision_record;
mod role_classifier;
mod snapshot;
mod tags;

pub use decision_record::Record;
pub use role_classifier::{RoleClassifier, SentenceRole};
pub use snapshot::RecordSnapshot;
pub use tags::Tags;
