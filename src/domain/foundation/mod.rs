//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the decision record domain.

mod errors;
mod ids;
mod ratio;
mod record_kind;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AnalysisRunId, ChainId, ContextId, RecordId};
pub use ratio::Ratio;
pub use record_kind::RecordKind;
pub use timestamp::Timestamp;
