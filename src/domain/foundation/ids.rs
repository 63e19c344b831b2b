//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Identifier of a Cause, Action or Outcome record.
///
/// Ordering is lexicographic on the underlying string; every traversal in the
/// engine relies on it to stay deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Creates a new RecordId, returning error if empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("record_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for RecordId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Grouping key (project, team or domain) over which metrics are aggregated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContextId(String);

impl ContextId {
    /// Creates a new ContextId, returning error if empty or blank.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("context_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ContextId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContextId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContextId> for String {
    fn from(id: ContextId) -> Self {
        id.0
    }
}

/// Identifier of a derived causal chain: `<context>/<root record>`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(String);

impl ChainId {
    /// Derives the chain identifier from its context and root record.
    pub fn derive(context: &ContextId, root: &RecordId) -> Self {
        Self(format!("{}/{}", context, root))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for one analysis run (report envelope only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisRunId(Uuid);

impl AnalysisRunId {
    /// Creates a new random AnalysisRunId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnalysisRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AnalysisRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AnalysisRunId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_empty() {
        assert!(RecordId::new("").is_err());
        assert!(RecordId::new("   ").is_err());
    }

    #[test]
    fn record_id_orders_lexicographically() {
        let a = RecordId::new("A1").unwrap();
        let b = RecordId::new("A2").unwrap();
        let c = RecordId::new("B1").unwrap();
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn record_id_deserialize_rejects_empty() {
        let result: Result<RecordId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    #[test]
    fn record_id_round_trips_through_json() {
        let id = RecordId::new("C1").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"C1\"");
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn context_id_rejects_empty() {
        let err = ContextId::new("").unwrap_err();
        assert_eq!(format!("{}", err), "Field 'context_id' cannot be empty");
    }

    #[test]
    fn context_id_parses_from_str() {
        let ctx: ContextId = "TeamA".parse().unwrap();
        assert_eq!(ctx.as_str(), "TeamA");
    }

    #[test]
    fn chain_id_joins_context_and_root() {
        let ctx = ContextId::new("TeamA").unwrap();
        let root = RecordId::new("C1").unwrap();
        assert_eq!(ChainId::derive(&ctx, &root).as_str(), "TeamA/C1");
    }

    #[test]
    fn analysis_run_id_is_unique() {
        assert_ne!(AnalysisRunId::new(), AnalysisRunId::new());
    }

    #[test]
    fn analysis_run_id_parses_from_str() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: AnalysisRunId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }
}
