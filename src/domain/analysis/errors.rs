//! Analysis error taxonomy.
//!
//! Every variant is a data or configuration fault. None is transient and none
//! is retried.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::domain::foundation::{ContextId, DomainError, ErrorCode, RecordId, RecordKind};

/// Why a link was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "fault")]
pub enum LinkFault {
    /// The target identifier is not in the snapshot.
    MissingTarget,
    /// The link direction is not a permitted causal direction.
    InvalidDirection { from: RecordKind, to: RecordKind },
    /// The target belongs to another context.
    CrossContext { target_context: ContextId },
}

impl fmt::Display for LinkFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkFault::MissingTarget => write!(f, "target does not exist"),
            LinkFault::InvalidDirection { from, to } => {
                write!(f, "a {} cannot link to a {}", from, to)
            }
            LinkFault::CrossContext { target_context } => {
                write!(f, "target belongs to context '{}'", target_context)
            }
        }
    }
}

/// Errors raised by the chain builder, analyzers and recommendation engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Record '{record}' in context '{context}' has a malformed link to '{target}': {fault}")]
    MalformedLink {
        context: ContextId,
        record: RecordId,
        target: RecordId,
        fault: LinkFault,
    },

    #[error("Cycle detected in context '{context}': {}", render_path(.path))]
    CycleDetected { context: ContextId, path: Vec<RecordId> },

    #[error("Record '{record}' appears more than once in the snapshot")]
    DuplicateRecord { record: RecordId },

    #[error("Record '{record}' is a {actual}, expected a {expected}")]
    InvalidRecordKind {
        record: RecordId,
        expected: RecordKind,
        actual: RecordKind,
    },

    #[error("Record '{record}' not found")]
    UnknownRecord { record: RecordId },

    #[error("No candidate actions supplied for cause '{cause}'")]
    NoCandidates { cause: RecordId },

    #[error("Invalid configuration for '{option}': {reason}")]
    InvalidConfiguration { option: String, reason: String },

    #[error("Pattern '{pattern}' failed to compile: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

fn render_path(path: &[RecordId]) -> String {
    path.iter()
        .map(RecordId::as_str)
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl AnalysisError {
    /// Creates an invalid configuration error.
    pub fn invalid_configuration(option: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: &str, err: &regex::Error) -> Self {
        AnalysisError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            AnalysisError::MalformedLink { .. } => ErrorCode::MalformedLink,
            AnalysisError::CycleDetected { .. } => ErrorCode::CycleDetected,
            AnalysisError::DuplicateRecord { .. } => ErrorCode::DuplicateRecord,
            AnalysisError::InvalidRecordKind { .. } => ErrorCode::InvalidRecordKind,
            AnalysisError::UnknownRecord { .. } => ErrorCode::RecordNotFound,
            AnalysisError::NoCandidates { .. } => ErrorCode::NoCandidates,
            AnalysisError::InvalidConfiguration { .. } => ErrorCode::InvalidConfiguration,
            AnalysisError::InvalidPattern { .. } => ErrorCode::InternalError,
        }
    }

    /// The context the fault was found in, when known.
    pub fn context(&self) -> Option<&ContextId> {
        match self {
            AnalysisError::MalformedLink { context, .. }
            | AnalysisError::CycleDetected { context, .. } => Some(context),
            _ => None,
        }
    }

    /// The offending record, when there is one.
    pub fn record(&self) -> Option<&RecordId> {
        match self {
            AnalysisError::MalformedLink { record, .. }
            | AnalysisError::DuplicateRecord { record }
            | AnalysisError::InvalidRecordKind { record, .. }
            | AnalysisError::UnknownRecord { record } => Some(record),
            AnalysisError::CycleDetected { path, .. } => path.first(),
            AnalysisError::NoCandidates { cause } => Some(cause),
            AnalysisError::InvalidConfiguration { .. } | AnalysisError::InvalidPattern { .. } => None,
        }
    }
}

impl From<AnalysisError> for DomainError {
    fn from(err: AnalysisError) -> Self {
        let mut domain = DomainError::new(err.code(), err.to_string());
        if let Some(context) = err.context() {
            domain = domain.with_detail("context", context.as_str());
        }
        if let Some(record) = err.record() {
            domain = domain.with_detail("record", record.as_str());
        }
        if let AnalysisError::InvalidConfiguration { option, .. } = &err {
            domain = domain.with_detail("option", option.as_str());
        }
        domain
    }
}
