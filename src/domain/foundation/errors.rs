//! Error types for the domain layer.

use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between 0 and 1, got {actual}")]
    NotAFraction { field: String, actual: f64 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a fraction out of range validation error.
    pub fn not_a_fraction(field: impl Into<String>, actual: f64) -> Self {
        ValidationError::NotAFraction {
            field: field.into(),
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,
    InvalidConfiguration,

    // Record integrity errors
    MalformedLink,
    CycleDetected,
    DuplicateRecord,
    InvalidRecordKind,

    // Not found errors
    RecordNotFound,
    ContextNotFound,

    // Request errors
    NoCandidates,

    // Infrastructure errors
    SourceUnavailable,
    SinkUnavailable,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidConfiguration => "INVALID_CONFIGURATION",
            ErrorCode::MalformedLink => "MALFORMED_LINK",
            ErrorCode::CycleDetected => "CYCLE_DETECTED",
            ErrorCode::DuplicateRecord => "DUPLICATE_RECORD",
            ErrorCode::InvalidRecordKind => "INVALID_RECORD_KIND",
            ErrorCode::RecordNotFound => "RECORD_NOT_FOUND",
            ErrorCode::ContextNotFound => "CONTEXT_NOT_FOUND",
            ErrorCode::NoCandidates => "NO_CANDIDATES",
            ErrorCode::SourceUnavailable => "SOURCE_UNAVAILABLE",
            ErrorCode::SinkUnavailable => "SINK_UNAVAILABLE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Details are ordered so that rendered errors are stable across runs.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: BTreeMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: BTreeMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = match &err {
            ValidationError::EmptyField { field }
            | ValidationError::NotAFraction { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field.clone(),
        };
        DomainError::validation(field, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("record_id");
        assert_eq!(format!("{}", err), "Field 'record_id' cannot be empty");
    }

    #[test]
    fn validation_error_not_a_fraction_displays_correctly() {
        let err = ValidationError::not_a_fraction("ratio", 1.5);
        assert_eq!(format!("{}", err), "Field 'ratio' must be between 0 and 1, got 1.5");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("timestamp", "missing offset");
        assert_eq!(
            format!("{}", err),
            "Field 'timestamp' has invalid format: missing offset"
        );
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::NoCandidates, "No candidate actions supplied");
        assert_eq!(format!("{}", err), "[NO_CANDIDATES] No candidate actions supplied");
    }

    #[test]
    fn domain_error_with_detail_adds_detail() {
        let err = DomainError::new(ErrorCode::MalformedLink, "Link target missing")
            .with_detail("record", "A1")
            .with_detail("context", "TeamA");

        assert_eq!(err.details.get("record"), Some(&"A1".to_string()));
        assert_eq!(err.details.get("context"), Some(&"TeamA".to_string()));
    }

    #[test]
    fn domain_error_from_validation_keeps_field() {
        let err: DomainError = ValidationError::empty_field("context_id").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.details.get("field"), Some(&"context_id".to_string()));
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::CycleDetected), "CYCLE_DETECTED");
        assert_eq!(format!("{}", ErrorCode::InvalidConfiguration), "INVALID_CONFIGURATION");
    }
}
