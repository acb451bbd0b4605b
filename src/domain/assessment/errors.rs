//! Assessment-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, ValidationError};

/// Errors raised by lifecycle and snapshot operations.
///
/// Logical outcomes the user can act on (record not found, grace period
/// over, partial bulk failure) are reported in-band by the handlers'
/// outcome structs; this enum covers the cases that abort an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    /// The requested type is not in the instrument catalog.
    UnknownType(String),
    /// Input failed validation before any storage was touched.
    ValidationFailed { field: String, message: String },
    /// Bulk soft deletion attempted without the confirmation phrase.
    ConfirmationRequired,
    /// User is not authorized for this record.
    Forbidden,
    /// A store or cache round-trip failed.
    Infrastructure(String),
    /// A store round-trip exceeded its deadline. Safe to retry.
    Timeout(String),
}

impl AssessmentError {
    pub fn unknown_type(value: impl Into<String>) -> Self {
        AssessmentError::UnknownType(value.into())
    }
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AssessmentError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
    pub fn confirmation_required() -> Self {
        AssessmentError::ConfirmationRequired
    }
    pub fn forbidden() -> Self {
        AssessmentError::Forbidden
    }
    pub fn infrastructure(message: impl Into<String>) -> Self {
        AssessmentError::Infrastructure(message.into())
    }
    pub fn timeout(message: impl Into<String>) -> Self {
        AssessmentError::Timeout(message.into())
    }
    pub fn code(&self) -> ErrorCode {
        match self {
            AssessmentError::UnknownType(_) => ErrorCode::UnknownAssessmentType,
            AssessmentError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            AssessmentError::ConfirmationRequired => ErrorCode::ConfirmationRequired,
            AssessmentError::Forbidden => ErrorCode::Forbidden,
            AssessmentError::Infrastructure(_) => ErrorCode::DatabaseError,
            AssessmentError::Timeout(_) => ErrorCode::Timeout,
        }
    }
    pub fn message(&self) -> String {
        match self {
            AssessmentError::UnknownType(value) => {
                format!("Unknown assessment type: {}", value)
            }
            AssessmentError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            AssessmentError::ConfirmationRequired => {
                "Deleting all assessments requires the confirmation phrase".to_string()
            }
            AssessmentError::Forbidden => "Permission denied".to_string(),
            AssessmentError::Infrastructure(msg) => format!("Error: {}", msg),
            AssessmentError::Timeout(msg) => format!("Operation timed out: {}", msg),
        }
    }

    /// Whether a retry of the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AssessmentError::Infrastructure(_) | AssessmentError::Timeout(_)
        )
    }
}

impl std::fmt::Display for AssessmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for AssessmentError {}

impl From<DomainError> for AssessmentError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => AssessmentError::Forbidden,
            ErrorCode::UnknownAssessmentType => AssessmentError::UnknownType(err.message),
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat | ErrorCode::EmptyField
            | ErrorCode::OutOfRange => AssessmentError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            ErrorCode::Timeout => AssessmentError::Timeout(err.message),
            _ => AssessmentError::Infrastructure(err.to_string()),
        }
    }
}

impl From<ValidationError> for AssessmentError {
    fn from(err: ValidationError) -> Self {
        match &err {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => AssessmentError::ValidationFailed {
                field: field.clone(),
                message: err.to_string(),
            },
        }
    }
}
