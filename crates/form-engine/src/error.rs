//! Error types for the form engine

use thiserror::Error;

use crate::types::FieldKind;
use crate::validation::ValidationError;

/// Result type alias using FormEngineError
pub type Result<T> = std::result::Result<T, FormEngineError>;

/// Errors that can occur while binding, editing or submitting a form
#[derive(Debug, Error)]
pub enum FormEngineError {
    /// A binding was requested for a field the schema does not declare.
    ///
    /// This is a contract violation by the caller, not a user-facing
    /// condition. Callers should fail fast instead of recovering.
    #[error("Unknown field '{field}' for owner '{owner}'")]
    UnknownField { owner: String, field: String },

    /// One or more fields failed validation at submit time
    #[error("Form validation failed: {}", describe(.0))]
    Validation(Vec<ValidationError>),

    /// A value of the wrong kind was written to a field
    #[error("Invalid value for '{field}': expected {expected}, got {found}")]
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    /// Raw control input could not be turned into a field value
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// The field has no selectable options, so it has no entry modes to toggle
    #[error("Field '{0}' does not support switching entry mode")]
    NoEntryModes(String),

    /// A runtime option list could not be fetched
    #[error("Options unavailable for '{field}': {message}")]
    OptionsUnavailable { field: String, message: String },

    /// The form was unmounted and can no longer be submitted
    #[error("Form '{0}' is unmounted")]
    Unmounted(String),

    /// Another submission for the same form is still in flight
    #[error("Submission already in flight for form '{0}'")]
    SubmissionInFlight(String),

    /// The external submit handler rejected the request
    #[error("Submission failed: {0}")]
    SubmissionFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FormEngineError {
    /// Create an unknown-field error
    pub fn unknown_field(owner: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            owner: owner.into(),
            field: field.into(),
        }
    }

    /// Whether this error is a programming-contract violation rather than
    /// something a user can fix by editing the form
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Self::UnknownField { .. } | Self::NoEntryModes(_))
    }

    /// Validation errors carried by this error, if any
    pub fn validation_errors(&self) -> &[ValidationError] {
        match self {
            Self::Validation(errors) => errors,
            _ => &[],
        }
    }
}

fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
