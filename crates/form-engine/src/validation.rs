//! Submit-time validation of form values
//!
//! Checks required fields, value kinds and enum membership. All problems
//! are collected so the form can mark every offending field at once.

use std::collections::BTreeMap;

use crate::template::FormSchema;
use crate::types::{FieldKind, FieldValue};

/// Validation error with field context
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is empty
    MissingRequired { field: String },
    /// A field holds a value of the wrong kind
    KindMismatch {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },
    /// An enum field holds a value that is not one of its options
    UnknownOption { field: String, value: String },
}

impl ValidationError {
    /// Name of the offending field
    pub fn field(&self) -> &str {
        match self {
            Self::MissingRequired { field }
            | Self::KindMismatch { field, .. }
            | Self::UnknownOption { field, .. } => field,
        }
    }

    /// Short message suitable for inline display next to the field
    pub fn message(&self) -> String {
        match self {
            Self::MissingRequired { .. } => "This field is required".to_string(),
            Self::KindMismatch { expected, .. } => format!("Expected a {} value", expected),
            Self::UnknownOption { value, .. } => format!("'{}' is not a valid choice", value),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => write!(f, "Required field '{}' is empty", field),
            Self::KindMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Field '{}' expects a {} value but holds a {} value",
                field, expected, found
            ),
            Self::UnknownOption { field, value } => {
                write!(f, "Field '{}' has unknown option '{}'", field, value)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate form values against a schema
///
/// Returns all validation errors found (not just the first), in schema
/// field order.
pub fn validate_form(
    schema: &FormSchema,
    values: &BTreeMap<String, FieldValue>,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for template in schema.fields() {
        let value = match values.get(&template.name) {
            Some(value) => value,
            None => {
                if template.required {
                    errors.push(ValidationError::MissingRequired {
                        field: template.name.clone(),
                    });
                }
                continue;
            }
        };

        if value.kind() != template.kind {
            errors.push(ValidationError::KindMismatch {
                field: template.name.clone(),
                expected: template.kind,
                found: value.kind(),
            });
            continue;
        }

        if template.required && value.is_empty() {
            errors.push(ValidationError::MissingRequired {
                field: template.name.clone(),
            });
            continue;
        }

        if let FieldValue::Enum(choice) = value {
            let known = template.options.is_empty()
                || choice.is_empty()
                || template.options.iter().any(|o| &o.value == choice);
            if !known {
                errors.push(ValidationError::UnknownOption {
                    field: template.name.clone(),
                    value: choice.clone(),
                });
            }
        }
    }

    errors
}
