//! Core value types shared by forms and node fields
//!
//! A field is identified by its owner (a form id or a graph node id) and its
//! name. Its value is a tagged [`FieldValue`] whose tag must agree with the
//! field's declared [`FieldKind`].

use serde::{Deserialize, Serialize};

/// Identifier of the container that owns a field (form id or node id)
pub type OwnerId = String;

/// Name of a field within its owner
pub type FieldName = String;

/// The declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text
    String,
    /// One value out of a fixed option list
    Enum,
    /// Checkbox
    Boolean,
    /// Numeric value
    Number,
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::String => "string",
            Self::Enum => "enum",
            Self::Boolean => "boolean",
            Self::Number => "number",
        };
        f.write_str(name)
    }
}

/// A typed field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    String(String),
    Enum(String),
    Boolean(bool),
    Number(f64),
}

impl FieldValue {
    /// Create a string value
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Create an enum value
    pub fn enumeration(value: impl Into<String>) -> Self {
        Self::Enum(value.into())
    }

    /// The empty value for a kind, used when a template declares no default
    pub fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::String => Self::String(String::new()),
            FieldKind::Enum => Self::Enum(String::new()),
            FieldKind::Boolean => Self::Boolean(false),
            FieldKind::Number => Self::Number(0.0),
        }
    }

    /// The kind tag of this value
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::String(_) => FieldKind::String,
            Self::Enum(_) => FieldKind::Enum,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Number(_) => FieldKind::Number,
        }
    }

    /// Whether the value counts as "not filled in" for required checks.
    ///
    /// Only textual values can be empty; a checkbox or a number always
    /// carries a value.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::String(s) | Self::Enum(s) => s.trim().is_empty(),
            Self::Boolean(_) | Self::Number(_) => false,
        }
    }

    /// Borrow the textual content of a string or enum value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Enum(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Plain JSON form of the value, without the kind tag
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) | Self::Enum(s) => serde_json::Value::String(s.clone()),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
        }
    }
}

/// Presentation hint attached to a field template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiComponent {
    /// Multi-line text area
    Textarea,
    /// Explicit single-line input
    Input,
    /// Any hint this engine does not know about
    #[serde(other)]
    Other,
}

/// A single edit to a field, addressed by owner and field name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldChange {
    pub owner: OwnerId,
    pub field: FieldName,
    pub value: FieldValue,
}

impl FieldChange {
    pub fn new(owner: impl Into<String>, field: impl Into<String>, value: FieldValue) -> Self {
        Self {
            owner: owner.into(),
            field: field.into(),
            value,
        }
    }
}
