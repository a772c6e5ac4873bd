//! Local form state
//!
//! Holds the current value of every field, the values to reset to, the set
//! of fields the user has edited, and the inline error attached to each
//! field after a failed submit.

use std::collections::{BTreeMap, BTreeSet};

use crate::types::FieldValue;
use crate::validation::ValidationError;

/// Current values plus per-field edit and error state
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: BTreeMap<String, FieldValue>,
    initial: BTreeMap<String, FieldValue>,
    dirty: BTreeSet<String>,
    errors: BTreeMap<String, String>,
}

impl FormState {
    /// Create a state whose current and reset values are `initial`
    pub fn new(initial: BTreeMap<String, FieldValue>) -> Self {
        Self {
            values: initial.clone(),
            initial,
            dirty: BTreeSet::new(),
            errors: BTreeMap::new(),
        }
    }

    /// Current value of a field
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// All current values
    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    /// The values `reset` restores
    pub fn initial_values(&self) -> &BTreeMap<String, FieldValue> {
        &self.initial
    }

    /// Record a user edit. Marks the field dirty and clears its error.
    pub fn set(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
        self.dirty.insert(field.to_string());
        self.errors.remove(field);
    }

    /// Write a value the user did not type (seed or derivation).
    /// The field stays clean.
    pub fn set_derived(&mut self, field: &str, value: FieldValue) {
        self.values.insert(field.to_string(), value);
        self.errors.remove(field);
    }

    /// Change the reset value of a field, and its current value too when
    /// the user has not edited it
    pub fn set_initial(&mut self, field: &str, value: FieldValue) {
        if !self.dirty.contains(field) {
            self.values.insert(field.to_string(), value.clone());
        }
        self.initial.insert(field.to_string(), value);
    }

    /// Whether the user has edited this field since the last reset
    pub fn is_dirty(&self, field: &str) -> bool {
        self.dirty.contains(field)
    }

    /// Whether any field has been edited since the last reset
    pub fn has_edits(&self) -> bool {
        !self.dirty.is_empty()
    }

    /// Inline error message for a field
    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(|s| s.as_str())
    }

    /// Replace all inline errors with the given validation results
    pub fn set_errors(&mut self, errors: &[ValidationError]) {
        self.errors = errors
            .iter()
            .map(|e| (e.field().to_string(), e.message()))
            .collect();
    }

    /// Restore reset values and clear edit and error state
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.dirty.clear();
        self.errors.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> FormState {
        let mut initial = BTreeMap::new();
        initial.insert("name".to_string(), FieldValue::string(""));
        initial.insert("path".to_string(), FieldValue::string("/a.ckpt"));
        FormState::new(initial)
    }

    #[test]
    fn test_set_marks_dirty_and_reset_restores() {
        let mut state = state();
        state.set("name", FieldValue::string("mine"));
        assert!(state.is_dirty("name"));
        assert!(state.has_edits());

        state.reset();
        assert_eq!(state.get("name"), Some(&FieldValue::string("")));
        assert!(!state.has_edits());
    }

    #[test]
    fn test_set_derived_stays_clean() {
        let mut state = state();
        state.set_derived("name", FieldValue::string("a"));
        assert!(!state.is_dirty("name"));
        assert_eq!(state.get("name"), Some(&FieldValue::string("a")));
    }

    #[test]
    fn test_set_initial_respects_edits() {
        let mut state = state();
        state.set("path", FieldValue::string("/typed.ckpt"));
        state.set_initial("path", FieldValue::string("/seed.ckpt"));
        assert_eq!(state.get("path"), Some(&FieldValue::string("/typed.ckpt")));

        state.reset();
        assert_eq!(state.get("path"), Some(&FieldValue::string("/seed.ckpt")));
    }

    #[test]
    fn test_errors_cleared_by_edit() {
        let mut state = state();
        state.set_errors(&[ValidationError::MissingRequired {
            field: "name".to_string(),
        }]);
        assert_eq!(state.error("name"), Some("This field is required"));

        state.set("name", FieldValue::string("x"));
        assert!(state.error("name").is_none());
    }
}
