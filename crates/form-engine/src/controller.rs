//! Form controller
//!
//! Owns the state of one form instance: current values, entry modes of
//! select-or-type fields, and the in-flight submission token. Every mutation
//! goes through the controller so the rendered value is always the last
//! value written.

use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{FormEngineError, Result};
use crate::options::FieldOption;
use crate::render::{EntryMode, RenderProps};
use crate::state::FormState;
use crate::template::{FieldTemplate, FormSchema};
use crate::types::{FieldChange, FieldKind, FieldValue};
use crate::validation::{validate_form, ValidationError};

/// Identifies one submission attempt of a form instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SubmissionToken(Uuid);

impl SubmissionToken {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubmissionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Snapshot of a form's values taken at submit time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    form_id: String,
    values: BTreeMap<String, FieldValue>,
}

impl SubmissionRequest {
    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn values(&self) -> &BTreeMap<String, FieldValue> {
        &self.values
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values.get(field)
    }

    /// Text of a string or enum field
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(|v| v.as_str())
    }

    /// Flat JSON object of field name to plain value
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        serde_json::Value::Object(map)
    }
}

/// Values that override schema defaults, e.g. a model path detected by a
/// folder scan
#[derive(Debug, Clone, Default)]
pub struct FormSeed {
    values: Vec<(String, FieldValue)>,
}

impl FormSeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.values.push((field.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Owner of a form's field values until submission
#[derive(Debug)]
pub struct FormController {
    schema: FormSchema,
    state: FormState,
    entry_modes: BTreeMap<String, EntryMode>,
    in_flight: Option<SubmissionToken>,
}

impl FormController {
    /// Create a form from schema defaults, optionally overridden by a seed
    pub fn initialize(schema: FormSchema, seed: Option<FormSeed>) -> Result<Self> {
        let defaults = schema
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.default.clone()))
            .collect();
        let entry_modes = schema
            .fields()
            .iter()
            .filter(|f| f.allows_free_text)
            .map(|f| (f.name.clone(), EntryMode::Select))
            .collect();

        let mut controller = Self {
            schema,
            state: FormState::new(defaults),
            entry_modes,
            in_flight: None,
        };

        if let Some(seed) = seed {
            controller.apply_seed(seed)?;
        }

        Ok(controller)
    }

    /// Apply seed values as the new reset values.
    ///
    /// Fields the user already edited keep their edited value, and so do
    /// fields derived from a seeded field.
    pub fn apply_seed(&mut self, seed: FormSeed) -> Result<()> {
        for (field, value) in &seed.values {
            self.check_kind(field, value)?;
        }

        for (field, value) in seed.values {
            if self.state.is_dirty(&field) {
                log::debug!(
                    "Form {}: seed for '{}' ignored, field was edited",
                    self.schema.form_id(),
                    field
                );
                continue;
            }

            let text = value.as_str().map(|s| s.to_string());
            self.state.set_initial(&field, value);

            let Some(text) = text else { continue };
            for rule in self.schema.derived_fields().iter().filter(|r| r.source == field) {
                if self.state.is_dirty(&rule.target) {
                    continue;
                }
                if let Some(derived) = (rule.derive)(&text).filter(|d| !d.is_empty()) {
                    if let Some(value) = self.text_value(&rule.target, derived) {
                        log::debug!(
                            "Form {}: seeded '{}' from '{}'",
                            self.schema.form_id(),
                            rule.target,
                            field
                        );
                        self.state.set_initial(&rule.target, value);
                    }
                }
            }
        }

        Ok(())
    }

    pub fn form_id(&self) -> &str {
        self.schema.form_id()
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// Template of a declared field
    pub fn template(&self, field: &str) -> Result<&FieldTemplate> {
        self.schema
            .get(field)
            .ok_or_else(|| FormEngineError::unknown_field(self.form_id(), field))
    }

    /// Current value of a declared field
    pub fn value(&self, field: &str) -> Result<&FieldValue> {
        let template = self.template(field)?;
        Ok(self.state.get(field).unwrap_or(&template.default))
    }

    /// Binding for a declared field: its value plus change and blur handlers
    pub fn binding(&mut self, field: &str) -> Result<FieldBinding<'_>> {
        let template = self.template(field)?.clone();
        Ok(FieldBinding {
            controller: self,
            template,
        })
    }

    /// Write a user edit to a field
    pub fn set_value(&mut self, field: &str, value: FieldValue) -> Result<()> {
        self.check_kind(field, &value)?;
        self.state.set(field, value);
        Ok(())
    }

    /// Handle a field losing focus.
    ///
    /// Runs each derivation whose source is `field`, once. A derivation only
    /// fills its target while the target is still unset: exactly the empty
    /// string or its declared default. Whitespace typed by the user counts
    /// as a value. Returns the changes that were applied.
    pub fn blur(&mut self, field: &str) -> Result<Vec<FieldChange>> {
        let text = match self.value(field)?.as_str() {
            Some(text) => text.to_string(),
            None => return Ok(Vec::new()),
        };

        let rules: Vec<_> = self
            .schema
            .derived_fields()
            .iter()
            .filter(|r| r.source == field)
            .cloned()
            .collect();

        let mut changes = Vec::new();
        for rule in rules {
            if !self.is_unset(&rule.target)? {
                continue;
            }
            let Some(derived) = (rule.derive)(&text).filter(|d| !d.is_empty()) else {
                continue;
            };
            if let Some(value) = self.text_value(&rule.target, derived) {
                log::debug!(
                    "Form {}: derived '{}' from '{}' on blur",
                    self.form_id(),
                    rule.target,
                    field
                );
                self.state.set_derived(&rule.target, value.clone());
                changes.push(FieldChange::new(self.form_id(), rule.target.clone(), value));
            }
        }

        Ok(changes)
    }

    /// Current entry mode of a field
    pub fn entry_mode(&self, field: &str) -> Result<EntryMode> {
        let template = self.template(field)?;
        Ok(self
            .entry_modes
            .get(field)
            .copied()
            .unwrap_or_else(|| EntryMode::default_for(template)))
    }

    /// Switch a select-or-type field between picking and typing.
    ///
    /// The field value is left untouched; only the control that owns it
    /// changes.
    pub fn toggle_entry_mode(&mut self, field: &str) -> Result<EntryMode> {
        self.template(field)?;
        let form_id = self.schema.form_id().to_string();
        let mode = self
            .entry_modes
            .get_mut(field)
            .ok_or_else(|| FormEngineError::NoEntryModes(field.to_string()))?;
        *mode = mode.toggled();
        log::debug!("Form {}: '{}' entry mode is now {:?}", form_id, field, mode);
        Ok(*mode)
    }

    /// Replace the selectable options of a field
    pub fn set_options(&mut self, field: &str, options: Vec<FieldOption>) -> Result<()> {
        let form_id = self.form_id().to_string();
        let template = self
            .schema
            .get_mut(field)
            .ok_or_else(|| FormEngineError::unknown_field(form_id, field))?;
        template.options = options;
        Ok(())
    }

    /// Props to render a field with, projected from current state
    pub fn render_props(&self, field: &str) -> Result<RenderProps> {
        let template = self.template(field)?;
        Ok(RenderProps::from_template(
            self.form_id(),
            template,
            self.value(field)?.clone(),
            self.entry_mode(field)?,
        ))
    }

    /// Validate current values, recording inline errors
    pub fn validate(&mut self) -> Vec<ValidationError> {
        let errors = validate_form(&self.schema, self.state.values());
        self.state.set_errors(&errors);
        errors
    }

    /// Validate and package current values
    pub fn submit(&mut self) -> Result<SubmissionRequest> {
        let errors = self.validate();
        if !errors.is_empty() {
            log::debug!(
                "Form {}: submit blocked by {} validation error(s)",
                self.form_id(),
                errors.len()
            );
            return Err(FormEngineError::Validation(errors));
        }

        Ok(SubmissionRequest {
            form_id: self.form_id().to_string(),
            values: self.state.values().clone(),
        })
    }

    /// Start an async submission.
    ///
    /// Rejects the call while another submission of this form is in flight.
    pub fn begin_submission(&mut self) -> Result<(SubmissionToken, SubmissionRequest)> {
        if self.in_flight.is_some() {
            return Err(FormEngineError::SubmissionInFlight(self.form_id().to_string()));
        }
        let request = self.submit()?;
        let token = SubmissionToken::new();
        self.in_flight = Some(token);
        Ok((token, request))
    }

    /// Complete an async submission.
    ///
    /// A success resets the form; a failure leaves every value as it was.
    /// Returns false, without touching state, when `token` is not the
    /// submission currently in flight (the form was reset or unmounted
    /// while the request was outstanding).
    pub fn finish_submission(&mut self, token: SubmissionToken, succeeded: bool) -> bool {
        if self.in_flight != Some(token) {
            return false;
        }
        self.in_flight = None;
        if succeeded {
            self.state.reset();
        }
        true
    }

    /// Whether a submission is outstanding
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Restore reset values and forget any outstanding submission
    pub fn reset(&mut self) {
        self.in_flight = None;
        self.state.reset();
    }

    fn is_unset(&self, field: &str) -> Result<bool> {
        let template = self.template(field)?;
        let value = self.value(field)?;
        Ok(value.as_str() == Some("") || value == &template.default)
    }

    fn check_kind(&self, field: &str, value: &FieldValue) -> Result<()> {
        let template = self.template(field)?;
        if template.kind != value.kind() {
            return Err(FormEngineError::KindMismatch {
                field: field.to_string(),
                expected: template.kind,
                found: value.kind(),
            });
        }
        Ok(())
    }

    fn text_value(&self, field: &str, text: String) -> Option<FieldValue> {
        match self.schema.get(field)?.kind {
            FieldKind::String => Some(FieldValue::String(text)),
            FieldKind::Enum => Some(FieldValue::Enum(text)),
            FieldKind::Boolean | FieldKind::Number => None,
        }
    }
}

/// A field's current value paired with its change and blur handlers
pub struct FieldBinding<'a> {
    controller: &'a mut FormController,
    template: FieldTemplate,
}

impl FieldBinding<'_> {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn template(&self) -> &FieldTemplate {
        &self.template
    }

    pub fn value(&self) -> &FieldValue {
        self.controller
            .state
            .get(&self.template.name)
            .unwrap_or(&self.template.default)
    }

    /// Inline validation message from the last submit attempt
    pub fn error(&self) -> Option<&str> {
        self.controller.state.error(&self.template.name)
    }

    pub fn on_change(&mut self, value: FieldValue) -> Result<()> {
        self.controller.set_value(&self.template.name, value)
    }

    pub fn on_blur(&mut self) -> Result<Vec<FieldChange>> {
        self.controller.blur(&self.template.name)
    }
}
