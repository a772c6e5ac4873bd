//! Value sources
//!
//! The same rendered control can be backed by local form state (a form's
//! own controller) or by an external store keyed by graph node id. Both
//! implement [`ValueSource`], so renderers never care where a value lives.

use crate::controller::FormController;
use crate::error::{FormEngineError, Result};
use crate::types::{FieldChange, FieldValue};

/// Owner of field values that renderers read from and write edits to
pub trait ValueSource {
    /// Current value of a field, if the source knows it
    fn read(&self, owner: &str, field: &str) -> Option<FieldValue>;

    /// Apply one edit
    fn write(&mut self, change: FieldChange) -> Result<()>;
}

impl ValueSource for FormController {
    fn read(&self, owner: &str, field: &str) -> Option<FieldValue> {
        if owner != self.form_id() {
            return None;
        }
        self.value(field).ok().cloned()
    }

    fn write(&mut self, change: FieldChange) -> Result<()> {
        if change.owner != self.form_id() {
            return Err(FormEngineError::unknown_field(change.owner, change.field));
        }
        self.set_value(&change.field, change.value)
    }
}

/// Back-reference from a control to a field living in an external store.
///
/// Used only to address reads and writes; the store owns the value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeFieldBinding {
    pub node_id: String,
    pub field_name: String,
}

impl NodeFieldBinding {
    pub fn new(node_id: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            node_id: node_id.into(),
            field_name: field_name.into(),
        }
    }

    /// Read the bound value from a source
    pub fn read<S: ValueSource + ?Sized>(&self, source: &S) -> Option<FieldValue> {
        source.read(&self.node_id, &self.field_name)
    }

    /// Write a new value for the bound field to a source
    pub fn write<S: ValueSource + ?Sized>(&self, source: &mut S, value: FieldValue) -> Result<()> {
        source.write(FieldChange::new(
            self.node_id.clone(),
            self.field_name.clone(),
            value,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{render_field, EditInput};
    use crate::template::{FieldTemplate, FormSchema};

    fn form() -> FormController {
        let schema = FormSchema::new("form-a")
            .field(FieldTemplate::string("name", "Name"))
            .field(FieldTemplate::boolean("enabled", "Enabled"));
        FormController::initialize(schema, None).unwrap()
    }

    #[test]
    fn test_form_controller_as_source() {
        let mut form = form();
        let binding = NodeFieldBinding::new("form-a", "name");

        binding.write(&mut form, FieldValue::string("x")).unwrap();
        assert_eq!(binding.read(&form), Some(FieldValue::string("x")));
        assert!(form.state().is_dirty("name"));
    }

    #[test]
    fn test_foreign_owner_rejected() {
        let mut form = form();
        assert!(form.read("form-b", "name").is_none());
        let err = form
            .write(FieldChange::new("form-b", "name", FieldValue::string("x")))
            .unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn test_renderer_writes_through_form() {
        let mut form = form();
        let rendered = render_field(form.render_props("enabled").unwrap());
        rendered.edit(EditInput::Checked(true), &mut form).unwrap();
        assert_eq!(form.value("enabled").unwrap(), &FieldValue::Boolean(true));

        let rendered = render_field(form.render_props("enabled").unwrap());
        assert_eq!(
            rendered.control(),
            &crate::render::Control::Checkbox { checked: true }
        );
    }
}
