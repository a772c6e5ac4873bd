//! Field templates and form schemas
//!
//! A [`FieldTemplate`] is the read-only metadata for one field: its kind,
//! label, default, presentation hint and option list. Node types describe
//! their fields with a [`NodeTemplate`]; forms describe theirs with a
//! [`FormSchema`]. Both are the single source of truth a renderer and a
//! validator work from.

use serde::{Deserialize, Serialize};

use crate::options::FieldOption;
use crate::types::{FieldKind, FieldValue, UiComponent};

/// Metadata for a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldTemplate {
    /// Field name (key in the owning container)
    pub name: String,
    /// Human-readable label
    pub label: String,
    /// Declared value kind
    pub kind: FieldKind,
    /// Whether the field must be non-empty on submit
    pub required: bool,
    /// Value used when the container is created or reset
    pub default: FieldValue,
    /// Presentation hint (`textarea` or default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_component: Option<UiComponent>,
    /// Selectable options for enum fields and select-or-type fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    /// Whether a select field may switch to free-text entry
    #[serde(default)]
    pub allows_free_text: bool,
}

impl FieldTemplate {
    fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            required: false,
            default: FieldValue::empty(kind),
            ui_component: None,
            options: Vec::new(),
            allows_free_text: false,
        }
    }

    /// A text field defaulting to the empty string
    pub fn string(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::String)
    }

    /// An enum field; the default is the first option, if any
    pub fn enumeration(
        name: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FieldOption>,
    ) -> Self {
        let mut template = Self::new(name, label, FieldKind::Enum);
        if let Some(first) = options.first() {
            template.default = FieldValue::Enum(first.value.clone());
        }
        template.options = options;
        template
    }

    pub fn boolean(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Boolean)
    }

    pub fn number(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(name, label, FieldKind::Number)
    }

    /// Mark this field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.default = value;
        self
    }

    /// Set the presentation hint
    pub fn with_ui_component(mut self, hint: UiComponent) -> Self {
        self.ui_component = Some(hint);
        self
    }

    /// Set the selectable options
    pub fn with_options(mut self, options: Vec<FieldOption>) -> Self {
        self.options = options;
        self
    }

    /// Allow the user to switch between picking an option and typing a value
    pub fn with_free_text(mut self) -> Self {
        self.allows_free_text = true;
        self
    }

    /// Whether this field is rendered as a select when in select mode
    pub fn is_selectable(&self) -> bool {
        self.kind == FieldKind::Enum || (self.allows_free_text && self.kind == FieldKind::String)
    }
}

/// Field set of a node type in the graph editor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTemplate {
    /// Unique type identifier (e.g., "string")
    pub node_type: String,
    /// Human-readable label
    pub label: String,
    /// Description of the node
    pub description: String,
    /// Input fields editable on the node
    pub fields: Vec<FieldTemplate>,
}

impl NodeTemplate {
    /// Find a field template by name
    pub fn field(&self, name: &str) -> Option<&FieldTemplate> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Trait for node types that describe their own field templates
pub trait TemplateDescriptor {
    fn descriptor() -> NodeTemplate
    where
        Self: Sized;
}

/// Link-time registration of a node template.
///
/// ```ignore
/// inventory::submit!(form_engine::TemplateDescriptorFn(StringNode::descriptor));
/// ```
pub struct TemplateDescriptorFn(pub fn() -> NodeTemplate);

inventory::collect!(TemplateDescriptorFn);

/// Function deriving a dependent field's value from a source field's text.
pub type DeriveFn = fn(&str) -> Option<String>;

/// A rule that fills `target` from `source` when `source` loses focus
#[derive(Debug, Clone)]
pub struct DerivedField {
    pub source: String,
    pub target: String,
    pub derive: DeriveFn,
}

/// The fixed field set of a form
#[derive(Debug, Clone)]
pub struct FormSchema {
    form_id: String,
    fields: Vec<FieldTemplate>,
    derived: Vec<DerivedField>,
}

impl FormSchema {
    /// Create an empty schema for the given form id
    pub fn new(form_id: impl Into<String>) -> Self {
        Self {
            form_id: form_id.into(),
            fields: Vec::new(),
            derived: Vec::new(),
        }
    }

    /// Add a field. A later field with the same name replaces the earlier one.
    pub fn field(mut self, template: FieldTemplate) -> Self {
        self.fields.retain(|f| f.name != template.name);
        self.fields.push(template);
        self
    }

    /// Derive `target` from `source` on blur
    pub fn derive(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        derive: DeriveFn,
    ) -> Self {
        self.derived.push(DerivedField {
            source: source.into(),
            target: target.into(),
            derive,
        });
        self
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn fields(&self) -> &[FieldTemplate] {
        &self.fields
    }

    pub fn derived_fields(&self) -> &[DerivedField] {
        &self.derived
    }

    /// Find a field template by name
    pub fn get(&self, name: &str) -> Option<&FieldTemplate> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut FieldTemplate> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    /// Whether the schema declares a field
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
