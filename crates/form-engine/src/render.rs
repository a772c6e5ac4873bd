//! Field renderers
//!
//! A renderer turns the current value of a field plus its template into a
//! [`Control`] description, and turns raw edits on that control back into a
//! single [`FieldChange`] written to the field's [`ValueSource`]. Renderers
//! never validate; that is left to the form controller or the store.
//!
//! Dispatch is keyed on the template's [`FieldKind`] tag through
//! [`renderer_for`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{FormEngineError, Result};
use crate::options::FieldOption;
use crate::source::ValueSource;
use crate::template::FieldTemplate;
use crate::types::{FieldChange, FieldKind, FieldValue, OwnerId, UiComponent};

/// Rows shown by a multi-line text area
pub const TEXTAREA_ROWS: u8 = 5;

/// How a select-or-type field currently takes input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryMode {
    /// Pick from the option list
    #[default]
    Select,
    /// Type any value
    FreeText,
}

impl EntryMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Select => Self::FreeText,
            Self::FreeText => Self::Select,
        }
    }

    /// Initial mode for a field described by `template`
    pub fn default_for(template: &FieldTemplate) -> Self {
        if template.is_selectable() {
            Self::Select
        } else {
            Self::FreeText
        }
    }
}

/// Everything a renderer looks at. Equal props render equal controls.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderProps {
    pub owner: OwnerId,
    pub field: String,
    pub value: FieldValue,
    pub kind: FieldKind,
    pub ui_component: Option<UiComponent>,
    pub options: Vec<FieldOption>,
    pub entry_mode: EntryMode,
}

impl RenderProps {
    pub fn from_template(
        owner: impl Into<String>,
        template: &FieldTemplate,
        value: FieldValue,
        entry_mode: EntryMode,
    ) -> Self {
        Self {
            owner: owner.into(),
            field: template.name.clone(),
            value,
            kind: template.kind,
            ui_component: template.ui_component,
            options: template.options.clone(),
            entry_mode,
        }
    }
}

/// Description of the control to display for a field
#[derive(Debug, Clone, PartialEq)]
pub enum Control {
    /// Single-line text input
    TextInput { value: String },
    /// Multi-line text area
    TextArea {
        value: String,
        rows: u8,
        resizable: bool,
        /// False when dragging inside the area must not move the graph node
        draggable: bool,
    },
    /// Drop-down over a fixed option list
    Select {
        value: String,
        options: Vec<FieldOption>,
    },
    Checkbox { checked: bool },
    NumberInput { value: f64 },
}

impl Control {
    pub fn is_multiline(&self) -> bool {
        matches!(self, Self::TextArea { .. })
    }

    /// Short name of the control type
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::TextInput { .. } => "text_input",
            Self::TextArea { .. } => "text_area",
            Self::Select { .. } => "select",
            Self::Checkbox { .. } => "checkbox",
            Self::NumberInput { .. } => "number_input",
        }
    }
}

/// Raw input produced by the user on a control
#[derive(Debug, Clone, PartialEq)]
pub enum EditInput {
    /// Typed text
    Text(String),
    /// Option picked from a select
    Selected(String),
    /// Checkbox state
    Checked(bool),
    Number(f64),
}

/// Kind-specific rendering and input coercion
pub trait FieldRenderer: Send + Sync {
    /// Describe the control for the given props
    fn render(&self, props: &RenderProps) -> Control;

    /// Turn raw control input into a value of this renderer's kind
    fn coerce(&self, field: &str, input: EditInput) -> Result<FieldValue>;
}

/// Text fields: single-line input, text area, or select in select mode
pub struct StringFieldRenderer;

impl FieldRenderer for StringFieldRenderer {
    fn render(&self, props: &RenderProps) -> Control {
        let value = props.value.as_str().unwrap_or_default().to_string();
        if props.entry_mode == EntryMode::Select {
            return Control::Select {
                value,
                options: props.options.clone(),
            };
        }
        match props.ui_component {
            Some(UiComponent::Textarea) => Control::TextArea {
                value,
                rows: TEXTAREA_ROWS,
                resizable: false,
                draggable: false,
            },
            _ => Control::TextInput { value },
        }
    }

    fn coerce(&self, field: &str, input: EditInput) -> Result<FieldValue> {
        match input {
            EditInput::Text(text) | EditInput::Selected(text) => Ok(FieldValue::String(text)),
            other => Err(invalid_input(field, "text", &other)),
        }
    }
}

pub struct EnumFieldRenderer;

impl FieldRenderer for EnumFieldRenderer {
    fn render(&self, props: &RenderProps) -> Control {
        Control::Select {
            value: props.value.as_str().unwrap_or_default().to_string(),
            options: props.options.clone(),
        }
    }

    fn coerce(&self, field: &str, input: EditInput) -> Result<FieldValue> {
        match input {
            EditInput::Selected(choice) | EditInput::Text(choice) => Ok(FieldValue::Enum(choice)),
            other => Err(invalid_input(field, "a choice", &other)),
        }
    }
}

pub struct BooleanFieldRenderer;

impl FieldRenderer for BooleanFieldRenderer {
    fn render(&self, props: &RenderProps) -> Control {
        Control::Checkbox {
            checked: props.value.as_bool().unwrap_or_default(),
        }
    }

    fn coerce(&self, field: &str, input: EditInput) -> Result<FieldValue> {
        match input {
            EditInput::Checked(checked) => Ok(FieldValue::Boolean(checked)),
            other => Err(invalid_input(field, "a checkbox state", &other)),
        }
    }
}

pub struct NumberFieldRenderer;

impl FieldRenderer for NumberFieldRenderer {
    fn render(&self, props: &RenderProps) -> Control {
        Control::NumberInput {
            value: props.value.as_number().unwrap_or_default(),
        }
    }

    fn coerce(&self, field: &str, input: EditInput) -> Result<FieldValue> {
        match input {
            EditInput::Number(n) => Ok(FieldValue::Number(n)),
            EditInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .map_err(|_| FormEngineError::InvalidInput {
                    field: field.to_string(),
                    message: format!("'{}' is not a number", text),
                }),
            other => Err(invalid_input(field, "a number", &other)),
        }
    }
}

fn invalid_input(field: &str, expected: &str, got: &EditInput) -> FormEngineError {
    FormEngineError::InvalidInput {
        field: field.to_string(),
        message: format!("expected {}, got {:?}", expected, got),
    }
}

/// Renderer for a field kind
pub fn renderer_for(kind: FieldKind) -> &'static dyn FieldRenderer {
    match kind {
        FieldKind::String => &StringFieldRenderer,
        FieldKind::Enum => &EnumFieldRenderer,
        FieldKind::Boolean => &BooleanFieldRenderer,
        FieldKind::Number => &NumberFieldRenderer,
    }
}

/// A rendered control bound to its owner and field
#[derive(Debug)]
pub struct RenderedField {
    props: RenderProps,
    control: Control,
}

impl RenderedField {
    pub fn props(&self) -> &RenderProps {
        &self.props
    }

    pub fn control(&self) -> &Control {
        &self.control
    }

    /// Apply a user edit: exactly one change, written once to `source`.
    pub fn edit<S: ValueSource + ?Sized>(
        &self,
        input: EditInput,
        source: &mut S,
    ) -> Result<FieldChange> {
        let value = renderer_for(self.props.kind).coerce(&self.props.field, input)?;
        let change = FieldChange::new(self.props.owner.clone(), self.props.field.clone(), value);
        source.write(change.clone())?;
        Ok(change)
    }
}

/// Render a field from its props
pub fn render_field(props: RenderProps) -> RenderedField {
    let control = renderer_for(props.kind).render(&props);
    RenderedField { props, control }
}

/// Memoises rendered fields per (owner, field).
///
/// Rendering the same props twice returns the same `Arc`, so hosts that
/// render large node field lists can skip unchanged fields by pointer
/// comparison.
#[derive(Default)]
pub struct RenderCache {
    entries: HashMap<(OwnerId, String), Arc<RenderedField>>,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, props: RenderProps) -> Arc<RenderedField> {
        let key = (props.owner.clone(), props.field.clone());
        if let Some(cached) = self.entries.get(&key) {
            if cached.props == props {
                return Arc::clone(cached);
            }
        }
        let rendered = Arc::new(render_field(props));
        self.entries.insert(key, Arc::clone(&rendered));
        rendered
    }

    /// Drop every cached field of an owner (node deleted, form unmounted)
    pub fn evict_owner(&mut self, owner: &str) {
        self.entries.retain(|(o, _), _| o != owner);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
