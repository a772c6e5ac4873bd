//! Form Engine - typed field binding and submission for Pantograph forms
//!
//! This crate provides the pieces every form and node field input in the
//! editor is built from:
//!
//! - Typed field values and templates with explicit kind tags
//! - A form controller owning local field state, derived fields and
//!   select-or-type entry modes
//! - Kind-dispatched renderers with memoisation
//! - A value-source abstraction so the same control can write to local form
//!   state or to an external store keyed by node id
//! - An async submission pipeline with an in-flight guard
//!
//! # Example
//!
//! ```ignore
//! use form_engine::{FieldTemplate, FieldValue, FormController, FormSchema};
//!
//! let schema = FormSchema::new("add-model")
//!     .field(FieldTemplate::string("model_name", "Model").required());
//! let mut form = FormController::initialize(schema, None)?;
//! form.binding("model_name")?.on_change(FieldValue::string("my-model"))?;
//! let request = form.submit()?;
//! ```

pub mod controller;
pub mod error;
pub mod events;
pub mod options;
pub mod registry;
pub mod render;
pub mod source;
pub mod state;
pub mod submission;
pub mod template;
pub mod types;
pub mod validation;

// Re-export key types
pub use controller::{FieldBinding, FormController, FormSeed, SubmissionRequest, SubmissionToken};
pub use error::{FormEngineError, Result};
pub use events::{EventError, EventSink, FormEvent, NullEventSink, VecEventSink};
pub use options::{FieldOption, FieldOptionsProvider, FieldOptionsQuery, FieldOptionsResult};
pub use registry::TemplateRegistry;
pub use render::{
    render_field, renderer_for, Control, EditInput, EntryMode, FieldRenderer, RenderCache,
    RenderProps, RenderedField,
};
pub use source::{NodeFieldBinding, ValueSource};
pub use state::FormState;
pub use submission::{
    FormHandle, SubmissionFailure, SubmissionPipeline, SubmissionReport, SubmitHandler,
};
pub use template::{
    DeriveFn, DerivedField, FieldTemplate, FormSchema, NodeTemplate, TemplateDescriptor,
    TemplateDescriptorFn,
};
pub use types::{FieldChange, FieldKind, FieldName, FieldValue, OwnerId, UiComponent};
pub use validation::{validate_form, ValidationError};
