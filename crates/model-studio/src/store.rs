//! Application store
//!
//! Reducer-style state shared by the editor: node field values keyed by
//! node id, the model manager's scan selection, and the toast queue. All
//! mutation goes through [`AppStore::dispatch`].

use std::collections::BTreeMap;
use std::sync::Arc;

use form_engine::{FieldChange, FieldValue, FormEngineError, NodeTemplate, ValueSource};
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::toast::Toast;

/// Actions accepted by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum AppAction {
    /// A string field on a graph node was edited
    #[serde(rename_all = "camelCase")]
    FieldStringValueChanged {
        node_id: String,
        field_name: String,
        value: String,
    },

    #[serde(rename_all = "camelCase")]
    FieldEnumValueChanged {
        node_id: String,
        field_name: String,
        value: String,
    },

    #[serde(rename_all = "camelCase")]
    FieldBooleanValueChanged {
        node_id: String,
        field_name: String,
        value: bool,
    },

    #[serde(rename_all = "camelCase")]
    FieldNumberValueChanged {
        node_id: String,
        field_name: String,
        value: f64,
    },

    /// A node was placed on the graph
    #[serde(rename_all = "camelCase")]
    NodeAdded { node: NodeInstance },

    #[serde(rename_all = "camelCase")]
    NodeRemoved { node_id: String },

    /// Select (or clear) the scanned model shown in the advanced add panel
    #[serde(rename_all = "camelCase")]
    SetAdvancedAddScanModel { model_path: Option<String> },

    /// Queue a toast
    #[serde(rename_all = "camelCase")]
    AddToast { toast: Toast },

    #[serde(rename_all = "camelCase")]
    DismissToast { id: Uuid },
}

impl AppAction {
    /// The field-change action for a field edit, keyed by value kind
    pub fn from_field_change(change: FieldChange) -> Self {
        let FieldChange {
            owner: node_id,
            field: field_name,
            value,
        } = change;
        match value {
            FieldValue::String(value) => Self::FieldStringValueChanged {
                node_id,
                field_name,
                value,
            },
            FieldValue::Enum(value) => Self::FieldEnumValueChanged {
                node_id,
                field_name,
                value,
            },
            FieldValue::Boolean(value) => Self::FieldBooleanValueChanged {
                node_id,
                field_name,
                value,
            },
            FieldValue::Number(value) => Self::FieldNumberValueChanged {
                node_id,
                field_name,
                value,
            },
        }
    }
}

/// A node on the graph and its current field values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInstance {
    pub id: String,
    pub node_type: String,
    pub fields: BTreeMap<String, FieldValue>,
}

impl NodeInstance {
    /// Create a node whose fields hold the template defaults
    pub fn from_template(id: impl Into<String>, template: &NodeTemplate) -> Self {
        Self {
            id: id.into(),
            node_type: template.node_type.clone(),
            fields: template
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.default.clone()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodesState {
    pub nodes: BTreeMap<String, NodeInstance>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelManagerState {
    /// Path of the scanned model open in the advanced add panel
    pub advanced_add_scan_model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SystemState {
    pub toasts: Vec<Toast>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub nodes: NodesState,
    pub model_manager: ModelManagerState,
    pub system: SystemState,
}

/// Owner of [`AppState`]
#[derive(Debug, Default)]
pub struct AppStore {
    state: AppState,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn node(&self, node_id: &str) -> Option<&NodeInstance> {
        self.state.nodes.nodes.get(node_id)
    }

    /// Apply an action
    pub fn dispatch(&mut self, action: AppAction) {
        log::trace!("dispatch {:?}", action);
        match action {
            AppAction::FieldStringValueChanged {
                node_id,
                field_name,
                value,
            } => self.set_node_field(&node_id, &field_name, FieldValue::String(value)),
            AppAction::FieldEnumValueChanged {
                node_id,
                field_name,
                value,
            } => self.set_node_field(&node_id, &field_name, FieldValue::Enum(value)),
            AppAction::FieldBooleanValueChanged {
                node_id,
                field_name,
                value,
            } => self.set_node_field(&node_id, &field_name, FieldValue::Boolean(value)),
            AppAction::FieldNumberValueChanged {
                node_id,
                field_name,
                value,
            } => self.set_node_field(&node_id, &field_name, FieldValue::Number(value)),
            AppAction::NodeAdded { node } => {
                self.state.nodes.nodes.insert(node.id.clone(), node);
            }
            AppAction::NodeRemoved { node_id } => {
                self.state.nodes.nodes.remove(&node_id);
            }
            AppAction::SetAdvancedAddScanModel { model_path } => {
                self.state.model_manager.advanced_add_scan_model = model_path;
            }
            AppAction::AddToast { toast } => {
                self.state.system.toasts.push(toast);
            }
            AppAction::DismissToast { id } => {
                self.state.system.toasts.retain(|t| t.id != id);
            }
        }
    }

    fn set_node_field(&mut self, node_id: &str, field_name: &str, value: FieldValue) {
        let Some(slot) = self
            .state
            .nodes
            .nodes
            .get_mut(node_id)
            .and_then(|n| n.fields.get_mut(field_name))
        else {
            log::warn!("Ignoring edit of unknown field {}.{}", node_id, field_name);
            return;
        };

        if slot.kind() != value.kind() {
            log::warn!(
                "Ignoring {} value for {} field {}.{}",
                value.kind(),
                slot.kind(),
                node_id,
                field_name
            );
            return;
        }
        *slot = value;
    }
}

impl ValueSource for AppStore {
    fn read(&self, owner: &str, field: &str) -> Option<FieldValue> {
        self.node(owner).and_then(|n| n.fields.get(field)).cloned()
    }

    fn write(&mut self, change: FieldChange) -> form_engine::Result<()> {
        let current = self
            .read(&change.owner, &change.field)
            .ok_or_else(|| FormEngineError::unknown_field(&change.owner, &change.field))?;
        if current.kind() != change.value.kind() {
            return Err(FormEngineError::KindMismatch {
                field: change.field,
                expected: current.kind(),
                found: change.value.kind(),
            });
        }
        self.dispatch(AppAction::from_field_change(change));
        Ok(())
    }
}

/// Fire-and-forget entry point into the store
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, action: AppAction);
}

/// Cloneable, thread-safe handle to an [`AppStore`]
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<Mutex<AppStore>>,
}

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&self) -> MutexGuard<'_, AppStore> {
        self.inner.lock()
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> AppState {
        self.inner.lock().state().clone()
    }
}

impl Dispatch for SharedStore {
    fn dispatch(&self, action: AppAction) {
        self.inner.lock().dispatch(action);
    }
}
