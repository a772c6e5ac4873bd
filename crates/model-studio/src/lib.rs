//! Model Studio - model registration forms and node field inputs
//!
//! Builds the editor's concrete forms on top of `form-engine`:
//!
//! - [`AdvancedAddCheckpoint`]: register a checkpoint model by hand or from
//!   a scanned path, backed by a [`ModelApi`]
//! - [`NodeFieldInput`]: the control for one field of a graph node, whose
//!   value lives in the application store
//! - [`AppStore`]: reducer-style application state (nodes, model manager
//!   selection, toasts)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use model_studio::{AdvancedAddCheckpoint, HttpModelApi, SharedStore, StudioConfig};
//!
//! let config = StudioConfig::load(&app_data_dir).await?;
//! let api = Arc::new(HttpModelApi::new(&config.api)?);
//! let store = SharedStore::new();
//! let screen = AdvancedAddCheckpoint::new(api, Arc::new(store.clone()), &config, None)?;
//! screen.set_field("path", FieldValue::string("models/checkpoint/dream.ckpt"))?;
//! screen.blur_model_location()?;
//! let record = screen.submit().await?;
//! ```

pub mod advanced_add;
pub mod api;
pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod error;
pub mod field_input;
pub mod naming;
pub mod nodes;
pub mod store;
pub mod toast;

pub use advanced_add::{AddCheckpointHandler, AdvancedAddCheckpoint};
pub use api::{ApiError, HttpModelApi, ModelApi, ModelRecord};
pub use checkpoint::{
    advanced_add_checkpoint_schema, CheckpointConfigOptions, CheckpointModelConfig,
};
pub use config::{ApiConfig, StudioConfig, ToastConfig};
pub use error::{Result, StudioError};
pub use field_input::NodeFieldInput;
pub use naming::model_name_from_path;
pub use nodes::{place_node, BooleanNode, FloatNode, PromptNode, StringNode};
pub use store::{
    AppAction, AppState, AppStore, Dispatch, ModelManagerState, NodeInstance, NodesState,
    SharedStore, SystemState,
};
pub use toast::{make_toast, Toast, ToastStatus};
