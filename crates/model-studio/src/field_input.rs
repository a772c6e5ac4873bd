//! Node field inputs
//!
//! The editor control for one field of one graph node. Values live in the
//! application store, so the control reads the current value from the store
//! on every render and writes edits back as store actions.

use std::sync::Arc;

use form_engine::{
    EditInput, EntryMode, FieldChange, FieldTemplate, FormEngineError, NodeFieldBinding,
    RenderCache, RenderProps, RenderedField, TemplateRegistry,
};

use crate::error::{Result, StudioError};
use crate::store::{AppStore, NodeInstance, SharedStore};

/// Input control for one field of a graph node
#[derive(Debug, Clone)]
pub struct NodeFieldInput {
    binding: NodeFieldBinding,
    template: FieldTemplate,
}

impl NodeFieldInput {
    /// Look up the field template for `field_name` on `node`
    pub fn new(registry: &TemplateRegistry, node: &NodeInstance, field_name: &str) -> Result<Self> {
        let node_template = registry
            .get(&node.node_type)
            .ok_or_else(|| StudioError::UnknownNodeType(node.node_type.clone()))?;
        let template = node_template
            .field(field_name)
            .ok_or_else(|| FormEngineError::unknown_field(&node.id, field_name))?
            .clone();
        Ok(Self {
            binding: NodeFieldBinding::new(&node.id, field_name),
            template,
        })
    }

    pub fn binding(&self) -> &NodeFieldBinding {
        &self.binding
    }

    pub fn template(&self) -> &FieldTemplate {
        &self.template
    }

    /// Render from the store's current value. Unchanged props return the
    /// cached control.
    pub fn render(&self, store: &AppStore, cache: &mut RenderCache) -> Result<Arc<RenderedField>> {
        let value = self
            .binding
            .read(store)
            .ok_or_else(|| StudioError::NodeNotFound(self.binding.node_id.clone()))?;
        let props = RenderProps::from_template(
            self.binding.node_id.clone(),
            &self.template,
            value,
            EntryMode::default_for(&self.template),
        );
        Ok(cache.render(props))
    }

    /// Push an edit made on `rendered` into the store
    pub fn on_change(
        &self,
        rendered: &RenderedField,
        input: EditInput,
        store: &SharedStore,
    ) -> Result<FieldChange> {
        let mut guard = store.lock();
        Ok(rendered.edit(input, &mut *guard)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nodes::{place_node, PromptNode, StringNode};
    use form_engine::{Control, FieldValue, ValueSource};

    fn setup(node_type: &str, field: &str) -> (SharedStore, NodeFieldInput) {
        let registry = TemplateRegistry::with_builtins();
        let store = SharedStore::new();
        let node = place_node(&registry, &store, node_type, "node-1").unwrap();
        let input = NodeFieldInput::new(&registry, &node, field).unwrap();
        (store, input)
    }

    #[test]
    fn test_string_field_renders_single_line() {
        let (store, input) = setup(StringNode::NODE_TYPE, StringNode::FIELD_VALUE);
        let mut cache = RenderCache::new();
        let rendered = input.render(&store.lock(), &mut cache).unwrap();
        assert_eq!(
            rendered.control(),
            &Control::TextInput {
                value: String::new()
            }
        );
    }

    #[test]
    fn test_prompt_field_renders_textarea() {
        let (store, input) = setup(PromptNode::NODE_TYPE, PromptNode::FIELD_PROMPT);
        let mut cache = RenderCache::new();
        let rendered = input.render(&store.lock(), &mut cache).unwrap();
        assert!(rendered.control().is_multiline());
    }

    #[test]
    fn test_edit_dispatches_to_store() {
        let (store, input) = setup(PromptNode::NODE_TYPE, PromptNode::FIELD_PROMPT);
        let mut cache = RenderCache::new();
        let rendered = input.render(&store.lock(), &mut cache).unwrap();

        let change = input
            .on_change(&rendered, EditInput::Text("a castle".to_string()), &store)
            .unwrap();
        assert_eq!(change.owner, "node-1");
        assert_eq!(change.field, "prompt");
        assert_eq!(
            store.lock().read("node-1", "prompt"),
            Some(FieldValue::string("a castle"))
        );

        // the next render reflects the store, never the stale control
        let rerendered = input.render(&store.lock(), &mut cache).unwrap();
        assert!(!Arc::ptr_eq(&rendered, &rerendered));
        assert_eq!(
            rerendered.control(),
            &Control::TextArea {
                value: "a castle".to_string(),
                rows: form_engine::render::TEXTAREA_ROWS,
                resizable: false,
                draggable: false,
            }
        );
    }

    #[test]
    fn test_unchanged_render_is_memoised() {
        let (store, input) = setup(StringNode::NODE_TYPE, StringNode::FIELD_VALUE);
        let mut cache = RenderCache::new();
        let a = input.render(&store.lock(), &mut cache).unwrap();
        let b = input.render(&store.lock(), &mut cache).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_unknown_field_and_removed_node() {
        let registry = TemplateRegistry::with_builtins();
        let store = SharedStore::new();
        let node = place_node(&registry, &store, StringNode::NODE_TYPE, "node-1").unwrap();

        let err = NodeFieldInput::new(&registry, &node, "missing").unwrap_err();
        assert!(matches!(err, StudioError::Form(FormEngineError::UnknownField { .. })));

        let input = NodeFieldInput::new(&registry, &node, StringNode::FIELD_VALUE).unwrap();
        store.lock().dispatch(crate::store::AppAction::NodeRemoved {
            node_id: "node-1".to_string(),
        });
        let err = input.render(&store.lock(), &mut RenderCache::new()).unwrap_err();
        assert!(matches!(err, StudioError::NodeNotFound(_)));
    }
}
