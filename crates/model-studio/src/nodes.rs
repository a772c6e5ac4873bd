//! Built-in node templates
//!
//! Primitive value nodes of the graph editor. Each registers its template at
//! link time so `TemplateRegistry::with_builtins()` picks it up.

use form_engine::{
    FieldTemplate, FieldValue, NodeTemplate, TemplateDescriptor, TemplateDescriptorFn,
    TemplateRegistry, UiComponent,
};

use crate::error::{Result, StudioError};
use crate::store::{AppAction, Dispatch, NodeInstance};

/// Single-line string value
pub struct StringNode;

impl StringNode {
    pub const NODE_TYPE: &'static str = "string";
    pub const FIELD_VALUE: &'static str = "value";
}

impl TemplateDescriptor for StringNode {
    fn descriptor() -> NodeTemplate {
        NodeTemplate {
            node_type: Self::NODE_TYPE.to_string(),
            label: "String Primitive".to_string(),
            description: "A string primitive value".to_string(),
            fields: vec![FieldTemplate::string(Self::FIELD_VALUE, "Value")],
        }
    }
}

inventory::submit!(TemplateDescriptorFn(StringNode::descriptor));

/// Multi-line prompt text
pub struct PromptNode;

impl PromptNode {
    pub const NODE_TYPE: &'static str = "prompt";
    pub const FIELD_PROMPT: &'static str = "prompt";
}

impl TemplateDescriptor for PromptNode {
    fn descriptor() -> NodeTemplate {
        NodeTemplate {
            node_type: Self::NODE_TYPE.to_string(),
            label: "Prompt".to_string(),
            description: "Prompt text for a generation".to_string(),
            fields: vec![FieldTemplate::string(Self::FIELD_PROMPT, "Prompt")
                .with_ui_component(UiComponent::Textarea)],
        }
    }
}

inventory::submit!(TemplateDescriptorFn(PromptNode::descriptor));

pub struct BooleanNode;

impl BooleanNode {
    pub const NODE_TYPE: &'static str = "boolean";
    pub const FIELD_VALUE: &'static str = "value";
}

impl TemplateDescriptor for BooleanNode {
    fn descriptor() -> NodeTemplate {
        NodeTemplate {
            node_type: Self::NODE_TYPE.to_string(),
            label: "Boolean Primitive".to_string(),
            description: "A boolean primitive value".to_string(),
            fields: vec![FieldTemplate::boolean(Self::FIELD_VALUE, "Value")],
        }
    }
}

inventory::submit!(TemplateDescriptorFn(BooleanNode::descriptor));

pub struct FloatNode;

impl FloatNode {
    pub const NODE_TYPE: &'static str = "float";
    pub const FIELD_VALUE: &'static str = "value";
}

impl TemplateDescriptor for FloatNode {
    fn descriptor() -> NodeTemplate {
        NodeTemplate {
            node_type: Self::NODE_TYPE.to_string(),
            label: "Float Primitive".to_string(),
            description: "A float primitive value".to_string(),
            fields: vec![FieldTemplate::number(Self::FIELD_VALUE, "Value")
                .with_default(FieldValue::Number(0.0))],
        }
    }
}

inventory::submit!(TemplateDescriptorFn(FloatNode::descriptor));

/// Create a node of a registered type and add it to the store
pub fn place_node(
    registry: &TemplateRegistry,
    store: &dyn Dispatch,
    node_type: &str,
    node_id: &str,
) -> Result<NodeInstance> {
    let template = registry
        .get(node_type)
        .ok_or_else(|| StudioError::UnknownNodeType(node_type.to_string()))?;
    let node = NodeInstance::from_template(node_id, template);
    store.dispatch(AppAction::NodeAdded { node: node.clone() });
    log::debug!("Placed {} node {}", node_type, node_id);
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SharedStore;

    #[test]
    fn test_builtins_registered() {
        let registry = TemplateRegistry::with_builtins();
        for node_type in ["string", "prompt", "boolean", "float"] {
            assert!(registry.has_node_type(node_type), "missing {}", node_type);
        }
        let prompt = registry.field_template("prompt", "prompt").unwrap();
        assert_eq!(prompt.ui_component, Some(UiComponent::Textarea));
        let value = registry.field_template("string", "value").unwrap();
        assert_eq!(value.ui_component, None);
    }

    #[test]
    fn test_place_node_uses_defaults() {
        let registry = TemplateRegistry::with_builtins();
        let store = SharedStore::new();

        let node = place_node(&registry, &store, "boolean", "b1").unwrap();
        assert_eq!(node.fields.get("value"), Some(&FieldValue::Boolean(false)));
        assert!(store.lock().node("b1").is_some());

        let err = place_node(&registry, &store, "video", "v1").unwrap_err();
        assert!(matches!(err, StudioError::UnknownNodeType(_)));
    }
}
