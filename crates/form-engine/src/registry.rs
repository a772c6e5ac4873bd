//! Node template registry
//!
//! Maps node type strings to their [`NodeTemplate`]. Renderers look field
//! metadata up here instead of carrying it on every node instance.
//!
//! # Usage
//!
//! ```ignore
//! use form_engine::TemplateRegistry;
//!
//! let registry = TemplateRegistry::with_builtins();
//! let hint = registry
//!     .field_template("prompt", "prompt")
//!     .and_then(|t| t.ui_component);
//! ```

use std::collections::HashMap;

use crate::template::{FieldTemplate, NodeTemplate, TemplateDescriptorFn};

/// Registry of node types and their field templates
pub struct TemplateRegistry {
    templates: HashMap<String, NodeTemplate>,
}

impl TemplateRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Create a registry holding every template submitted with
    /// `inventory::submit!(TemplateDescriptorFn(..))`
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in inventory::iter::<TemplateDescriptorFn> {
            registry.register((descriptor.0)());
        }
        log::debug!("Template registry loaded {} node types", registry.templates.len());
        registry
    }

    /// Register a node template, replacing any previous one of the same type
    pub fn register(&mut self, template: NodeTemplate) {
        self.templates.insert(template.node_type.clone(), template);
    }

    /// Get the template for a node type
    pub fn get(&self, node_type: &str) -> Option<&NodeTemplate> {
        self.templates.get(node_type)
    }

    /// Get the template of one field of a node type
    pub fn field_template(&self, node_type: &str, field: &str) -> Option<&FieldTemplate> {
        self.get(node_type).and_then(|t| t.field(field))
    }

    /// Check if a node type is registered
    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.templates.contains_key(node_type)
    }

    /// List all registered node type strings
    pub fn node_types(&self) -> Vec<&str> {
        self.templates.keys().map(|s| s.as_str()).collect()
    }

    /// Merge another registry into this one
    ///
    /// Templates from `other` override templates in `self` if they share the same node_type.
    pub fn merge(&mut self, other: TemplateRegistry) {
        self.templates.extend(other.templates);
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}
