//! Field options query system for dynamic value selection.
//!
//! Select-style fields carry a static option list on their template, but some
//! lists are only known at runtime (for example the checkpoint config files a
//! model server ships with). Those fields get a [`FieldOptionsProvider`] that
//! hosts query before rendering the select.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A selectable option for a field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    /// The value to store when this option is selected.
    pub value: String,
    /// Human-readable display label.
    pub label: String,
    /// Optional description or extra context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            description: None,
        }
    }

    /// An option whose label is its value
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Query parameters for fetching field options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptionsQuery {
    /// Optional case-insensitive filter string.
    pub search: Option<String>,
    /// Maximum number of results to return.
    pub limit: Option<usize>,
}

impl FieldOptionsQuery {
    /// Apply search and limit to an already-fetched option list.
    pub fn apply(&self, options: Vec<FieldOption>) -> FieldOptionsResult {
        let filtered: Vec<FieldOption> = match &self.search {
            Some(search) if !search.is_empty() => {
                let needle = search.to_lowercase();
                options
                    .into_iter()
                    .filter(|o| {
                        o.label.to_lowercase().contains(&needle)
                            || o.value.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
            _ => options,
        };

        let total_count = filtered.len();
        let options = match self.limit {
            Some(limit) => filtered.into_iter().take(limit).collect(),
            None => filtered,
        };

        FieldOptionsResult {
            options,
            total_count,
        }
    }
}

/// Result of a field options query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOptionsResult {
    /// Available options.
    pub options: Vec<FieldOption>,
    /// Total number of matching options (may exceed `options.len()` if limited).
    pub total_count: usize,
}

/// Trait for providing runtime options for a field.
#[async_trait]
pub trait FieldOptionsProvider: Send + Sync {
    /// Query available options for this field.
    async fn query_options(&self, query: &FieldOptionsQuery) -> Result<FieldOptionsResult>;
}
