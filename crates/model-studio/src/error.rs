//! Error types for model studio

use thiserror::Error;

use crate::api::ApiError;

/// Result type alias using StudioError
pub type Result<T> = std::result::Result<T, StudioError>;

/// Errors that can occur in model studio
#[derive(Debug, Error)]
pub enum StudioError {
    /// Error from the form layer
    #[error(transparent)]
    Form(#[from] form_engine::FormEngineError),

    /// Model API error
    #[error("Model API error: {0}")]
    Api(#[from] ApiError),

    /// Unknown graph node
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// No template registered for a node type
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StudioError {
    /// Validation errors when the failure was an incomplete form
    pub fn validation_errors(&self) -> &[form_engine::ValidationError] {
        match self {
            Self::Form(err) => err.validation_errors(),
            _ => &[],
        }
    }
}
