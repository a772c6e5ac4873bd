//! Crate-wide constants
//!
//! Single source of truth for endpoint paths, timeouts and form defaults.

/// Model API endpoints
pub mod api {
    /// Default base URL of the model server
    pub const BASE_URL: &str = "http://127.0.0.1:9090";
    /// Register a model by path
    pub const ADD_MODEL_PATH: &str = "api/v1/models/add";
    /// List the checkpoint config files the server knows about
    pub const CHECKPOINT_CONFIGS_PATH: &str = "api/v1/models/ckpt_confs";
}

/// Timeout configuration (in seconds)
pub mod timeouts {
    /// Maximum time to wait for a model API response
    pub const API_REQUEST_SECS: u64 = 30;
}

/// Toast defaults
pub mod toasts {
    /// How long a toast stays on screen
    pub const DURATION_MS: u64 = 2500;
    pub const IS_CLOSABLE: bool = true;
}

/// Defaults of the advanced add checkpoint form
pub mod checkpoint {
    pub const FORM_ID: &str = "advanced-add-checkpoint";
    pub const BASE_MODEL: &str = "sd-1";
    pub const MODEL_TYPE: &str = "main";
    pub const MODEL_FORMAT: &str = "checkpoint";
    pub const VARIANT: &str = "normal";
    pub const CONFIG: &str = "configs\\stable-diffusion\\v1-inference.yaml";
}

/// Configuration file name inside the app data directory
pub const CONFIG_FILE: &str = "model-studio.json";
