//! Model studio configuration
//!
//! Stored as JSON in the app data directory. Missing keys fall back to the
//! defaults in [`crate::constants`].

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::constants::{self, api, timeouts, toasts};
use crate::error::{Result, StudioError};

/// Model API connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the model server (e.g., "http://127.0.0.1:9090")
    pub base_url: String,
    /// Per-request timeout
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: api::BASE_URL.to_string(),
            timeout_secs: timeouts::API_REQUEST_SECS,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Toast presentation defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToastConfig {
    /// None keeps toasts until dismissed
    pub duration_ms: Option<u64>,
    pub is_closable: bool,
}

impl Default for ToastConfig {
    fn default() -> Self {
        Self {
            duration_ms: Some(toasts::DURATION_MS),
            is_closable: toasts::IS_CLOSABLE,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    pub api: ApiConfig,
    pub toasts: ToastConfig,
}

impl StudioConfig {
    /// Load configuration from the app data directory.
    ///
    /// A missing file yields the defaults.
    pub async fn load(app_data_dir: &Path) -> Result<Self> {
        let config_path = app_data_dir.join(constants::CONFIG_FILE);

        if !fs::try_exists(&config_path).await? {
            log::info!("No config at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path).await?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to disk
    pub async fn save(&self, app_data_dir: &Path) -> Result<()> {
        fs::create_dir_all(app_data_dir).await?;

        let config_path = app_data_dir.join(constants::CONFIG_FILE);
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents).await?;

        log::info!("Configuration saved to {:?}", config_path);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let url = self.api.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StudioError::Config(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(StudioError::Config(
                "api.timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
