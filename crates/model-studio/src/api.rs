//! Model API client
//!
//! The model server owns installation and persistence; this module only
//! sends registration requests and reads the list of known checkpoint
//! configs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::checkpoint::CheckpointModelConfig;
use crate::config::ApiConfig;
use crate::constants::api;

/// Error types for model API calls
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// A model record as returned by the server after registration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecord {
    pub model_name: String,
    pub base_model: String,
    pub model_type: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model_format: Option<String>,
}

/// Operations the model manager needs from the model server
#[async_trait]
pub trait ModelApi: Send + Sync {
    /// Register a checkpoint model
    async fn add_model(&self, config: &CheckpointModelConfig) -> Result<ModelRecord, ApiError>;

    /// Paths of the checkpoint config files the server ships with
    async fn checkpoint_configs(&self) -> Result<Vec<String>, ApiError>;
}

/// [`ModelApi`] over HTTP
pub struct HttpModelApi {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpModelApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl ModelApi for HttpModelApi {
    async fn add_model(&self, config: &CheckpointModelConfig) -> Result<ModelRecord, ApiError> {
        if config.model_name.trim().is_empty() || config.path.trim().is_empty() {
            return Err(ApiError::InvalidRequest(
                "model_name and path are required".to_string(),
            ));
        }

        let url = self.endpoint(api::ADD_MODEL_PATH);
        log::debug!("POST {} ({})", url, config.model_name);
        let response = self.http_client.post(&url).json(config).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<ModelRecord>().await?)
    }

    async fn checkpoint_configs(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(api::CHECKPOINT_CONFIGS_PATH);
        let response = self.http_client.get(&url).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<Vec<String>>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.to_string(),
            timeout_secs: 2,
        }
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let api = HttpModelApi::new(&config("http://localhost:9090/")).unwrap();
        assert_eq!(api.base_url(), "http://localhost:9090");
        assert_eq!(
            api.endpoint(api::ADD_MODEL_PATH),
            "http://localhost:9090/api/v1/models/add"
        );
    }

    #[test]
    fn test_model_record_deserialization() {
        let record: ModelRecord = serde_json::from_value(serde_json::json!({
            "model_name": "c",
            "base_model": "sd-1",
            "model_type": "main",
            "path": "a/b/c.ckpt",
            "config": "ignored"
        }))
        .unwrap();
        assert_eq!(record.model_name, "c");
        assert_eq!(record.path.as_deref(), Some("a/b/c.ckpt"));
        assert!(record.description.is_none());
    }

    #[tokio::test]
    async fn test_add_model_rejects_empty_request_locally() {
        let api = HttpModelApi::new(&config("http://127.0.0.1:9")).unwrap();
        let mut payload = CheckpointModelConfig::example("a/b/c.ckpt");
        payload.model_name = String::new();

        let err = api.add_model(&payload).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }
}
