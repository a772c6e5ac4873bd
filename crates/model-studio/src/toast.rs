//! Transient user notifications

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ToastConfig;

/// Severity of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToastStatus {
    Info,
    Success,
    Warning,
    Error,
}

/// A notification queued for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: ToastStatus,
    /// None keeps the toast until dismissed
    pub duration_ms: Option<u64>,
    pub is_closable: bool,
}

impl Toast {
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Build a toast with the configured presentation defaults
pub fn make_toast(title: impl Into<String>, status: ToastStatus, config: &ToastConfig) -> Toast {
    Toast {
        id: Uuid::new_v4(),
        title: title.into(),
        description: None,
        status,
        duration_ms: config.duration_ms,
        is_closable: config.is_closable,
    }
}

/// Toast titles used by the model manager
pub mod messages {
    pub const MODEL_ADD_FAILED: &str = "Model Add Failed";

    pub fn model_added(model_name: &str) -> String {
        format!("Model Added: {}", model_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_toast_uses_config() {
        let config = ToastConfig {
            duration_ms: None,
            is_closable: false,
        };
        let toast = make_toast("Hello", ToastStatus::Info, &config);
        assert_eq!(toast.title, "Hello");
        assert_eq!(toast.duration_ms, None);
        assert!(!toast.is_closable);
        assert!(toast.description.is_none());
    }

    #[test]
    fn test_toast_ids_are_unique() {
        let config = ToastConfig::default();
        let a = make_toast("a", ToastStatus::Success, &config);
        let b = make_toast("a", ToastStatus::Success, &config);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_toast_serialization() {
        let toast = make_toast(
            messages::model_added("c"),
            ToastStatus::Success,
            &ToastConfig::default(),
        )
        .with_description("registered");
        let json = serde_json::to_value(&toast).unwrap();
        assert_eq!(json["title"], "Model Added: c");
        assert_eq!(json["status"], "success");
        assert_eq!(json["durationMs"], 2500);
        assert_eq!(json["isClosable"], true);
        assert_eq!(json["description"], "registered");
    }
}
