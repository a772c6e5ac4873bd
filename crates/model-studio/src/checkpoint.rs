//! Checkpoint model registration
//!
//! Schema of the advanced "add checkpoint" form, the payload it turns into,
//! and the runtime option source for its config selector.

use std::sync::Arc;

use async_trait::async_trait;
use form_engine::{
    FieldOption, FieldOptionsProvider, FieldOptionsQuery, FieldOptionsResult, FieldTemplate,
    FieldValue, FormEngineError, FormSchema, SubmissionRequest,
};
use serde::{Deserialize, Serialize};

use crate::api::ModelApi;
use crate::constants::checkpoint as defaults;
use crate::naming::model_name_from_path;

pub mod fields {
    pub const MODEL_NAME: &str = "model_name";
    pub const BASE_MODEL: &str = "base_model";
    pub const MODEL_TYPE: &str = "model_type";
    pub const PATH: &str = "path";
    pub const DESCRIPTION: &str = "description";
    pub const MODEL_FORMAT: &str = "model_format";
    pub const VAE: &str = "vae";
    pub const VARIANT: &str = "variant";
    pub const CONFIG: &str = "config";
}

/// Fields shown to the user, in display order. `model_type` and
/// `model_format` are fixed for checkpoints and stay hidden.
pub const VISIBLE_FIELDS: [&str; 7] = [
    fields::MODEL_NAME,
    fields::BASE_MODEL,
    fields::PATH,
    fields::DESCRIPTION,
    fields::VAE,
    fields::VARIANT,
    fields::CONFIG,
];

pub fn base_model_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("sd-1", "Stable Diffusion 1.x"),
        FieldOption::new("sd-2", "Stable Diffusion 2.x"),
        FieldOption::new("sdxl", "Stable Diffusion XL"),
        FieldOption::new("sdxl-refiner", "Stable Diffusion XL Refiner"),
    ]
}

pub fn variant_options() -> Vec<FieldOption> {
    vec![
        FieldOption::new("normal", "Normal"),
        FieldOption::new("inpaint", "Inpaint"),
        FieldOption::new("depth", "Depth"),
    ]
}

/// Schema of the advanced add-checkpoint form.
///
/// Leaving the model location fills an empty model name from the file name.
pub fn advanced_add_checkpoint_schema() -> FormSchema {
    FormSchema::new(defaults::FORM_ID)
        .field(FieldTemplate::string(fields::MODEL_NAME, "Model Name").required())
        .field(
            FieldTemplate::enumeration(fields::BASE_MODEL, "Base Model", base_model_options())
                .with_default(FieldValue::enumeration(defaults::BASE_MODEL)),
        )
        .field(
            FieldTemplate::string(fields::MODEL_TYPE, "Model Type")
                .with_default(FieldValue::string(defaults::MODEL_TYPE)),
        )
        .field(FieldTemplate::string(fields::PATH, "Model Location").required())
        .field(FieldTemplate::string(fields::DESCRIPTION, "Description"))
        .field(
            FieldTemplate::string(fields::MODEL_FORMAT, "Model Format")
                .with_default(FieldValue::string(defaults::MODEL_FORMAT)),
        )
        .field(FieldTemplate::string(fields::VAE, "VAE Location"))
        .field(
            FieldTemplate::enumeration(fields::VARIANT, "Variant", variant_options())
                .with_default(FieldValue::enumeration(defaults::VARIANT)),
        )
        .field(
            FieldTemplate::string(fields::CONFIG, "Config File")
                .required()
                .with_default(FieldValue::string(defaults::CONFIG))
                .with_options(vec![FieldOption::plain(defaults::CONFIG)])
                .with_free_text(),
        )
        .derive(fields::PATH, fields::MODEL_NAME, model_name_from_path)
}

/// Registration payload for a checkpoint model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointModelConfig {
    pub model_name: String,
    pub base_model: String,
    pub model_type: String,
    pub path: String,
    pub description: String,
    pub model_format: String,
    pub vae: String,
    pub variant: String,
    pub config: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CheckpointModelConfig {
    #[cfg(test)]
    pub(crate) fn example(path: &str) -> Self {
        Self {
            model_name: model_name_from_path(path).unwrap_or_default(),
            base_model: defaults::BASE_MODEL.to_string(),
            model_type: defaults::MODEL_TYPE.to_string(),
            path: path.to_string(),
            description: String::new(),
            model_format: defaults::MODEL_FORMAT.to_string(),
            vae: String::new(),
            variant: defaults::VARIANT.to_string(),
            config: defaults::CONFIG.to_string(),
            error: None,
        }
    }
}

impl TryFrom<&SubmissionRequest> for CheckpointModelConfig {
    type Error = FormEngineError;

    fn try_from(request: &SubmissionRequest) -> Result<Self, Self::Error> {
        let text = |field: &str| {
            request
                .text(field)
                .map(|s| s.to_string())
                .ok_or_else(|| FormEngineError::unknown_field(request.form_id(), field))
        };

        Ok(Self {
            model_name: text(fields::MODEL_NAME)?,
            base_model: text(fields::BASE_MODEL)?,
            model_type: text(fields::MODEL_TYPE)?,
            path: text(fields::PATH)?,
            description: text(fields::DESCRIPTION)?,
            model_format: text(fields::MODEL_FORMAT)?,
            vae: text(fields::VAE)?,
            variant: text(fields::VARIANT)?,
            config: text(fields::CONFIG)?,
            error: None,
        })
    }
}

/// Config files known to the model server, for the config selector
pub struct CheckpointConfigOptions {
    api: Arc<dyn ModelApi>,
}

impl CheckpointConfigOptions {
    pub fn new(api: Arc<dyn ModelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FieldOptionsProvider for CheckpointConfigOptions {
    async fn query_options(
        &self,
        query: &FieldOptionsQuery,
    ) -> form_engine::Result<FieldOptionsResult> {
        let configs = self.api.checkpoint_configs().await.map_err(|e| {
            FormEngineError::OptionsUnavailable {
                field: fields::CONFIG.to_string(),
                message: e.to_string(),
            }
        })?;

        let mut options = vec![FieldOption::plain(defaults::CONFIG)];
        options.extend(
            configs
                .into_iter()
                .filter(|c| c != defaults::CONFIG)
                .map(FieldOption::plain),
        );
        Ok(query.apply(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, ModelRecord};
    use form_engine::{FormController, FormSeed};

    struct Configs(Result<Vec<String>, u16>);

    #[async_trait]
    impl ModelApi for Configs {
        async fn add_model(
            &self,
            _config: &CheckpointModelConfig,
        ) -> Result<ModelRecord, ApiError> {
            Err(ApiError::InvalidRequest("not used".to_string()))
        }

        async fn checkpoint_configs(&self) -> Result<Vec<String>, ApiError> {
            self.0.clone().map_err(|status| ApiError::Status {
                status,
                body: "down".to_string(),
            })
        }
    }

    #[test]
    fn test_schema_defaults() {
        let form = FormController::initialize(advanced_add_checkpoint_schema(), None).unwrap();
        assert_eq!(form.value(fields::BASE_MODEL).unwrap(), &FieldValue::enumeration("sd-1"));
        assert_eq!(form.value(fields::MODEL_TYPE).unwrap(), &FieldValue::string("main"));
        assert_eq!(form.value(fields::MODEL_FORMAT).unwrap(), &FieldValue::string("checkpoint"));
        assert_eq!(form.value(fields::VARIANT).unwrap(), &FieldValue::enumeration("normal"));
        assert_eq!(
            form.value(fields::CONFIG).unwrap(),
            &FieldValue::string("configs\\stable-diffusion\\v1-inference.yaml")
        );
        assert!(form.value(fields::MODEL_NAME).unwrap().is_empty());
    }

    #[test]
    fn test_visible_fields_are_declared() {
        let schema = advanced_add_checkpoint_schema();
        assert!(VISIBLE_FIELDS.iter().all(|f| schema.contains(f)));
    }

    #[test]
    fn test_payload_from_request() {
        let seed = FormSeed::new().value(fields::PATH, FieldValue::string("a/b/c.ckpt"));
        let mut form =
            FormController::initialize(advanced_add_checkpoint_schema(), Some(seed)).unwrap();
        form.set_value(fields::DESCRIPTION, FieldValue::string("  spaced desc  ")).unwrap();

        let request = form.submit().unwrap();
        let payload = CheckpointModelConfig::try_from(&request).unwrap();
        let mut expected = CheckpointModelConfig::example("a/b/c.ckpt");
        expected.description = "  spaced desc  ".to_string();
        assert_eq!(payload, expected);

        // entered values go out verbatim, blanks included
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["model_name"], "c");
        assert_eq!(json["description"], "  spaced desc  ");
        assert_eq!(json["vae"], "");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_config_options_keep_default_first() {
        let provider = CheckpointConfigOptions::new(Arc::new(Configs(Ok(vec![
            "configs\\stable-diffusion\\v2-inference.yaml".to_string(),
            defaults::CONFIG.to_string(),
        ]))));

        let result = provider.query_options(&FieldOptionsQuery::default()).await.unwrap();
        assert_eq!(result.total_count, 2);
        assert_eq!(result.options[0].value, defaults::CONFIG);
    }

    #[tokio::test]
    async fn test_config_options_unavailable() {
        let provider = CheckpointConfigOptions::new(Arc::new(Configs(Err(503))));
        let err = provider
            .query_options(&FieldOptionsQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FormEngineError::OptionsUnavailable { ref field, .. } if field == "config"
        ));
    }
}
