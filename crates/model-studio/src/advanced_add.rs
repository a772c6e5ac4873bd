//! Advanced add-checkpoint screen
//!
//! Lets the user register a checkpoint model by hand, optionally starting
//! from a path picked in the model scanner. Field values live in a local
//! form; the server call, toasts and the scanner selection go through the
//! model API and the application store.

use std::sync::Arc;

use async_trait::async_trait;
use form_engine::{
    EditInput, EntryMode, EventSink, FieldChange, FieldOptionsProvider, FieldOptionsQuery,
    FieldValue, FormController, FormEngineError, FormHandle, FormSeed, RenderCache,
    RenderedField, SubmissionFailure, SubmissionPipeline, SubmissionRequest, SubmitHandler,
};

use crate::api::{ModelApi, ModelRecord};
use crate::checkpoint::{
    advanced_add_checkpoint_schema, fields, CheckpointConfigOptions, CheckpointModelConfig,
    VISIBLE_FIELDS,
};
use crate::config::{StudioConfig, ToastConfig};
use crate::error::Result;
use crate::store::{AppAction, Dispatch};
use crate::toast::{make_toast, messages, ToastStatus};

/// Sends a submitted checkpoint form to the model API
pub struct AddCheckpointHandler {
    api: Arc<dyn ModelApi>,
}

impl AddCheckpointHandler {
    pub fn new(api: Arc<dyn ModelApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl SubmitHandler for AddCheckpointHandler {
    type Output = ModelRecord;

    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> std::result::Result<ModelRecord, SubmissionFailure> {
        let payload = CheckpointModelConfig::try_from(request)
            .map_err(|e| SubmissionFailure::new(e.to_string()))?;
        self.api
            .add_model(&payload)
            .await
            .map_err(|e| SubmissionFailure::new(e.to_string()))
    }
}

/// The mounted add-checkpoint form and its collaborators
pub struct AdvancedAddCheckpoint {
    form: FormHandle,
    pipeline: SubmissionPipeline<AddCheckpointHandler>,
    options: CheckpointConfigOptions,
    store: Arc<dyn Dispatch>,
    toasts: ToastConfig,
    model_path: Option<String>,
}

impl AdvancedAddCheckpoint {
    /// Mount the form. A `model_path` from the scanner seeds the model
    /// location and, through it, the model name.
    pub fn new(
        api: Arc<dyn ModelApi>,
        store: Arc<dyn Dispatch>,
        config: &StudioConfig,
        model_path: Option<String>,
    ) -> Result<Self> {
        let seed = model_path
            .as_ref()
            .map(|path| FormSeed::new().value(fields::PATH, FieldValue::string(path.as_str())));
        let controller = FormController::initialize(advanced_add_checkpoint_schema(), seed)?;

        Ok(Self {
            form: FormHandle::new(controller),
            pipeline: SubmissionPipeline::new(AddCheckpointHandler::new(api.clone())),
            options: CheckpointConfigOptions::new(api),
            store,
            toasts: config.toasts.clone(),
            model_path,
        })
    }

    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.pipeline = self.pipeline.with_events(events);
        self
    }

    pub fn form(&self) -> &FormHandle {
        &self.form
    }

    pub fn model_path(&self) -> Option<&str> {
        self.model_path.as_deref()
    }

    pub fn value(&self, field: &str) -> Result<FieldValue> {
        Ok(self.form.lock().value(field)?.clone())
    }

    pub fn set_field(&self, field: &str, value: FieldValue) -> Result<()> {
        self.form.lock().set_value(field, value)?;
        Ok(())
    }

    /// Apply raw control input to `field` through its current control
    pub fn edit(&self, field: &str, input: EditInput) -> Result<FieldChange> {
        let mut form = self.form.lock();
        let rendered = form_engine::render_field(form.render_props(field)?);
        Ok(rendered.edit(input, &mut *form)?)
    }

    pub fn blur(&self, field: &str) -> Result<Vec<FieldChange>> {
        Ok(self.form.lock().blur(field)?)
    }

    /// Leaving the model location fills an empty model name
    pub fn blur_model_location(&self) -> Result<Vec<FieldChange>> {
        self.blur(fields::PATH)
    }

    /// Whether the config is typed rather than picked from the list
    pub fn use_custom_config(&self) -> Result<bool> {
        Ok(self.form.lock().entry_mode(fields::CONFIG)? == EntryMode::FreeText)
    }

    pub fn toggle_custom_config(&self) -> Result<EntryMode> {
        Ok(self.form.lock().toggle_entry_mode(fields::CONFIG)?)
    }

    pub fn render(&self, field: &str, cache: &mut RenderCache) -> Result<Arc<RenderedField>> {
        let props = self.form.lock().render_props(field)?;
        Ok(cache.render(props))
    }

    /// Render the visible fields in display order
    pub fn render_form(&self, cache: &mut RenderCache) -> Result<Vec<Arc<RenderedField>>> {
        VISIBLE_FIELDS
            .iter()
            .map(|field| self.render(field, cache))
            .collect()
    }

    /// Fetch the server's config files into the config selector.
    ///
    /// Returns the number of options now offered.
    pub async fn load_config_options(&self) -> Result<usize> {
        let result = self
            .options
            .query_options(&FieldOptionsQuery::default())
            .await?;
        let count = result.options.len();
        self.form.lock().set_options(fields::CONFIG, result.options)?;
        Ok(count)
    }

    /// Submit the form to the model API.
    ///
    /// On success the form resets, a success toast is queued and a scanner
    /// selection this form was opened from is cleared. On failure an error
    /// toast is queued and field values are kept. An incomplete form or an
    /// overlapping submit returns an error without any toast.
    pub async fn submit(&self) -> Result<ModelRecord> {
        match self.pipeline.submit(&self.form).await {
            Ok(report) => {
                let name = report
                    .request
                    .text(fields::MODEL_NAME)
                    .unwrap_or(report.output.model_name.as_str())
                    .to_string();
                self.toast(make_toast(
                    messages::model_added(&name),
                    ToastStatus::Success,
                    &self.toasts,
                ));
                if self.model_path.is_some() {
                    self.store
                        .dispatch(AppAction::SetAdvancedAddScanModel { model_path: None });
                }
                Ok(report.output)
            }
            Err(FormEngineError::SubmissionFailed(message)) => {
                self.toast(
                    make_toast(messages::MODEL_ADD_FAILED, ToastStatus::Error, &self.toasts)
                        .with_description(message.as_str()),
                );
                Err(FormEngineError::SubmissionFailed(message).into())
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn unmount(&self) {
        self.form.unmount();
    }

    fn toast(&self, toast: crate::toast::Toast) {
        self.store.dispatch(AppAction::AddToast { toast });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::store::SharedStore;
    use form_engine::Control;

    struct Offline;

    #[async_trait]
    impl ModelApi for Offline {
        async fn add_model(
            &self,
            _config: &CheckpointModelConfig,
        ) -> std::result::Result<ModelRecord, ApiError> {
            Err(ApiError::Status {
                status: 500,
                body: "offline".to_string(),
            })
        }

        async fn checkpoint_configs(&self) -> std::result::Result<Vec<String>, ApiError> {
            Ok(vec!["configs\\stable-diffusion\\v2-inference-v.yaml".to_string()])
        }
    }

    fn screen(model_path: Option<&str>) -> (SharedStore, AdvancedAddCheckpoint) {
        let store = SharedStore::new();
        let screen = AdvancedAddCheckpoint::new(
            Arc::new(Offline),
            Arc::new(store.clone()),
            &StudioConfig::default(),
            model_path.map(str::to_string),
        )
        .unwrap();
        (store, screen)
    }

    #[test]
    fn test_edit_goes_through_control() {
        let (_store, screen) = screen(None);
        let change = screen
            .edit(fields::BASE_MODEL, EditInput::Selected("sdxl".to_string()))
            .unwrap();
        assert_eq!(change.owner, "advanced-add-checkpoint");
        assert_eq!(screen.value(fields::BASE_MODEL).unwrap(), FieldValue::enumeration("sdxl"));

        let err = screen.edit(fields::BASE_MODEL, EditInput::Checked(true)).unwrap_err();
        assert!(matches!(
            err,
            crate::error::StudioError::Form(FormEngineError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_render_form_in_display_order() {
        let (_store, screen) = screen(None);
        let rendered = screen.render_form(&mut RenderCache::new()).unwrap();
        let names: Vec<_> = rendered.iter().map(|r| r.props().field.as_str()).collect();
        assert_eq!(names, VISIBLE_FIELDS);
        assert!(matches!(rendered[6].control(), Control::Select { .. }));
    }

    #[tokio::test]
    async fn test_load_config_options() {
        let (_store, screen) = screen(None);
        assert_eq!(screen.load_config_options().await.unwrap(), 2);

        let rendered = screen.render(fields::CONFIG, &mut RenderCache::new()).unwrap();
        match rendered.control() {
            Control::Select { options, .. } => assert_eq!(options.len(), 2),
            other => panic!("expected select, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_incomplete_form_queues_no_toast() {
        let (store, screen) = screen(None);
        let err = screen.submit().await.unwrap_err();
        assert_eq!(err.validation_errors().len(), 2);
        assert!(store.snapshot().system.toasts.is_empty());
    }
}
