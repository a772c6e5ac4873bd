//! Async submission pipeline
//!
//! Takes a validated snapshot from a [`FormHandle`], hands it to a
//! [`SubmitHandler`] (usually a network call) and applies the outcome back
//! to the form: reset on success, untouched on failure. Overlapping submits
//! of one form are refused, and a response that arrives after the form was
//! unmounted leaves local state alone.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, MutexGuard};
use thiserror::Error;

use crate::controller::{FormController, SubmissionRequest};
use crate::error::{FormEngineError, Result};
use crate::events::{EventSink, FormEvent, NullEventSink};

/// Rejection reported by a submit handler
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SubmissionFailure {
    pub message: String,
}

impl SubmissionFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The external side of a submission (e.g. an HTTP API call)
#[async_trait]
pub trait SubmitHandler: Send + Sync {
    type Output: Send;

    async fn submit(
        &self,
        request: &SubmissionRequest,
    ) -> std::result::Result<Self::Output, SubmissionFailure>;
}

/// Shared handle to a mounted form
#[derive(Clone)]
pub struct FormHandle {
    form: Arc<Mutex<FormController>>,
    mounted: Arc<AtomicBool>,
}

impl FormHandle {
    pub fn new(controller: FormController) -> Self {
        Self {
            form: Arc::new(Mutex::new(controller)),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Lock the form. Never hold the guard across an await.
    pub fn lock(&self) -> MutexGuard<'_, FormController> {
        self.form.lock()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    /// Tear the form down: values go back to their reset state and any
    /// outstanding submission can no longer touch them.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
        let mut form = self.form.lock();
        if form.is_submitting() {
            log::debug!(
                "Form {}: unmounted with a submission in flight",
                form.form_id()
            );
        }
        form.reset();
    }
}

/// Outcome of a successful submission
#[derive(Debug)]
pub struct SubmissionReport<T> {
    /// The snapshot that was sent
    pub request: SubmissionRequest,
    /// What the handler returned
    pub output: T,
    /// False when the form was unmounted before the response arrived and
    /// local state was therefore left alone
    pub applied: bool,
}

/// Runs submissions of forms through a handler
pub struct SubmissionPipeline<H> {
    handler: H,
    events: Arc<dyn EventSink>,
}

impl<H: SubmitHandler> SubmissionPipeline<H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            events: Arc::new(NullEventSink),
        }
    }

    /// Report submission events to `events`
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Validate, send and apply the outcome of one submission.
    ///
    /// Errors:
    /// - `Unmounted` when the form was torn down (nothing is sent)
    /// - `Validation` when required fields are empty (nothing is sent)
    /// - `SubmissionInFlight` when this form already has a submission out
    /// - `SubmissionFailed` when the handler rejects; form state is unchanged
    pub async fn submit(&self, form: &FormHandle) -> Result<SubmissionReport<H::Output>> {
        if !form.is_mounted() {
            let form_id = form.lock().form_id().to_string();
            log::warn!("Form {}: submit after unmount ignored", form_id);
            return Err(FormEngineError::Unmounted(form_id));
        }

        let begun = form.lock().begin_submission();
        let (token, request) = match begun {
            Ok(begun) => begun,
            Err(err @ FormEngineError::SubmissionInFlight(_)) => {
                log::warn!("{}", err);
                let form_id = form.lock().form_id().to_string();
                self.emit(FormEvent::SubmissionRejected { form_id });
                return Err(err);
            }
            Err(err) => return Err(err),
        };

        let form_id = request.form_id().to_string();
        log::info!("Form {}: submitting ({})", form_id, token);
        self.emit(FormEvent::SubmissionStarted {
            form_id: form_id.clone(),
            token,
        });

        let result = self.handler.submit(&request).await;

        let applied = form.lock().finish_submission(token, result.is_ok());
        if !applied {
            log::debug!(
                "Form {}: response for {} arrived after unmount, local state left alone",
                form_id,
                token
            );
            self.emit(FormEvent::LateResponseIgnored {
                form_id: form_id.clone(),
                token,
            });
        }

        match result {
            Ok(output) => {
                log::info!("Form {}: submission succeeded", form_id);
                self.emit(FormEvent::SubmissionSucceeded { form_id, token });
                Ok(SubmissionReport {
                    request,
                    output,
                    applied,
                })
            }
            Err(failure) => {
                log::warn!("Form {}: submission failed: {}", form_id, failure);
                self.emit(FormEvent::SubmissionFailed {
                    form_id,
                    token,
                    error: failure.message.clone(),
                });
                Err(FormEngineError::SubmissionFailed(failure.message))
            }
        }
    }

    fn emit(&self, event: FormEvent) {
        if let Err(e) = self.events.send(event) {
            log::warn!("Failed to send form event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::FormSeed;
    use crate::events::VecEventSink;
    use crate::template::{FieldTemplate, FormSchema};
    use crate::types::FieldValue;
    use tokio::sync::{oneshot, Mutex as AsyncMutex};

    fn schema() -> FormSchema {
        FormSchema::new("upload")
            .field(FieldTemplate::string("name", "Name").required())
            .field(FieldTemplate::string("note", "Note"))
    }

    fn seeded() -> FormHandle {
        let seed = FormSeed::new().value("name", FieldValue::string("seeded"));
        FormHandle::new(FormController::initialize(schema(), Some(seed)).unwrap())
    }

    struct Accept;

    #[async_trait]
    impl SubmitHandler for Accept {
        type Output = String;

        async fn submit(
            &self,
            request: &SubmissionRequest,
        ) -> std::result::Result<String, SubmissionFailure> {
            Ok(request.text("name").unwrap_or_default().to_string())
        }
    }

    struct Reject;

    #[async_trait]
    impl SubmitHandler for Reject {
        type Output = ();

        async fn submit(
            &self,
            _request: &SubmissionRequest,
        ) -> std::result::Result<(), SubmissionFailure> {
            Err(SubmissionFailure::new("server said no"))
        }
    }

    /// Blocks until released through the channel
    struct Gate {
        release: AsyncMutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl SubmitHandler for Gate {
        type Output = ();

        async fn submit(
            &self,
            _request: &SubmissionRequest,
        ) -> std::result::Result<(), SubmissionFailure> {
            let rx = self.release.lock().await.take();
            if let Some(rx) = rx {
                let _ = rx.await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_success_resets_form() {
        let form = seeded();
        form.lock().set_value("note", FieldValue::string("typed")).unwrap();

        let events = Arc::new(VecEventSink::new());
        let pipeline = SubmissionPipeline::new(Accept).with_events(events.clone());
        let report = pipeline.submit(&form).await.unwrap();

        assert_eq!(report.output, "seeded");
        assert!(report.applied);
        assert_eq!(report.request.text("note"), Some("typed"));
        assert_eq!(form.lock().value("note").unwrap(), &FieldValue::string(""));
        assert_eq!(form.lock().value("name").unwrap(), &FieldValue::string("seeded"));

        let events = events.events();
        assert!(matches!(events[0], FormEvent::SubmissionStarted { .. }));
        assert!(matches!(events[1], FormEvent::SubmissionSucceeded { .. }));
    }

    #[tokio::test]
    async fn test_failure_preserves_form() {
        let form = seeded();
        form.lock().set_value("note", FieldValue::string("typed")).unwrap();
        let before = form.lock().state().values().clone();

        let pipeline = SubmissionPipeline::new(Reject);
        let err = pipeline.submit(&form).await.unwrap_err();

        assert!(matches!(err, FormEngineError::SubmissionFailed(ref m) if m == "server said no"));
        assert_eq!(form.lock().state().values(), &before);
        assert!(!form.lock().is_submitting());
    }

    #[tokio::test]
    async fn test_validation_error_sends_nothing() {
        let form = FormHandle::new(FormController::initialize(schema(), None).unwrap());
        let events = Arc::new(VecEventSink::new());
        let pipeline = SubmissionPipeline::new(Accept).with_events(events.clone());

        let err = pipeline.submit(&form).await.unwrap_err();
        assert_eq!(err.validation_errors().len(), 1);
        assert!(events.events().is_empty());
    }

    #[tokio::test]
    async fn test_unmounted_form_not_submitted() {
        let form = seeded();
        form.unmount();

        let events = Arc::new(VecEventSink::new());
        let pipeline = SubmissionPipeline::new(Accept).with_events(events.clone());
        let err = pipeline.submit(&form).await.unwrap_err();

        assert!(matches!(err, FormEngineError::Unmounted(ref id) if id == "upload"));
        assert!(events.events().is_empty());
        assert!(!form.lock().is_submitting());
    }

    #[tokio::test]
    async fn test_overlapping_submit_rejected() {
        let form = seeded();
        let (tx, rx) = oneshot::channel();
        let events = Arc::new(VecEventSink::new());
        let pipeline = Arc::new(
            SubmissionPipeline::new(Gate {
                release: AsyncMutex::new(Some(rx)),
            })
            .with_events(events.clone()),
        );

        let first = {
            let pipeline = pipeline.clone();
            let form = form.clone();
            tokio::spawn(async move { pipeline.submit(&form).await.map(|r| r.applied) })
        };
        while !form.lock().is_submitting() {
            tokio::task::yield_now().await;
        }

        let second = pipeline.submit(&form).await;
        assert!(matches!(second, Err(FormEngineError::SubmissionInFlight(_))));

        tx.send(()).unwrap();
        assert!(first.await.unwrap().unwrap());
        assert!(events
            .events()
            .iter()
            .any(|e| matches!(e, FormEvent::SubmissionRejected { .. })));
    }

    #[tokio::test]
    async fn test_late_response_after_unmount() {
        let form = seeded();
        let (tx, rx) = oneshot::channel();
        let pipeline = Arc::new(SubmissionPipeline::new(Gate {
            release: AsyncMutex::new(Some(rx)),
        }));

        let pending = {
            let pipeline = pipeline.clone();
            let form = form.clone();
            tokio::spawn(async move { pipeline.submit(&form).await.map(|r| r.applied) })
        };
        while !form.lock().is_submitting() {
            tokio::task::yield_now().await;
        }

        form.unmount();
        assert!(!form.is_mounted());
        form.lock().set_value("note", FieldValue::string("after")).unwrap();

        tx.send(()).unwrap();
        assert!(!pending.await.unwrap().unwrap());
        assert_eq!(form.lock().value("note").unwrap(), &FieldValue::string("after"));
    }
}
