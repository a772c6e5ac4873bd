//! Event types for form submission progress
//!
//! Events are sent from the submission pipeline to any observer (a store
//! bridge, a logger, a test) to report what happened to each attempt.

use parking_lot::Mutex;
use serde::Serialize;

use crate::controller::SubmissionToken;

/// Trait for sending form events
///
/// This abstracts over the transport mechanism (store dispatch, channel,
/// etc.) so the pipeline can be used in different hosts.
pub trait EventSink: Send + Sync {
    /// Send an event
    ///
    /// Returns an error if the event could not be sent (e.g., channel closed)
    fn send(&self, event: FormEvent) -> Result<(), EventError>;
}

/// Error when sending events fails
#[derive(Debug, Clone)]
pub struct EventError {
    pub message: String,
}

impl std::fmt::Display for EventError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Event error: {}", self.message)
    }
}

impl std::error::Error for EventError {}

/// Events emitted while submitting a form
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FormEvent {
    /// A submission passed validation and was handed to the handler
    #[serde(rename_all = "camelCase")]
    SubmissionStarted {
        form_id: String,
        token: SubmissionToken,
    },

    /// The handler accepted the request
    #[serde(rename_all = "camelCase")]
    SubmissionSucceeded {
        form_id: String,
        token: SubmissionToken,
    },

    /// The handler rejected the request; form state was kept
    #[serde(rename_all = "camelCase")]
    SubmissionFailed {
        form_id: String,
        token: SubmissionToken,
        error: String,
    },

    /// A submit was refused because another one is in flight
    #[serde(rename_all = "camelCase")]
    SubmissionRejected { form_id: String },

    /// A response arrived after the form was reset or unmounted
    #[serde(rename_all = "camelCase")]
    LateResponseIgnored {
        form_id: String,
        token: SubmissionToken,
    },
}

/// A no-op event sink that discards all events
///
/// Useful for testing or when events aren't needed.
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn send(&self, _event: FormEvent) -> Result<(), EventError> {
        Ok(())
    }
}

/// A vector-based event sink that collects events
///
/// Useful for testing to verify events were emitted correctly.
pub struct VecEventSink {
    events: Mutex<Vec<FormEvent>>,
}

impl VecEventSink {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Get all collected events
    pub fn events(&self) -> Vec<FormEvent> {
        self.events.lock().clone()
    }

    /// Clear all collected events
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Default for VecEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecEventSink {
    fn send(&self, event: FormEvent) -> Result<(), EventError> {
        self.events.lock().push(event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_event_sink() {
        let sink = VecEventSink::new();
        sink.send(FormEvent::SubmissionRejected {
            form_id: "form".to_string(),
        })
        .unwrap();

        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            FormEvent::SubmissionRejected { form_id } => assert_eq!(form_id, "form"),
            _ => panic!("Expected SubmissionRejected event"),
        }

        sink.clear();
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(FormEvent::SubmissionRejected {
            form_id: "form".to_string(),
        })
        .unwrap();
        assert_eq!(json["type"], "submissionRejected");
        assert_eq!(json["formId"], "form");
    }

    #[test]
    fn test_null_event_sink() {
        let sink = NullEventSink;
        // Should not panic
        sink.send(FormEvent::SubmissionRejected {
            form_id: "form".to_string(),
        })
        .unwrap();
    }
}
