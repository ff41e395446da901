//! Validation error capture.
//!
//! A single-slot, last-write-wins holder mirroring the one error dialog
//! the operator sees. Multiple failures may occur between polls; only the
//! most recently surfaced one is retained until cleared.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Details of one failed validation, as reported by the poller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationErrorDetails {
    /// Provider url the failing response came from.
    pub provider_name: String,
    /// Key of the check whose predicate rejected the response.
    pub check_name: String,
    /// Human-readable failure description.
    pub message: String,
    /// Response paths the predicate flagged.
    pub paths: Vec<String>,
}

/// Holds the currently displayed validation error, if any.
#[derive(Default)]
pub struct ValidationErrorSink {
    current: Mutex<Option<ValidationErrorDetails>>,
}

impl ValidationErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the displayed error. Last write wins.
    pub fn capture(&self, details: ValidationErrorDetails) {
        tracing::warn!(
            provider = %details.provider_name,
            check = %details.check_name,
            message = %details.message,
            "Validation failure captured"
        );
        *self.current.lock() = Some(details);
    }

    /// Clear the error only if it matches the given provider and check.
    ///
    /// A clear issued by the UI for an error that has since been replaced
    /// by a newer, unrelated one must not clear the newer error.
    pub fn clear(&self, provider_name: &str, check_name: &str) {
        let mut slot = self.current.lock();
        let matches = slot.as_ref().is_some_and(|d| {
            d.provider_name == provider_name && d.check_name == check_name
        });
        if matches {
            *slot = None;
        }
    }

    /// The currently displayed error, if any.
    pub fn current(&self) -> Option<ValidationErrorDetails> {
        self.current.lock().clone()
    }
}
