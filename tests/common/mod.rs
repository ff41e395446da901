//! Shared utilities for integration testing.

use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use provider_failover::{Poller, PollerError, Subscription};

/// What one `register` call carried, minus the predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: serde_json::Value,
    pub provider_urls: Vec<String>,
}

/// Programmable poller double.
///
/// Mirrors a real poller's registration table: `unregister_all` clears
/// it, `register` appends to it. Registration failures can be injected
/// to exercise rollback paths.
#[derive(Default)]
pub struct RecordingPoller {
    table: Mutex<Vec<RecordedCall>>,
    unregister_count: AtomicUsize,
    fail_registration: AtomicBool,
}

impl RecordingPoller {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current registration table, in call order.
    pub fn table(&self) -> Vec<RecordedCall> {
        self.table.lock().clone()
    }

    /// How many times `unregister_all` ran (= completed sync attempts).
    pub fn unregister_count(&self) -> usize {
        self.unregister_count.load(Ordering::SeqCst)
    }

    /// Make subsequent `register` calls fail until turned off again.
    pub fn fail_registrations(&self, fail: bool) {
        self.fail_registration.store(fail, Ordering::SeqCst);
    }
}

impl Poller for RecordingPoller {
    fn register(&self, subscription: Subscription) -> Result<(), PollerError> {
        if self.fail_registration.load(Ordering::SeqCst) {
            return Err(PollerError::Registration("injected failure".to_string()));
        }
        self.table.lock().push(RecordedCall {
            method: subscription.method,
            params: subscription.params,
            provider_urls: subscription.provider_urls,
        });
        Ok(())
    }

    fn unregister_all(&self) -> Result<(), PollerError> {
        self.unregister_count.fetch_add(1, Ordering::SeqCst);
        self.table.lock().clear();
        Ok(())
    }
}
