//! Poller collaborator interface.
//!
//! # Data Flow
//! ```text
//! Core → Poller:
//!     unregister_all()
//!     → register(subscription) once per check with subscribed providers
//!
//! Poller → Core:
//!     PollerEvent::Scores        full ScoredEndpoint snapshot, last wins
//!     PollerEvent::ValidationFailed  routed to the error sink
//! ```
//!
//! # Design Decisions
//! - The poller owns its own scheduling; the core never waits on it
//! - Registrations are all-or-nothing from the core's point of view
//! - Score snapshots replace the previous view wholesale, never merge

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::sink::ValidationErrorDetails;

/// Predicate applied to a polled response body.
///
/// `Ok(())` means the response passed; `Err(message)` carries the
/// human-readable failure description shown to the operator.
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// One check-centric registration handed to the poller.
#[derive(Clone)]
pub struct Subscription {
    /// Opaque method descriptor (e.g. a JSON-RPC method name).
    pub method: String,
    /// Opaque call parameters.
    pub params: Value,
    /// Response predicate.
    pub validate: Validator,
    /// Provider urls to poll with this check, in registry order.
    pub provider_urls: Vec<String>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("method", &self.method)
            .field("params", &self.params)
            .field("provider_urls", &self.provider_urls)
            .finish()
    }
}

/// Errors reported by the poller collaborator.
#[derive(Debug, Error)]
pub enum PollerError {
    /// The poller rejected a `register` call.
    #[error("registration rejected: {0}")]
    Registration(String),

    /// The poller failed to clear its registration table.
    #[error("unregistration failed: {0}")]
    Unregistration(String),
}

/// External polling engine consumed by the core.
///
/// Implementations perform the actual network probing on their own
/// interval and report back through [`PollerEvent`] values.
pub trait Poller: Send + Sync {
    /// Register one check against a list of provider urls.
    fn register(&self, subscription: Subscription) -> Result<(), PollerError>;

    /// Drop every registration. Always called before re-registering.
    fn unregister_all(&self) -> Result<(), PollerError>;
}

/// Health measurement for a single provider, produced by the poller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredEndpoint {
    /// Provider url the measurement belongs to.
    pub url: String,
    /// Health score; `score <= 0` means unhealthy.
    pub score: f64,
    /// Whether the last poll reached the endpoint.
    pub up: bool,
    /// Last observed latency in milliseconds, defined only when `up`.
    pub last_latency: Option<u64>,
}

impl ScoredEndpoint {
    /// A non-positive score marks the endpoint unhealthy for display.
    pub fn is_healthy(&self) -> bool {
        self.score > 0.0
    }
}

/// Events emitted by the poller toward the core.
#[derive(Debug, Clone)]
pub enum PollerEvent {
    /// Full snapshot of current scores. Replaces the previous view.
    Scores(Vec<ScoredEndpoint>),
    /// A check's validate predicate rejected a response.
    ValidationFailed(ValidationErrorDetails),
}
