//! Score snapshot view.
//!
//! The poller emits the full current `ScoredEndpoint` list on every cycle,
//! not a diff; the core replaces its view wholesale on receipt. ArcSwap
//! gives readers lock-free snapshots while intake stays a single store.

use arc_swap::ArcSwap;
use std::sync::Arc;

use crate::observability::metrics;
use crate::poller::ScoredEndpoint;

/// Last-received-wins holder for the poller's score snapshot.
#[derive(Default)]
pub struct ScoreBoard {
    snapshot: ArcSwap<Vec<ScoredEndpoint>>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole view with a new snapshot.
    pub fn replace(&self, scores: Vec<ScoredEndpoint>) {
        for endpoint in &scores {
            metrics::record_provider_health(&endpoint.url, endpoint.is_healthy());
        }
        tracing::debug!(endpoints = scores.len(), "Score snapshot replaced");
        self.snapshot.store(Arc::new(scores));
    }

    /// The latest snapshot.
    pub fn latest(&self) -> Arc<Vec<ScoredEndpoint>> {
        self.snapshot.load_full()
    }

    /// The latest measurement for one provider, if it was polled.
    pub fn for_url(&self, url: &str) -> Option<ScoredEndpoint> {
        self.snapshot
            .load()
            .iter()
            .find(|e| e.url == url)
            .cloned()
    }
}
