//! Failover state.
//!
//! # States
//! - No active provider (e.g. while the host is still resolving one)
//! - Active provider X
//!
//! # State Transitions
//! ```text
//! explicit switch_to_provider calls only; health scores never move the
//! active pointer on their own
//! ```

use serde::Serialize;

/// Active-provider pointer plus the ordered fallback list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FailoverState {
    /// Url of the provider currently serving the UI, if any.
    pub active_provider_url: Option<String>,
    /// Alternate providers, in registration order, no duplicates.
    pub fallback_urls: Vec<String>,
}

impl FailoverState {
    /// Append a fallback url. Returns false if it was already listed.
    pub(crate) fn register_fallback(&mut self, url: &str) -> bool {
        if self.fallback_urls.iter().any(|u| u == url) {
            return false;
        }
        self.fallback_urls.push(url.to_string());
        true
    }

    /// Remove a fallback url. Returns false if it was not listed.
    pub(crate) fn remove_fallback(&mut self, url: &str) -> bool {
        let before = self.fallback_urls.len();
        self.fallback_urls.retain(|u| u != url);
        self.fallback_urls.len() != before
    }

    pub(crate) fn is_fallback(&self, url: &str) -> bool {
        self.fallback_urls.iter().any(|u| u == url)
    }
}
