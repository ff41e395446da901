//! Provider abstraction.
//!
//! # Responsibilities
//! - Represent a single candidate RPC endpoint
//! - Track which checks are enabled for it
//! - Carry the fallback and user-added flags

use serde::Serialize;

use crate::catalog::CheckKey;

/// A candidate backend RPC endpoint.
///
/// The url is the natural identifier; there is no separate numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Provider {
    /// Endpoint url, unique within the registry.
    pub url: String,
    /// Enabled check keys. Set semantics: unique, insertion order kept
    /// so compilation output is deterministic.
    pub enabled_checks: Vec<CheckKey>,
    /// Marked as an alternate choice. Informational only; no code path
    /// switches to a fallback automatically.
    pub is_fallback: bool,
    /// Added by the operator rather than seeded from configuration.
    pub is_custom: bool,
}

impl Provider {
    /// Create a provider with the given enabled check set.
    pub fn new(url: impl Into<String>, enabled_checks: Vec<CheckKey>, is_custom: bool) -> Self {
        Self {
            url: url.into(),
            enabled_checks,
            is_fallback: false,
            is_custom,
        }
    }

    pub fn has_check(&self, key: &str) -> bool {
        self.enabled_checks.iter().any(|k| k == key)
    }
}
