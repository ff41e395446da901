//! Check catalog — named validation probes assignable to providers.
//!
//! Every check a provider can be polled with is described here: the opaque
//! RPC method descriptor, its parameters, and the predicate applied to the
//! response. The catalog is supplied once at construction and treated as
//! read-only for the life of the session.

use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use crate::poller::Validator;

/// Unique key identifying a check within the catalog.
pub type CheckKey = String;

/// A named, reusable validation probe.
#[derive(Clone)]
pub struct Check {
    /// Unique catalog key.
    pub key: CheckKey,
    /// Human-readable title.
    pub title: String,
    /// Opaque method descriptor handed to the poller.
    pub method: String,
    /// Opaque call parameters handed to the poller.
    pub params: Value,
    /// Response predicate.
    pub validate: Validator,
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("method", &self.method)
            .finish()
    }
}

/// Ordered, read-only set of checks.
pub struct CheckCatalog {
    checks: Vec<Check>,
}

impl CheckCatalog {
    /// Build a catalog from a list of checks.
    ///
    /// Duplicate keys are a programmer error and panic immediately.
    pub fn new(checks: Vec<Check>) -> Self {
        for (i, check) in checks.iter().enumerate() {
            assert!(
                !checks[..i].iter().any(|c| c.key == check.key),
                "duplicate check key in catalog: {}",
                check.key
            );
        }
        Self { checks }
    }

    /// The default blockchain check set.
    pub fn builtin() -> Self {
        Self::new(vec![
            Check {
                key: "dynamic_global_properties".to_string(),
                title: "Dynamic global properties".to_string(),
                method: "condenser_api.get_dynamic_global_properties".to_string(),
                params: json!([]),
                validate: require_field("head_block_number"),
            },
            Check {
                key: "block_api".to_string(),
                title: "Block retrieval".to_string(),
                method: "block_api.get_block".to_string(),
                params: json!({ "block_num": 1 }),
                validate: require_field("block"),
            },
            Check {
                key: "account_history".to_string(),
                title: "Account history".to_string(),
                method: "account_history_api.get_account_history".to_string(),
                params: json!({ "account": "hiveio", "start": -1, "limit": 1 }),
                validate: require_field("history"),
            },
        ])
    }

    /// Look up a check by key.
    pub fn get(&self, key: &str) -> Option<&Check> {
        self.checks.iter().find(|c| c.key == key)
    }

    /// Catalog keys in registration order.
    pub fn keys(&self) -> Vec<CheckKey> {
        self.checks.iter().map(|c| c.key.clone()).collect()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.checks.iter().any(|c| c.key == key)
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

/// Predicate requiring a top-level field on the response object.
fn require_field(field: &'static str) -> Validator {
    Arc::new(move |data: &Value| {
        if data.get(field).is_some() {
            Ok(())
        } else {
            Err(format!("response is missing \"{}\"", field))
        }
    })
}
