//! Subscription compiler.
//!
//! # Data Flow
//! ```text
//! provider → {enabled checks}          (registry view)
//!     → invert()
//! check → [provider urls]              (poller view)
//!     → sync(): unregister_all, then register once per check
//! ```
//!
//! # Design Decisions
//! - Wholesale recompute on every mutation, never incremental diffing:
//!   the poller's registration table is always an exact mirror of the
//!   current configuration
//! - Iteration order is providers in registry order, checks in stored
//!   order, so two compilations of unchanged input emit identical calls
//! - O(checks × providers) per mutation is acceptable; mutations are
//!   rare operator actions, not a hot path

use crate::catalog::{CheckCatalog, CheckKey};
use crate::observability::metrics;
use crate::poller::{Poller, PollerError, Subscription};
use crate::registry::Provider;

/// Invert the provider-centric check assignment into the check-centric
/// form the poller registers.
///
/// Entries appear in first-encounter order; provider urls are appended in
/// registry order. Check keys missing from the catalog are skipped (they
/// cannot be registered) and flagged in development builds.
pub fn invert(
    providers: &[Provider],
    catalog: &CheckCatalog,
) -> Vec<(CheckKey, Vec<String>)> {
    let mut check_to_providers: Vec<(CheckKey, Vec<String>)> = Vec::new();
    for provider in providers {
        for key in &provider.enabled_checks {
            debug_assert!(catalog.contains(key), "unknown check key: {}", key);
            if !catalog.contains(key) {
                continue;
            }
            match check_to_providers.iter_mut().find(|(k, _)| k == key) {
                Some((_, urls)) => urls.push(provider.url.clone()),
                None => check_to_providers.push((key.clone(), vec![provider.url.clone()])),
            }
        }
    }
    check_to_providers
}

/// Re-register the full current configuration with the poller.
///
/// Always clears the poller's registration table first; stale
/// subscriptions are cancelled structurally rather than tracked.
pub fn sync(
    poller: &dyn Poller,
    providers: &[Provider],
    catalog: &CheckCatalog,
) -> Result<(), PollerError> {
    poller.unregister_all()?;

    let compiled = invert(providers, catalog);
    for (key, provider_urls) in &compiled {
        // invert() only emits catalog keys, and never with an empty list.
        let check = match catalog.get(key) {
            Some(check) => check,
            None => continue,
        };
        poller.register(Subscription {
            method: check.method.clone(),
            params: check.params.clone(),
            validate: check.validate.clone(),
            provider_urls: provider_urls.clone(),
        })?;
    }

    metrics::record_recompile(compiled.len());
    tracing::debug!(
        checks = compiled.len(),
        providers = providers.len(),
        "Subscriptions recompiled"
    );
    Ok(())
}
