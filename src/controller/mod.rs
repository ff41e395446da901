//! Failover controller.
//!
//! # Data Flow
//! ```text
//! UI mutation (add/remove provider, toggle checks)
//!     → registry mutation + full subscription recompile, one atomic unit
//!     → poller re-polls
//!
//! Poller events:
//!     Scores            → score board (last snapshot wins)
//!     ValidationFailed  → error sink (single slot)
//!
//! Operator actions:
//!     switch_to_provider / fallback ops → failover state only,
//!     no recompilation
//! ```
//!
//! # Design Decisions
//! - The poller is an injected, long-lived collaborator, never recreated
//!   per call
//! - One mutex spans registry mutation and re-registration so poller
//!   registrations always mirror the current configuration
//! - A rejected re-registration rolls the mutation back; the poller's
//!   table may be stale until the next successful sync, which is logged
//! - Health is observed, never acted on: a non-positive score flags a
//!   provider unhealthy for display but the active pointer only moves on
//!   an explicit switch

pub mod scores;
pub mod state;

pub use scores::ScoreBoard;
pub use state::FailoverState;

use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use crate::catalog::{CheckCatalog, CheckKey};
use crate::compiler;
use crate::config::FailoverConfig;
use crate::observability::metrics;
use crate::poller::{Poller, PollerError, PollerEvent, ScoredEndpoint};
use crate::registry::{Provider, ProviderRegistry, RegistryError};
use crate::sink::{ValidationErrorDetails, ValidationErrorSink};

/// Errors from controller operations.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// `delete_provider` called on the active provider.
    #[error("cannot remove the active provider: {0}")]
    ActiveProviderRemoval(String),

    /// A registry mutation was rejected.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The poller rejected the re-registration; the mutation was rolled
    /// back.
    #[error(transparent)]
    Poller(#[from] PollerError),
}

/// Registry and failover state guarded by one lock, so a mutation and the
/// recompilation it triggers are a single atomic unit.
struct Inner {
    registry: ProviderRegistry,
    failover: FailoverState,
}

/// Owns the provider registry, the active/fallback state, the score view
/// and the validation error sink. The public API here is the surface the
/// presentation layer consumes.
pub struct FailoverController {
    poller: Arc<dyn Poller>,
    catalog: CheckCatalog,
    inner: Mutex<Inner>,
    scores: ScoreBoard,
    sink: ValidationErrorSink,
}

impl FailoverController {
    /// Build the controller from seed configuration and perform the
    /// initial registration so the poller mirrors the config from the
    /// start.
    pub fn new(
        poller: Arc<dyn Poller>,
        catalog: CheckCatalog,
        config: &FailoverConfig,
    ) -> Result<Self, ControllerError> {
        let seeds: Vec<(String, Vec<CheckKey>)> = config
            .providers
            .iter()
            .map(|seed| (seed.url.clone(), seed.checks.clone()))
            .collect();
        let registry = ProviderRegistry::seeded(&seeds, &catalog)?;

        if let Some(url) = &config.active_url {
            if !registry.contains(url) {
                return Err(RegistryError::UnknownProvider(url.clone()).into());
            }
        }

        compiler::sync(poller.as_ref(), registry.providers(), &catalog)?;

        tracing::info!(
            providers = registry.len(),
            checks = catalog.len(),
            active = config.active_url.as_deref().unwrap_or("<none>"),
            "Failover controller initialized"
        );

        Ok(Self {
            poller,
            catalog,
            inner: Mutex::new(Inner {
                registry,
                failover: FailoverState {
                    active_provider_url: config.active_url.clone(),
                    fallback_urls: Vec::new(),
                },
            }),
            scores: ScoreBoard::new(),
            sink: ValidationErrorSink::new(),
        })
    }

    // --- Registry mutations (recompile, roll back on poller failure) ---

    /// Register a new provider with the full check set enabled.
    pub fn add_provider(&self, url: &str) -> Result<Provider, ControllerError> {
        let mut inner = self.inner.lock();
        let snapshot = inner.registry.clone();
        let provider = inner.registry.add(url, &self.catalog)?;
        self.resync_or_rollback(&mut inner, snapshot, None)?;
        Ok(provider)
    }

    /// Delete a provider. Rejected while the provider is active; otherwise
    /// it is also dropped from the fallback list.
    pub fn delete_provider(&self, url: &str) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock();
        if inner.failover.active_provider_url.as_deref() == Some(url) {
            return Err(ControllerError::ActiveProviderRemoval(url.to_string()));
        }
        let registry_snapshot = inner.registry.clone();
        let failover_snapshot = inner.failover.clone();

        inner.registry.remove(url)?;
        inner.failover.remove_fallback(url);
        self.resync_or_rollback(&mut inner, registry_snapshot, Some(failover_snapshot))?;
        Ok(())
    }

    /// Replace a provider's enabled checks wholesale.
    pub fn set_checks_for_provider(
        &self,
        url: &str,
        check_keys: &[CheckKey],
    ) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock();
        let snapshot = inner.registry.clone();
        inner.registry.set_checks(url, check_keys, &self.catalog)?;
        self.resync_or_rollback(&mut inner, snapshot, None)?;
        Ok(())
    }

    /// Reset the registry to the seeded provider list with full check
    /// sets, and clear the fallback list. The active pointer survives only
    /// if its provider still exists afterwards.
    pub fn restore_defaults(&self) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock();
        let registry_snapshot = inner.registry.clone();
        let failover_snapshot = inner.failover.clone();

        inner.registry.restore_defaults(&self.catalog);
        inner.failover.fallback_urls.clear();
        if let Some(active) = inner.failover.active_provider_url.clone() {
            if !inner.registry.contains(&active) {
                tracing::warn!(url = %active, "Active provider gone after restore, clearing pointer");
                inner.failover.active_provider_url = None;
            }
        }
        self.resync_or_rollback(&mut inner, registry_snapshot, Some(failover_snapshot))?;
        Ok(())
    }

    fn resync_or_rollback(
        &self,
        inner: &mut Inner,
        registry_snapshot: ProviderRegistry,
        failover_snapshot: Option<FailoverState>,
    ) -> Result<(), ControllerError> {
        match compiler::sync(self.poller.as_ref(), inner.registry.providers(), &self.catalog) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Poller re-registration failed, rolling back; poller table may be stale until the next successful sync"
                );
                inner.registry = registry_snapshot;
                if let Some(failover) = failover_snapshot {
                    inner.failover = failover;
                }
                Err(e.into())
            }
        }
    }

    // --- Failover state (no subscription side effects) ---

    /// Point the UI at a provider, or at none while the host resolves one.
    /// The url must reference a registered provider.
    pub fn switch_to_provider(&self, url: Option<&str>) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock();
        if let Some(url) = url {
            if !inner.registry.contains(url) {
                return Err(RegistryError::UnknownProvider(url.to_string()).into());
            }
        }
        tracing::info!(
            from = inner.failover.active_provider_url.as_deref().unwrap_or("<none>"),
            to = url.unwrap_or("<none>"),
            "Switching active provider"
        );
        inner.failover.active_provider_url = url.map(str::to_string);
        Ok(())
    }

    /// Mark a registered provider as a fallback. Idempotent.
    pub fn register_fallback(&self, url: &str) -> Result<(), ControllerError> {
        let mut inner = self.inner.lock();
        if !inner.registry.contains(url) {
            return Err(RegistryError::UnknownProvider(url.to_string()).into());
        }
        if inner.failover.register_fallback(url) {
            if let Some(provider) = inner.registry.get_mut(url) {
                provider.is_fallback = true;
            }
            tracing::info!(url = %url, "Fallback registered");
        }
        Ok(())
    }

    /// Unmark a fallback. A no-op when the url is not listed.
    pub fn remove_fallback(&self, url: &str) {
        let mut inner = self.inner.lock();
        if inner.failover.remove_fallback(url) {
            if let Some(provider) = inner.registry.get_mut(url) {
                provider.is_fallback = false;
            }
            tracing::info!(url = %url, "Fallback removed");
        }
    }

    // --- Validation errors ---

    /// Dismiss the displayed validation error if it matches.
    pub fn clear_validation_error(&self, provider_name: &str, check_name: &str) {
        self.sink.clear(provider_name, check_name);
    }

    /// The currently displayed validation error, if any.
    pub fn validation_error(&self) -> Option<ValidationErrorDetails> {
        self.sink.current()
    }

    // --- Read accessors ---

    pub fn list(&self) -> Vec<Provider> {
        self.inner.lock().registry.list()
    }

    pub fn failover_state(&self) -> FailoverState {
        self.inner.lock().failover.clone()
    }

    /// Latest full score snapshot from the poller.
    pub fn current_scores(&self) -> Vec<ScoredEndpoint> {
        self.scores.latest().as_ref().clone()
    }

    /// Latest measurement for one provider, if it was polled.
    pub fn score_for(&self, url: &str) -> Option<ScoredEndpoint> {
        self.scores.for_url(url)
    }

    // --- Poller event intake ---

    /// Apply one poller event synchronously.
    pub fn handle_event(&self, event: PollerEvent) {
        match event {
            PollerEvent::Scores(scores) => self.scores.replace(scores),
            PollerEvent::ValidationFailed(details) => {
                metrics::record_validation_failure(&details.check_name);
                self.sink.capture(details);
            }
        }
    }

    /// Consume poller events until the channel closes or shutdown fires.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<PollerEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!("Failover controller intake starting");
        loop {
            tokio::select! {
                event = events.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => {
                            tracing::info!("Poller event channel closed, exiting intake loop");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    tracing::info!("Intake received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }

    /// The check catalog this controller was built with, so hosts can
    /// render check titles next to provider toggles.
    pub fn catalog(&self) -> &CheckCatalog {
        &self.catalog
    }
}
