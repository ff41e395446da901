//! Provider registry.
//!
//! # Responsibilities
//! - Own the ordered collection of candidate providers
//! - Apply the add / remove / replace-checks / restore-defaults mutations
//! - Enforce url uniqueness and check-key referential integrity
//!
//! # Design Decisions
//! - Insertion order is preserved; compilation output depends on it
//! - Check replacement is wholesale, never incremental
//! - The active-provider removal guard lives in the controller, which is
//!   the component that knows the active pointer

pub mod provider;

pub use provider::Provider;

use thiserror::Error;

use crate::catalog::{CheckCatalog, CheckKey};

/// Errors from registry mutations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// `add` called with a url that is already registered.
    #[error("provider already registered: {0}")]
    DuplicateProvider(String),

    /// Operation aimed at a url with no registered provider.
    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    /// A check key that does not exist in the catalog.
    #[error("unknown check key \"{key}\" for provider {provider}")]
    UnknownCheckKey { provider: String, key: String },

    /// The url did not parse as an absolute url.
    #[error("invalid provider url \"{url}\": {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
}

/// Ordered CRUD store of candidate provider endpoints.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
    /// Seeded provider urls, kept for `restore_defaults`.
    default_urls: Vec<String>,
}

impl ProviderRegistry {
    /// Seed the registry from a list of `(url, enabled check keys)` pairs.
    ///
    /// An empty key list means the full catalog key set. Seeded providers
    /// are not user-added.
    pub fn seeded(
        seeds: &[(String, Vec<CheckKey>)],
        catalog: &CheckCatalog,
    ) -> Result<Self, RegistryError> {
        let mut providers: Vec<Provider> = Vec::with_capacity(seeds.len());
        for (url, keys) in seeds {
            parse_url(url)?;
            if providers.iter().any(|p| &p.url == url) {
                return Err(RegistryError::DuplicateProvider(url.clone()));
            }
            let checks = if keys.is_empty() {
                catalog.keys()
            } else {
                dedup_checks(url, keys, catalog)?
            };
            providers.push(Provider::new(url.clone(), checks, false));
        }
        Ok(Self {
            default_urls: providers.iter().map(|p| p.url.clone()).collect(),
            providers,
        })
    }

    /// Register a new provider with the full catalog check set enabled.
    pub fn add(&mut self, url: &str, catalog: &CheckCatalog) -> Result<Provider, RegistryError> {
        parse_url(url)?;
        if self.contains(url) {
            return Err(RegistryError::DuplicateProvider(url.to_string()));
        }
        let provider = Provider::new(url, catalog.keys(), true);
        self.providers.push(provider.clone());
        tracing::info!(url = %url, "Provider added");
        Ok(provider)
    }

    /// Delete a provider. The caller is responsible for the active-provider
    /// guard and for dropping the url from the fallback list.
    pub fn remove(&mut self, url: &str) -> Result<Provider, RegistryError> {
        let idx = self
            .providers
            .iter()
            .position(|p| p.url == url)
            .ok_or_else(|| RegistryError::UnknownProvider(url.to_string()))?;
        let removed = self.providers.remove(idx);
        tracing::info!(url = %url, "Provider removed");
        Ok(removed)
    }

    /// Replace a provider's enabled checks wholesale.
    pub fn set_checks(
        &mut self,
        url: &str,
        keys: &[CheckKey],
        catalog: &CheckCatalog,
    ) -> Result<(), RegistryError> {
        let checks = dedup_checks(url, keys, catalog)?;
        let provider = self
            .providers
            .iter_mut()
            .find(|p| p.url == url)
            .ok_or_else(|| RegistryError::UnknownProvider(url.to_string()))?;
        provider.enabled_checks = checks;
        tracing::debug!(url = %url, count = provider.enabled_checks.len(), "Provider checks replaced");
        Ok(())
    }

    /// Reset to the seeded provider list, each with the full default
    /// check set, dropping every user-added provider and any flag or
    /// check changes.
    pub fn restore_defaults(&mut self, catalog: &CheckCatalog) {
        self.providers = self
            .default_urls
            .iter()
            .map(|url| Provider::new(url.clone(), catalog.keys(), false))
            .collect();
        tracing::info!(count = self.providers.len(), "Provider registry restored to defaults");
    }

    pub fn list(&self) -> Vec<Provider> {
        self.providers.clone()
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn get(&self, url: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.url == url)
    }

    pub(crate) fn get_mut(&mut self, url: &str) -> Option<&mut Provider> {
        self.providers.iter_mut().find(|p| p.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.providers.iter().any(|p| p.url == url)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

fn parse_url(url: &str) -> Result<(), RegistryError> {
    url::Url::parse(url)
        .map(|_| ())
        .map_err(|source| RegistryError::InvalidUrl {
            url: url.to_string(),
            source,
        })
}

/// Deduplicate keys preserving first occurrence, rejecting unknown ones.
///
/// Unknown keys fail loudly in development builds; release builds report
/// the error to the caller instead of panicking.
fn dedup_checks(
    url: &str,
    keys: &[CheckKey],
    catalog: &CheckCatalog,
) -> Result<Vec<CheckKey>, RegistryError> {
    let mut checks: Vec<CheckKey> = Vec::with_capacity(keys.len());
    for key in keys {
        debug_assert!(catalog.contains(key), "unknown check key: {}", key);
        if !catalog.contains(key) {
            return Err(RegistryError::UnknownCheckKey {
                provider: url.to_string(),
                key: key.clone(),
            });
        }
        if !checks.contains(key) {
            checks.push(key.clone());
        }
    }
    Ok(checks)
}
