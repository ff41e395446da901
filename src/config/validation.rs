//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check referential integrity (seeded check keys exist in the catalog,
//!   the active url references a seeded provider)
//! - Detect duplicate provider urls
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over (config, catalog)
//! - Runs before the config is accepted into the controller

use thiserror::Error;

use crate::catalog::CheckCatalog;
use crate::config::schema::FailoverConfig;

/// One semantic problem found in a seed configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no providers configured")]
    NoProviders,

    #[error("invalid provider url \"{0}\"")]
    InvalidUrl(String),

    #[error("duplicate provider url \"{0}\"")]
    DuplicateUrl(String),

    #[error("provider {provider} references unknown check key \"{key}\"")]
    UnknownCheckKey { provider: String, key: String },

    #[error("active url \"{0}\" is not a configured provider")]
    UnknownActiveUrl(String),
}

/// Validate a seed configuration against a catalog, reporting every
/// problem found.
pub fn validate_config(
    config: &FailoverConfig,
    catalog: &CheckCatalog,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.providers.is_empty() {
        errors.push(ValidationError::NoProviders);
    }

    for (i, seed) in config.providers.iter().enumerate() {
        if url::Url::parse(&seed.url).is_err() {
            errors.push(ValidationError::InvalidUrl(seed.url.clone()));
        }
        if config.providers[..i].iter().any(|p| p.url == seed.url) {
            errors.push(ValidationError::DuplicateUrl(seed.url.clone()));
        }
        for key in &seed.checks {
            if !catalog.contains(key) {
                errors.push(ValidationError::UnknownCheckKey {
                    provider: seed.url.clone(),
                    key: key.clone(),
                });
            }
        }
    }

    if let Some(active) = &config.active_url {
        if !config.providers.iter().any(|p| &p.url == active) {
            errors.push(ValidationError::UnknownActiveUrl(active.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
