//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::catalog::CheckCatalog;
use crate::config::schema::FailoverConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate a seed configuration from a TOML file.
pub fn load_config(path: &Path, catalog: &CheckCatalog) -> Result<FailoverConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: FailoverConfig = toml::from_str(&content)?;

    validate_config(&config, catalog).map_err(ConfigError::Validation)?;

    tracing::info!(
        path = %path.display(),
        providers = config.providers.len(),
        "Configuration loaded"
    );
    Ok(config)
}
