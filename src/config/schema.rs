//! Configuration schema definitions.
//!
//! This module defines the seed configuration for the failover
//! controller. All types derive Serde traits for deserialization from
//! config files.

use serde::{Deserialize, Serialize};

/// Seed configuration for the failover controller.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FailoverConfig {
    /// Candidate providers seeded at session start.
    pub providers: Vec<ProviderSeed>,

    /// Provider serving the UI at session start. Usually the persisted
    /// API address the host restored from storage.
    pub active_url: Option<String>,
}

/// One seeded provider endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderSeed {
    /// Endpoint url.
    pub url: String,

    /// Enabled check keys. Empty means the full catalog.
    #[serde(default)]
    pub checks: Vec<String>,
}

impl ProviderSeed {
    /// Seed with the full catalog check set.
    pub fn full(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            checks: Vec::new(),
        }
    }
}

impl Default for FailoverConfig {
    fn default() -> Self {
        let providers = vec![
            ProviderSeed::full("https://api.hive.blog"),
            ProviderSeed::full("https://anyx.io"),
            ProviderSeed::full("https://api.deathwing.me"),
            ProviderSeed::full("https://api.openhive.network"),
        ];
        let active_url = Some(providers[0].url.clone());
        Self {
            providers,
            active_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FailoverConfig::default();
        assert!(!config.providers.is_empty());
        assert_eq!(config.active_url.as_deref(), Some("https://api.hive.blog"));
        assert!(config.providers.iter().all(|p| p.checks.is_empty()));
    }

    #[test]
    fn test_minimal_toml() {
        let config: FailoverConfig = toml::from_str(
            r#"
            [[providers]]
            url = "https://anyx.io"
            checks = ["block_api"]
            "#,
        )
        .unwrap();
        assert_eq!(config.providers.len(), 1);
        assert_eq!(config.providers[0].checks, vec!["block_api".to_string()]);
        assert_eq!(config.active_url, None);
    }
}
