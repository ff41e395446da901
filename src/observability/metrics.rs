//! Metrics collection.
//!
//! # Metrics
//! - `provider_health` (gauge): 1=healthy, 0=unhealthy, per provider url
//! - `subscription_recompiles_total` (counter): compiler runs
//! - `subscription_checks_registered` (gauge): checks in the last compile
//! - `validation_failures_total` (counter): predicate rejections by check
//!
//! Facade only; the embedding host installs the exporter.

/// Record per-provider health derived from the latest score snapshot.
pub fn record_provider_health(url: &str, healthy: bool) {
    let value = if healthy { 1.0 } else { 0.0 };
    metrics::gauge!("provider_health", "provider" => url.to_string()).set(value);
}

/// Record one compiler run and the size of its output.
pub fn record_recompile(check_count: usize) {
    metrics::counter!("subscription_recompiles_total").increment(1);
    metrics::gauge!("subscription_checks_registered").set(check_count as f64);
}

/// Record a validation failure reported by the poller.
pub fn record_validation_failure(check: &str) {
    metrics::counter!("validation_failures_total", "check" => check.to_string()).increment(1);
}
