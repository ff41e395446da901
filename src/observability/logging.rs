//! Structured logging.
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Level configurable via `RUST_LOG`, defaulting to info for this crate
//! - Init is idempotent so tests and embedding hosts can both call it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the tracing subscriber.
///
/// Does nothing if a global subscriber is already set, so a host
/// application that configures its own logging wins.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "provider_failover=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
