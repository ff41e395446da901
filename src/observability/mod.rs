//! Observability subsystem.
//!
//! # Responsibilities
//! - Initialize structured logging
//! - Record health and recompilation metrics

pub mod logging;
pub mod metrics;
