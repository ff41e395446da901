//! Provider Health & Failover Controller
//!
//! Core of a block explorer's backend-endpoint management: a registry of
//! candidate RPC providers with per-provider validation checks, compiled
//! into check-centric subscriptions for an external polling engine, with
//! manual provider switching, fallback bookkeeping and validation-error
//! capture.
//!
//! # Data Flow
//! ```text
//! operator mutation (registry)
//!     → SubscriptionCompiler: unregister_all + register per check
//!     → Poller re-polls
//!     → PollerEvent::Scores / ValidationFailed
//!     → score board / error sink
//!     → UI renders health, operator may switch_to_provider
//! ```

// Core subsystems
pub mod catalog;
pub mod compiler;
pub mod config;
pub mod controller;
pub mod poller;
pub mod registry;
pub mod sink;

// Cross-cutting concerns
pub mod observability;

pub use catalog::{Check, CheckCatalog, CheckKey};
pub use config::{FailoverConfig, ProviderSeed};
pub use controller::{ControllerError, FailoverController, FailoverState};
pub use poller::{Poller, PollerError, PollerEvent, ScoredEndpoint, Subscription, Validator};
pub use registry::{Provider, ProviderRegistry, RegistryError};
pub use sink::{ValidationErrorDetails, ValidationErrorSink};
