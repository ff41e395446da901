//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks against the catalog)
//!     → FailoverConfig (validated, immutable)
//!     → FailoverController::new seeds the registry from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; it seeds the session and the
//!   operator mutates the registry from there
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::FailoverConfig;
pub use schema::ProviderSeed;
