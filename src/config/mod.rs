//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (REGISTRY_* env overrides)
//!     → validation.rs (semantic checks)
//!     → RegistryConfig (validated, immutable)
//!     → shared via Arc to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; changes require a restart
//! - All fields have defaults so the service runs with no file at all
//! - Env overrides cover the deploy-time knobs: RPC URL, contract
//!   address, chain ID
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::ChainConfig;
pub use schema::ContractConfig;
pub use schema::ObservabilityConfig;
pub use schema::RegistryConfig;
pub use schema::ServerConfig;
