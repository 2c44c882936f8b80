//! Registry domain subsystem.
//!
//! # Data Flow
//! ```text
//! http handlers
//!     → client.rs (RegistryClient facade)
//!         writes → chain::orchestrator → contract events → ModelId
//!         reads  → contract::binding → ModelRecord / ValidationRecord
//!     → id.rs (hex ↔ 32-byte identifier codec)
//!     → types.rs (domain records, RegistryError taxonomy)
//! ```

pub mod client;
pub mod id;
pub mod types;

pub use client::RegistryClient;
pub use id::ModelId;
pub use types::{
    ModelRecord, RecordedValidation, RegisteredModel, RegistryError, RegistryResult,
    ValidationRecord,
};
