//! Contract binding subsystem.
//!
//! # Data Flow
//! ```text
//! abi.rs (compile-time sol! interface)
//!     → binding.rs
//!         reads: eth_call → typed ModelRecord / ValidationRecord
//!         writes: UnsignedCall descriptors → chain::orchestrator
//!     → events.rs (receipt logs → ModelId, or EventNotEmitted)
//! ```
//!
//! # Design Decisions
//! - The interface is fixed and declared once; no runtime ABI loading
//! - Reverts on keyed reads become NotFound; the contract signals
//!   "Model does not exist" by reverting, not by returning empties
//! - Event extraction is pure and independent of broadcasting

pub mod abi;
pub mod binding;
pub mod events;

pub use binding::{ModelRegistry, UnsignedCall};
