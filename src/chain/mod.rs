//! Chain connection subsystem.
//!
//! # Data Flow
//! ```text
//! Write path:
//!     contract::binding (unsigned call)
//!         → orchestrator.rs (nonce + gas price → TransactionRequest)
//!         → signer.rs (request-scoped credential signs)
//!         → client.rs (eth_sendRawTransaction)
//!         → client.rs (receipt poll, bounded)
//!         → Confirmed { tx_hash, block, receipt }
//!
//! Read path:
//!     contract::binding (calldata)
//!         → client.rs (eth_call, revert decode)
//!         → ABI-decoded values
//! ```
//!
//! # Design Decisions
//! - One HTTP provider per process, shared behind Arc
//! - Every RPC wrapped in a timeout; the receipt wait has its own bound
//! - Signing keys are request-scoped and never stored

pub mod client;
pub mod orchestrator;
pub mod signer;

pub use client::ChainClient;
pub use orchestrator::{Confirmed, OpKind, TxOrchestrator};
pub use signer::Credential;
