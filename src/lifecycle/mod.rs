//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Shutdown (shutdown.rs):
//!     Ctrl+C received → trigger() → subscribers drain → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered shutdown: stop accepting, drain in-flight requests, close
//! - In-flight transactions finish confirming before the server exits

pub mod shutdown;

pub use shutdown::Shutdown;
