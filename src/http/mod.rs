//! HTTP API subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → handlers.rs (decode payload, invoke registry operation)
//!     → types.rs (shape domain result into wire response)
//!     → error.rs (map RegistryError to status + JSON body on failure)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod server;
pub mod types;

pub use server::{AppState, HttpServer};
