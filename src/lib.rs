//! On-chain ML model registry service library.

pub mod chain;
pub mod config;
pub mod contract;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;

pub use config::RegistryConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use registry::RegistryClient;
