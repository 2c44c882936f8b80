//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! registry service. All types derive Serde traits for deserialization
//! from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the model registry service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// HTTP server settings (bind address, prefix, timeouts).
    pub server: ServerConfig,

    /// Chain connection settings.
    pub chain: ChainConfig,

    /// Registry contract settings.
    pub contract: ContractConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,

    /// Path prefix for registry routes (e.g., "/api/v1").
    pub api_prefix: String,

    /// Request timeout in seconds. Must exceed the confirmation
    /// timeout or write requests are cut off mid-wait.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
            api_prefix: "/api/v1".to_string(),
            request_timeout_secs: 180,
            max_body_bytes: 1024 * 1024, // 1MB, bodies here are small JSON
        }
    }
}

/// Chain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID (e.g., 1 for Ethereum mainnet, 31337 for local Anvil).
    pub chain_id: u64,

    /// Per-request RPC timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a transaction receipt in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub confirmation_poll_ms: u64,

    /// Gas price multiplier (1.0 = quoted, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Maximum gas price in gwei (protection against spikes).
    pub max_gas_price_gwei: u64,

    /// Gas limit ceiling for registration transactions.
    pub registration_gas_limit: u64,

    /// Gas limit ceiling for validation transactions.
    pub validation_gas_limit: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            confirmation_poll_ms: 2000,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: 500,
            registration_gas_limit: 2_000_000,
            validation_gas_limit: 500_000,
        }
    }
}

/// Registry contract configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ContractConfig {
    /// Deployed contract address. When absent the service starts in
    /// degraded mode: health and status work, registry operations
    /// return `ContractNotConfigured`.
    pub address: Option<String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
