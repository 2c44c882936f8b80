//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, gas limits sane)
//! - Check address/URL fields actually parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: RegistryConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use alloy::primitives::Address;

use crate::config::schema::RegistryConfig;

/// A single validation failure, naming the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &RegistryConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    // Server section
    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a valid socket address", config.server.bind_address),
        ));
    }
    if !config.server.api_prefix.is_empty() {
        if !config.server.api_prefix.starts_with('/') {
            errors.push(ValidationError::new(
                "server.api_prefix",
                "must start with '/'",
            ));
        }
        if config.server.api_prefix.ends_with('/') {
            errors.push(ValidationError::new(
                "server.api_prefix",
                "must not end with '/'",
            ));
        }
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than 0",
        ));
    } else if config.server.request_timeout_secs <= config.chain.confirmation_timeout_secs {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            format!(
                "must exceed chain.confirmation_timeout_secs ({}) or write requests are cut off mid-wait",
                config.chain.confirmation_timeout_secs
            ),
        ));
    }
    if config.server.max_body_bytes == 0 {
        errors.push(ValidationError::new("server.max_body_bytes", "must be greater than 0"));
    }

    // Chain section
    match config.chain.rpc_url.parse::<url::Url>() {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("unsupported scheme '{}', expected http or https", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(
            "chain.rpc_url",
            format!("'{}' is not a valid URL: {}", config.chain.rpc_url, e),
        )),
    }
    if config.chain.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("chain.rpc_timeout_secs", "must be greater than 0"));
    }
    if config.chain.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "chain.confirmation_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.chain.confirmation_poll_ms == 0 {
        errors.push(ValidationError::new(
            "chain.confirmation_poll_ms",
            "must be greater than 0",
        ));
    }
    if !(config.chain.gas_price_multiplier.is_finite() && config.chain.gas_price_multiplier > 0.0) {
        errors.push(ValidationError::new(
            "chain.gas_price_multiplier",
            "must be a positive finite number",
        ));
    }
    if config.chain.max_gas_price_gwei == 0 {
        errors.push(ValidationError::new("chain.max_gas_price_gwei", "must be greater than 0"));
    }
    // 21000 is the intrinsic cost of any transaction
    if config.chain.registration_gas_limit < 21_000 {
        errors.push(ValidationError::new(
            "chain.registration_gas_limit",
            "must be at least 21000",
        ));
    }
    if config.chain.validation_gas_limit < 21_000 {
        errors.push(ValidationError::new(
            "chain.validation_gas_limit",
            "must be at least 21000",
        ));
    }

    // Contract section
    if let Some(addr) = &config.contract.address {
        if addr.parse::<Address>().is_err() {
            errors.push(ValidationError::new(
                "contract.address",
                format!("'{}' is not a valid contract address", addr),
            ));
        }
    }

    // Observability section
    if !LOG_LEVELS.contains(&config.observability.log_level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "'{}' is not one of trace, debug, info, warn, error",
                config.observability.log_level
            ),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a valid socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
