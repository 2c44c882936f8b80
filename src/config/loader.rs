//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::RegistryConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `chain.rpc_url`.
pub const ENV_RPC_URL: &str = "REGISTRY_RPC_URL";
/// Environment variable overriding `contract.address`.
pub const ENV_CONTRACT_ADDRESS: &str = "REGISTRY_CONTRACT_ADDRESS";
/// Environment variable overriding `chain.chain_id`.
pub const ENV_CHAIN_ID: &str = "REGISTRY_CHAIN_ID";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env(String),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env(e) => write!(f, "Environment error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from a TOML file, apply environment overrides,
/// and validate the result.
pub fn load_config(path: &Path) -> Result<RegistryConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: RegistryConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults plus environment overrides.
///
/// Used when no config file is given; the original deployment ran on
/// environment variables alone.
pub fn config_from_env() -> Result<RegistryConfig, ConfigError> {
    let mut config = RegistryConfig::default();
    apply_env_overrides(&mut config)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `REGISTRY_*` environment overrides onto a parsed config.
///
/// An empty value is treated as unset.
fn apply_env_overrides(config: &mut RegistryConfig) -> Result<(), ConfigError> {
    if let Some(url) = non_empty_env(ENV_RPC_URL) {
        config.chain.rpc_url = url;
    }
    if let Some(address) = non_empty_env(ENV_CONTRACT_ADDRESS) {
        config.contract.address = Some(address);
    }
    if let Some(chain_id) = non_empty_env(ENV_CHAIN_ID) {
        config.chain.chain_id = chain_id.parse().map_err(|_| {
            ConfigError::Env(format!("{} must be an integer, got '{}'", ENV_CHAIN_ID, chain_id))
        })?;
    }
    Ok(())
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
