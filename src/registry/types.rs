//! Registry domain types and error definitions.

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

use crate::registry::id::ModelId;

/// A model as recorded on-chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRecord {
    /// Content-derived identifier assigned by the contract.
    pub id: ModelId,
    /// Human-readable model name.
    pub name: String,
    /// Version string; `(name, version)` determines the identifier.
    pub version: String,
    /// URI pointing at model artifacts/metadata (e.g. ipfs://...).
    pub metadata_uri: String,
    /// Account that registered the model.
    pub owner: Address,
    /// Block timestamp of the registration.
    pub registered_at: u64,
    /// Governance flag maintained by the contract; read-only here.
    pub is_active: bool,
}

/// One validation appended to a model's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRecord {
    /// Account that recorded the validation.
    pub validator: Address,
    /// Block timestamp of the validation.
    pub recorded_at: u64,
    /// Verdict.
    pub is_valid: bool,
    /// Free-form validator comments.
    pub comments: String,
}

/// Result of a successful registration write.
#[derive(Debug, Clone)]
pub struct RegisteredModel {
    /// The record read back from the contract after confirmation.
    pub record: ModelRecord,
    /// Hash of the confirmed registration transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was mined in.
    pub block_number: u64,
}

/// Result of a successful validation write.
#[derive(Debug, Clone)]
pub struct RecordedValidation {
    /// Model the validation was appended to.
    pub model_id: ModelId,
    /// Hash of the confirmed validation transaction.
    pub tx_hash: TxHash,
    /// Block the transaction was mined in.
    pub block_number: u64,
}

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No contract address configured; write and read paths are disabled.
    #[error("Contract not configured: set REGISTRY_CONTRACT_ADDRESS or contract.address")]
    ContractNotConfigured,

    /// Caller supplied a malformed model identifier.
    #[error("Invalid model identifier: {0}")]
    InvalidIdentifier(String),

    /// Caller supplied a malformed account address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Caller supplied an unusable signing credential.
    #[error("Invalid signing credential: {0}")]
    InvalidCredential(String),

    /// Read miss: the contract has no record under the given key.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Transaction was rejected on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Confirmation was not observed within the configured bound.
    /// The outcome is ambiguous; the transaction may still be mined.
    #[error("Transaction not confirmed after {0} seconds")]
    Timeout(u64),

    /// The transaction succeeded but its defining event was missing,
    /// so the resulting identifier could not be extracted.
    #[error("Transaction confirmed but {0} event was not emitted")]
    EventNotEmitted(&'static str),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// Anything that does not fit the taxonomy above.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl RegistryError {
    /// Stable machine-readable kind, used in error bodies and metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ContractNotConfigured => "contract_not_configured",
            Self::InvalidIdentifier(_) => "invalid_identifier",
            Self::InvalidAddress(_) => "invalid_address",
            Self::InvalidCredential(_) => "invalid_credential",
            Self::NotFound(_) => "not_found",
            Self::Reverted(_) => "transaction_reverted",
            Self::Timeout(_) => "transaction_timeout",
            Self::EventNotEmitted(_) => "event_not_emitted",
            Self::GasPriceTooHigh { .. } => "gas_price_too_high",
            Self::ChainMismatch { .. } => "chain_mismatch",
            Self::Rpc(_) => "rpc_error",
            Self::Unexpected(_) => "unexpected",
        }
    }
}

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
