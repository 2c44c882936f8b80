//! Typed binding for the deployed ModelRegistry contract.
//!
//! # Responsibilities
//! - Hold the configured contract address
//! - Decode read calls into domain records
//! - Produce unsigned write descriptors for the orchestrator
//! - Map reverts on keyed reads to `NotFound`

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::chain::client::ChainClient;
use crate::chain::orchestrator::OpKind;
use crate::contract::abi;
use crate::registry::id::ModelId;
use crate::registry::types::{ModelRecord, RegistryError, RegistryResult, ValidationRecord};

/// Calldata for a state-changing contract call, ready for the
/// transaction orchestrator to sign and broadcast.
#[derive(Debug, Clone)]
pub struct UnsignedCall {
    /// Contract address the call targets.
    pub to: Address,
    /// ABI-encoded calldata.
    pub input: Bytes,
    /// Operation kind, selects the gas ceiling.
    pub op: OpKind,
}

/// The registry contract at its deployed address.
pub struct ModelRegistry {
    address: Address,
    client: Arc<ChainClient>,
}

impl ModelRegistry {
    /// Bind the contract at `address` over an existing chain client.
    pub fn new(address: Address, client: Arc<ChainClient>) -> Self {
        Self { address, client }
    }

    /// The deployed contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Read one model record.
    pub async fn model(&self, id: ModelId) -> RegistryResult<ModelRecord> {
        let input = abi::getModelCall { modelId: id.as_b256() }.abi_encode();
        let data = match self.client.call(self.request(input)).await {
            Ok(data) => data,
            // getModel reverts for unknown identifiers
            Err(RegistryError::Reverted(_)) => {
                return Err(RegistryError::NotFound(format!("model {}", id)))
            }
            Err(e) => return Err(e),
        };

        let ret = abi::getModelCall::abi_decode_returns(&data)
            .map_err(|e| decode_error("getModel", e))?;
        Ok(ModelRecord {
            id,
            name: ret.name,
            version: ret.version,
            metadata_uri: ret.metadataURI,
            owner: ret.owner,
            registered_at: into_u64("registeredAt", ret.registeredAt)?,
            is_active: ret.isActive,
        })
    }

    /// Read a model's validation history in append order.
    pub async fn validations(&self, id: ModelId) -> RegistryResult<Vec<ValidationRecord>> {
        let input = abi::getModelValidationsCall { modelId: id.as_b256() }.abi_encode();
        let data = match self.client.call(self.request(input)).await {
            Ok(data) => data,
            Err(RegistryError::Reverted(_)) => {
                return Err(RegistryError::NotFound(format!("model {}", id)))
            }
            Err(e) => return Err(e),
        };

        let raw = abi::getModelValidationsCall::abi_decode_returns(&data)
            .map_err(|e| decode_error("getModelValidations", e))?;
        raw.into_iter()
            .map(|v| {
                Ok(ValidationRecord {
                    validator: v.validator,
                    recorded_at: into_u64("timestamp", v.timestamp)?,
                    is_valid: v.isValid,
                    comments: v.comments,
                })
            })
            .collect()
    }

    /// Number of registered models.
    pub async fn model_count(&self) -> RegistryResult<u64> {
        let input = abi::getModelCountCall {}.abi_encode();
        let data = self.client.call(self.request(input)).await?;
        let count = abi::getModelCountCall::abi_decode_returns(&data)
            .map_err(|e| decode_error("getModelCount", e))?;
        into_u64("model count", count)
    }

    /// Identifier of the n-th registered model (1-based).
    pub async fn model_id_at(&self, index: u64) -> RegistryResult<ModelId> {
        let input = abi::getModelIdAtCall { index: U256::from(index) }.abi_encode();
        let data = match self.client.call(self.request(input)).await {
            Ok(data) => data,
            Err(RegistryError::Reverted(_)) => {
                return Err(RegistryError::NotFound(format!("model at index {}", index)))
            }
            Err(e) => return Err(e),
        };
        let id = abi::getModelIdAtCall::abi_decode_returns(&data)
            .map_err(|e| decode_error("getModelIdAt", e))?;
        Ok(ModelId::from(id))
    }

    /// Unsigned calldata for `registerModel`.
    pub fn register_model_call(&self, name: &str, version: &str, metadata_uri: &str) -> UnsignedCall {
        let input = abi::registerModelCall {
            name: name.to_string(),
            version: version.to_string(),
            metadataURI: metadata_uri.to_string(),
        }
        .abi_encode();
        UnsignedCall {
            to: self.address,
            input: input.into(),
            op: OpKind::Registration,
        }
    }

    /// Unsigned calldata for `validateModel`.
    pub fn record_validation_call(&self, id: ModelId, is_valid: bool, comments: &str) -> UnsignedCall {
        let input = abi::validateModelCall {
            modelId: id.as_b256(),
            isValid: is_valid,
            comments: comments.to_string(),
        }
        .abi_encode();
        UnsignedCall {
            to: self.address,
            input: input.into(),
            op: OpKind::Validation,
        }
    }

    fn request(&self, input: Vec<u8>) -> TransactionRequest {
        TransactionRequest::default()
            .with_to(self.address)
            .with_input(input)
    }
}

fn decode_error(what: &'static str, e: alloy::sol_types::Error) -> RegistryError {
    RegistryError::Unexpected(format!("Failed to decode {} return data: {}", what, e))
}

fn into_u64(what: &'static str, value: U256) -> RegistryResult<u64> {
    u64::try_from(value)
        .map_err(|_| RegistryError::Unexpected(format!("{} {} overflows u64", what, value)))
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("address", &self.address)
            .finish()
    }
}
