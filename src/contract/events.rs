//! Event extraction from confirmed receipts.
//!
//! Pure functions over receipt logs, kept separate from broadcasting so
//! they are testable against constructed logs. A confirmed transaction
//! whose defining event is missing is a distinct failure from a revert:
//! gas was spent, but no identifier can be returned to the caller.

use alloy::primitives::Address;
use alloy::rpc::types::Log;

use crate::contract::abi;
use crate::registry::id::ModelId;
use crate::registry::types::{RegistryError, RegistryResult};

/// Extract the registered model's identifier from a registration
/// receipt's logs. Logs emitted by other contracts are ignored.
pub fn registered_model_id(contract: Address, logs: &[Log]) -> RegistryResult<ModelId> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .find_map(|log| log.log_decode::<abi::ModelRegistered>().ok())
        .map(|decoded| ModelId::from(decoded.inner.modelId))
        .ok_or(RegistryError::EventNotEmitted("ModelRegistered"))
}

/// Extract the validated model's identifier from a validation receipt's
/// logs. Logs emitted by other contracts are ignored.
pub fn validated_model_id(contract: Address, logs: &[Log]) -> RegistryResult<ModelId> {
    logs.iter()
        .filter(|log| log.address() == contract)
        .find_map(|log| log.log_decode::<abi::ModelValidated>().ok())
        .map(|decoded| ModelId::from(decoded.inner.modelId))
        .ok_or(RegistryError::EventNotEmitted("ModelValidated"))
}
