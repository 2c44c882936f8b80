//! Request and response wire types.
//!
//! JSON field names are snake_case. Request types carrying a private
//! key deliberately do not derive Debug.

use serde::{Deserialize, Serialize};

use crate::registry::types::{ModelRecord, RecordedValidation, RegisteredModel, ValidationRecord};

/// Body of `POST /models`.
#[derive(Deserialize)]
pub struct RegisterModelRequest {
    pub name: String,
    pub version: String,
    pub metadata_uri: String,
    /// Signing key, used once and discarded.
    pub private_key: String,
}

/// Body of `POST /models/{id}/validations`.
#[derive(Deserialize)]
pub struct RecordValidationRequest {
    pub is_valid: bool,
    #[serde(default)]
    pub comments: String,
    /// Signing key, used once and discarded.
    pub private_key: String,
}

/// Query parameters of `GET /models`.
#[derive(Debug, Deserialize)]
pub struct ListModelsParams {
    /// Optional owner address filter.
    pub owner: Option<String>,
}

/// A model record, with transaction details on freshly registered ones.
#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model_id: String,
    pub name: String,
    pub version: String,
    pub metadata_uri: String,
    pub owner: String,
    pub registered_at: u64,
    pub is_active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl From<ModelRecord> for ModelResponse {
    fn from(record: ModelRecord) -> Self {
        Self {
            model_id: record.id.to_hex(),
            name: record.name,
            version: record.version,
            metadata_uri: record.metadata_uri,
            owner: record.owner.to_checksum(None),
            registered_at: record.registered_at,
            is_active: record.is_active,
            transaction_hash: None,
            block_number: None,
        }
    }
}

impl From<RegisteredModel> for ModelResponse {
    fn from(registered: RegisteredModel) -> Self {
        let mut response = Self::from(registered.record);
        response.transaction_hash = Some(registered.tx_hash.to_string());
        response.block_number = Some(registered.block_number);
        response
    }
}

/// One entry of a model's validation history.
#[derive(Debug, Serialize)]
pub struct ValidationResponse {
    pub validator: String,
    pub recorded_at: u64,
    pub is_valid: bool,
    pub comments: String,
}

impl From<ValidationRecord> for ValidationResponse {
    fn from(record: ValidationRecord) -> Self {
        Self {
            validator: record.validator.to_checksum(None),
            recorded_at: record.recorded_at,
            is_valid: record.is_valid,
            comments: record.comments,
        }
    }
}

/// Result summary of a validation write.
#[derive(Debug, Serialize)]
pub struct ValidationReceipt {
    pub model_id: String,
    pub transaction_hash: String,
    pub block_number: u64,
}

impl From<RecordedValidation> for ValidationReceipt {
    fn from(recorded: RecordedValidation) -> Self {
        Self {
            model_id: recorded.model_id.to_hex(),
            transaction_hash: recorded.tx_hash.to_string(),
            block_number: recorded.block_number,
        }
    }
}

/// Body of `GET {prefix}/status`.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub contract_initialized: bool,
    pub chain_connected: bool,
}

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::id::ModelId;
    use alloy::primitives::{address, TxHash};

    fn record() -> ModelRecord {
        ModelRecord {
            id: ModelId::parse("0xabc123").unwrap(),
            name: "ResNet50".to_string(),
            version: "1.0.0".to_string(),
            metadata_uri: "ipfs://Qm123".to_string(),
            owner: address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            registered_at: 1_700_000_000,
            is_active: true,
        }
    }

    #[test]
    fn test_plain_record_omits_transaction_fields() {
        let json = serde_json::to_value(ModelResponse::from(record())).unwrap();
        assert_eq!(json["model_id"].as_str().unwrap().len(), 66);
        assert_eq!(json["owner"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert!(json.get("transaction_hash").is_none());
        assert!(json.get("block_number").is_none());
    }

    #[test]
    fn test_registered_model_carries_transaction_fields() {
        let registered = RegisteredModel {
            record: record(),
            tx_hash: TxHash::repeat_byte(0xaa),
            block_number: 12,
        };
        let json = serde_json::to_value(ModelResponse::from(registered)).unwrap();
        assert_eq!(json["transaction_hash"].as_str().unwrap().len(), 66);
        assert_eq!(json["block_number"], 12);
    }
}
