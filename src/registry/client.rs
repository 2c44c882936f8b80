//! Public registry client facade.
//!
//! # Responsibilities
//! - Compose chain client, contract binding, and orchestrator
//! - Fail fast with `ContractNotConfigured` when no address is set
//! - Tie write confirmations back to identifiers via receipt events
//! - Expose connectivity/initialization state for the status endpoint

use alloy::primitives::Address;
use std::sync::Arc;

use crate::chain::client::ChainClient;
use crate::chain::orchestrator::TxOrchestrator;
use crate::chain::signer::Credential;
use crate::config::RegistryConfig;
use crate::contract::binding::ModelRegistry;
use crate::contract::events;
use crate::registry::id::ModelId;
use crate::registry::types::{
    ModelRecord, RecordedValidation, RegisteredModel, RegistryError, RegistryResult,
    ValidationRecord,
};

/// The public-facing registry interface.
///
/// Constructed once at startup and shared behind `Arc` across request
/// handlers. Holds no mutable state; all durable state lives on-chain.
pub struct RegistryClient {
    chain: Arc<ChainClient>,
    contract: Option<ModelRegistry>,
    orchestrator: TxOrchestrator,
}

impl RegistryClient {
    /// Build the client from validated configuration.
    ///
    /// A missing contract address is not an error: the service starts
    /// degraded, serving health/status while registry operations fail
    /// fast. Likewise an unreachable or mismatched chain only logs a
    /// warning so operators can fix the endpoint without a crash loop.
    pub async fn connect(config: &RegistryConfig) -> RegistryResult<Self> {
        let chain = Arc::new(ChainClient::new(config.chain.clone())?);

        let contract = match &config.contract.address {
            Some(raw) => {
                let address: Address = raw.parse().map_err(|e| {
                    RegistryError::InvalidAddress(format!("contract address '{}': {}", raw, e))
                })?;
                tracing::info!(address = %address, "Registry contract bound");
                Some(ModelRegistry::new(address, chain.clone()))
            }
            None => {
                tracing::warn!(
                    "No contract address configured; registry operations disabled until one is set"
                );
                None
            }
        };

        let client = Self {
            orchestrator: TxOrchestrator::new(chain.clone()),
            chain,
            contract,
        };

        match client.verify_chain().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %client.chain.config().rpc_url,
                    chain_id = client.chain.config().chain_id,
                    "Chain connection verified"
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, "Chain verification failed; continuing");
            }
        }

        Ok(client)
    }

    /// Register a model and read the resulting record back.
    ///
    /// The identifier comes from the `ModelRegistered` event in the
    /// confirmed receipt; a duplicate `(name, version)` surfaces as
    /// `Reverted` since the contract rejects the resubmission.
    pub async fn register_model(
        &self,
        name: &str,
        version: &str,
        metadata_uri: &str,
        credential: &Credential,
    ) -> RegistryResult<RegisteredModel> {
        let contract = self.contract()?;
        let call = contract.register_model_call(name, version, metadata_uri);
        let confirmed = self.orchestrator.execute(call, credential).await?;

        let id = events::registered_model_id(contract.address(), confirmed.receipt.inner.logs())?;
        let record = contract.model(id).await?;
        tracing::info!(
            model_id = %id,
            name = name,
            version = version,
            owner = %record.owner,
            tx_hash = %confirmed.tx_hash,
            "Model registered"
        );

        Ok(RegisteredModel {
            record,
            tx_hash: confirmed.tx_hash,
            block_number: confirmed.block_number,
        })
    }

    /// Fetch one model by identifier.
    pub async fn model(&self, id: ModelId) -> RegistryResult<ModelRecord> {
        self.contract()?.model(id).await
    }

    /// List registered models in registration order.
    ///
    /// Individually unreadable entries are skipped and logged rather
    /// than failing the whole listing. The optional owner filter is
    /// applied off-chain.
    pub async fn list_models(&self, owner: Option<Address>) -> RegistryResult<Vec<ModelRecord>> {
        let contract = self.contract()?;
        let count = contract.model_count().await?;

        // The count is node-reported; cap what it may pre-allocate and
        // let push grow the rest.
        let mut records = Vec::with_capacity(count.min(64) as usize);
        for index in 1..=count {
            let read = match contract.model_id_at(index).await {
                Ok(id) => contract.model(id).await,
                Err(e) => Err(e),
            };
            match read {
                Ok(record) => {
                    if owner.map_or(true, |o| record.owner == o) {
                        records.push(record);
                    }
                }
                Err(e) => {
                    tracing::warn!(index = index, error = %e, "Skipping unreadable model in listing");
                }
            }
        }
        Ok(records)
    }

    /// Append a validation to a model's history.
    pub async fn record_validation(
        &self,
        id: ModelId,
        is_valid: bool,
        comments: &str,
        credential: &Credential,
    ) -> RegistryResult<RecordedValidation> {
        let contract = self.contract()?;
        let call = contract.record_validation_call(id, is_valid, comments);
        let confirmed = self.orchestrator.execute(call, credential).await?;

        let model_id =
            events::validated_model_id(contract.address(), confirmed.receipt.inner.logs())?;
        tracing::info!(
            model_id = %model_id,
            validator = %credential.address(),
            is_valid = is_valid,
            tx_hash = %confirmed.tx_hash,
            "Validation recorded"
        );

        Ok(RecordedValidation {
            model_id,
            tx_hash: confirmed.tx_hash,
            block_number: confirmed.block_number,
        })
    }

    /// Fetch a model's validation history in append order.
    pub async fn validation_history(&self, id: ModelId) -> RegistryResult<Vec<ValidationRecord>> {
        self.contract()?.validations(id).await
    }

    /// Whether a usable contract binding exists.
    pub fn is_contract_initialized(&self) -> bool {
        self.contract.is_some()
    }

    /// Probe the chain endpoint. Never errors.
    pub async fn is_chain_connected(&self) -> bool {
        self.chain.is_connected().await
    }

    /// Check the connected chain ID against configuration.
    pub async fn verify_chain(&self) -> RegistryResult<()> {
        self.chain.verify_chain_id().await
    }

    fn contract(&self) -> RegistryResult<&ModelRegistry> {
        self.contract.as_ref().ok_or(RegistryError::ContractNotConfigured)
    }
}

impl std::fmt::Debug for RegistryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryClient")
            .field("chain", &self.chain)
            .field("contract", &self.contract)
            .finish()
    }
}
