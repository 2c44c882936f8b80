//! Chain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint
//! - Query chain state (block number, gas price, nonces, receipts)
//! - Submit raw signed transactions
//! - Decode revert reasons out of failed `eth_call`s
//! - Handle timeouts and network errors gracefully
//! - Provide a connectivity probe for the status endpoint

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::{Revert, SolError};
use alloy::transports::TransportError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::config::ChainConfig;
use crate::observability::metrics;
use crate::registry::types::{RegistryError, RegistryResult};

/// Chain RPC client wrapper.
///
/// Every RPC is bounded by `rpc_timeout_secs`; the receipt wait in
/// [`ChainClient::await_receipt`] is additionally bounded by
/// `confirmation_timeout_secs`. Safe for concurrent use behind `Arc`.
#[derive(Clone)]
pub struct ChainClient {
    /// Underlying HTTP provider.
    provider: Arc<dyn Provider + Send + Sync>,
    /// Configuration.
    config: ChainConfig,
    /// Per-request timeout duration.
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a new chain client.
    ///
    /// Does not touch the network; chain verification happens separately
    /// so an unreachable node degrades the service instead of killing it.
    pub fn new(config: ChainConfig) -> RegistryResult<Self> {
        let url: url::Url = config.rpc_url.parse().map_err(|e| {
            RegistryError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        let provider =
            Arc::new(ProviderBuilder::new().connect_http(url)) as Arc<dyn Provider + Send + Sync>;

        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        Ok(Self {
            provider,
            config,
            timeout_duration,
        })
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> RegistryResult<()> {
        let actual = self.chain_id().await?;
        if actual != self.config.chain_id {
            return Err(RegistryError::ChainMismatch {
                expected: self.config.chain_id,
                actual,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn chain_id(&self) -> RegistryResult<u64> {
        match timeout(self.timeout_duration, self.provider.get_chain_id()).await {
            Ok(Ok(id)) => Ok(id),
            Ok(Err(e)) => Err(RegistryError::Rpc(format!("eth_chainId failed: {}", e))),
            Err(_) => Err(self.rpc_timeout("eth_chainId")),
        }
    }

    /// Get the latest block number.
    pub async fn block_number(&self) -> RegistryResult<u64> {
        match timeout(self.timeout_duration, self.provider.get_block_number()).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(RegistryError::Rpc(format!("eth_blockNumber failed: {}", e))),
            Err(_) => Err(self.rpc_timeout("eth_blockNumber")),
        }
    }

    /// Get the current gas price in wei.
    pub async fn gas_price(&self) -> RegistryResult<u128> {
        match timeout(self.timeout_duration, self.provider.get_gas_price()).await {
            Ok(Ok(price)) => Ok(price),
            Ok(Err(e)) => Err(RegistryError::Rpc(format!("eth_gasPrice failed: {}", e))),
            Err(_) => Err(self.rpc_timeout("eth_gasPrice")),
        }
    }

    /// Get the next nonce for an address, counting pending transactions.
    ///
    /// Inherently racy when several writes from the same account are in
    /// flight; the chain resolves the race and the loser reverts.
    pub async fn pending_nonce(&self, address: Address) -> RegistryResult<u64> {
        let fut = self.provider.get_transaction_count(address).pending();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(nonce)) => Ok(nonce),
            Ok(Err(e)) => Err(RegistryError::Rpc(format!(
                "eth_getTransactionCount failed: {}",
                e
            ))),
            Err(_) => Err(self.rpc_timeout("eth_getTransactionCount")),
        }
    }

    /// Execute a read-only contract call.
    ///
    /// A revert is decoded into [`RegistryError::Reverted`] with the
    /// ABI-encoded reason when the node supplies one.
    pub async fn call(&self, tx: TransactionRequest) -> RegistryResult<Bytes> {
        match timeout(self.timeout_duration, self.provider.call(tx)).await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(e)) => Err(decode_call_error(e)),
            Err(_) => Err(self.rpc_timeout("eth_call")),
        }
    }

    /// Broadcast a raw signed transaction, returning its hash immediately.
    ///
    /// Does not wait for the transaction to be mined.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> RegistryResult<TxHash> {
        let fut = self.provider.send_raw_transaction(raw);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(decode_call_error(e)),
            Err(_) => Err(self.rpc_timeout("eth_sendRawTransaction")),
        }
    }

    /// Get a transaction receipt by hash, `None` while still pending.
    pub async fn get_receipt(&self, tx_hash: TxHash) -> RegistryResult<Option<TransactionReceipt>> {
        let fut = self.provider.get_transaction_receipt(tx_hash);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(receipt)) => Ok(receipt),
            Ok(Err(e)) => Err(RegistryError::Rpc(format!(
                "eth_getTransactionReceipt failed: {}",
                e
            ))),
            Err(_) => Err(self.rpc_timeout("eth_getTransactionReceipt")),
        }
    }

    /// Block until a receipt for `tx_hash` is available.
    ///
    /// Polls every `confirmation_poll_ms`, bounded by
    /// `confirmation_timeout_secs`. A receipt with failure status maps to
    /// `Reverted`; mined receipts carry no revert reason, so the message
    /// is generic. Expiry maps to `Timeout`, leaving the outcome
    /// ambiguous for the caller to resolve.
    pub async fn await_receipt(&self, tx_hash: TxHash) -> RegistryResult<TransactionReceipt> {
        let wait = Duration::from_secs(self.config.confirmation_timeout_secs);
        let poll = Duration::from_millis(self.config.confirmation_poll_ms);

        let result = timeout(wait, async {
            let mut ticker = interval(poll);
            loop {
                ticker.tick().await;

                let receipt = match self.get_receipt(tx_hash).await? {
                    Some(r) => r,
                    None => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(RegistryError::Reverted(
                        "transaction failed on-chain (status 0)".to_string(),
                    ));
                }
                return Ok(receipt);
            }
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => Err(RegistryError::Timeout(self.config.confirmation_timeout_secs)),
        }
    }

    /// Check whether the chain endpoint is reachable.
    ///
    /// Returns true if we can query the block number. Never errors.
    pub async fn is_connected(&self) -> bool {
        let connected = self.block_number().await.is_ok();
        metrics::record_chain_connectivity(connected);
        connected
    }

    /// Get the configuration.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    fn rpc_timeout(&self, method: &str) -> RegistryError {
        RegistryError::Rpc(format!(
            "{} timed out after {} seconds",
            method, self.config.rpc_timeout_secs
        ))
    }
}

/// Map a transport error from `eth_call`/`eth_sendRawTransaction`,
/// extracting an ABI-encoded revert reason when present.
fn decode_call_error(err: TransportError) -> RegistryError {
    if let Some(payload) = err.as_error_resp() {
        if let Some(data) = payload.as_revert_data() {
            if let Ok(revert) = Revert::abi_decode(&data) {
                return RegistryError::Reverted(revert.reason);
            }
        }
        if payload.message.contains("execution reverted") {
            return RegistryError::Reverted(payload.message.to_string());
        }
    }
    RegistryError::Rpc(err.to_string())
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
