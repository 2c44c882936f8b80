//! Transaction lifecycle orchestration.
//!
//! # Responsibilities
//! - Build unsigned transactions (nonce, gas price, per-operation gas ceiling)
//! - Sign with the caller's request-scoped credential
//! - Broadcast and obtain the transaction hash without blocking
//! - Await confirmation within the configured bound
//!
//! # Design Decisions
//! - No automatic retries: a timed-out or reverted transaction is
//!   reported to the caller, who owns the resubmission decision
//! - Nonces come from the node's pending count per request; concurrent
//!   writes from one account can race and the chain picks the winner
//! - Gas limits are fixed ceilings per operation kind, not estimates

use alloy::network::TransactionBuilder;
use alloy::primitives::TxHash;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::sync::Arc;
use std::time::Instant;

use crate::chain::client::ChainClient;
use crate::chain::signer::Credential;
use crate::config::ChainConfig;
use crate::contract::binding::UnsignedCall;
use crate::observability::metrics;
use crate::registry::types::{RegistryError, RegistryResult};

/// The two state-changing operations the registry contract exposes.
///
/// They differ materially in on-chain cost, so each carries its own
/// gas limit ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Registration,
    Validation,
}

impl OpKind {
    /// Gas limit ceiling for this operation kind.
    pub fn gas_limit(self, config: &ChainConfig) -> u64 {
        match self {
            OpKind::Registration => config.registration_gas_limit,
            OpKind::Validation => config.validation_gas_limit,
        }
    }

    /// Label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Registration => "registration",
            OpKind::Validation => "validation",
        }
    }
}

/// A write that made it on-chain with success status.
#[derive(Debug, Clone)]
pub struct Confirmed {
    /// Hash of the mined transaction.
    pub tx_hash: TxHash,
    /// Block it was mined in.
    pub block_number: u64,
    /// The full receipt, for event extraction.
    pub receipt: TransactionReceipt,
}

/// Drives a write operation through build → sign → broadcast → confirm.
pub struct TxOrchestrator {
    client: Arc<ChainClient>,
}

impl TxOrchestrator {
    /// Create a new orchestrator over a shared chain client.
    pub fn new(client: Arc<ChainClient>) -> Self {
        Self { client }
    }

    /// Execute an unsigned contract call as a signed transaction and
    /// wait for it to be mined.
    ///
    /// The credential is only used for the sign step and is never
    /// retained. Errors carry the phase they arose in: gas guard,
    /// broadcast, revert, or confirmation timeout. Every attempt lands
    /// in the transaction outcome counter exactly once, whichever
    /// phase it ends in.
    pub async fn execute(
        &self,
        call: UnsignedCall,
        credential: &Credential,
    ) -> RegistryResult<Confirmed> {
        let op = call.op;
        let result = self.submit(call, credential).await;
        match &result {
            Ok(_) => metrics::record_transaction(op.as_str(), "confirmed"),
            Err(e) => metrics::record_transaction(op.as_str(), e.kind()),
        }
        result
    }

    /// The lifecycle proper: build → sign → broadcast → confirm.
    async fn submit(
        &self,
        call: UnsignedCall,
        credential: &Credential,
    ) -> RegistryResult<Confirmed> {
        let config = self.client.config();
        let op = call.op;
        let sender = credential.address();

        // Build
        let nonce = self.client.pending_nonce(sender).await?;
        let quoted_gas_price = self.client.gas_price().await?;
        let gas_price = adjust_gas_price(quoted_gas_price, config)?;
        let gas_limit = op.gas_limit(config);

        let tx = TransactionRequest::default()
            .with_from(sender)
            .with_to(call.to)
            .with_input(call.input)
            .with_nonce(nonce)
            .with_gas_price(gas_price)
            .with_gas_limit(gas_limit)
            .with_chain_id(config.chain_id);

        // Sign; the raw bytes are all that leaves this function
        let raw = credential.sign(tx).await?;

        // Broadcast returns the hash without waiting for mining
        let tx_hash = self.client.send_raw_transaction(&raw).await?;
        tracing::info!(
            tx_hash = %tx_hash,
            op = op.as_str(),
            from = %sender,
            nonce = nonce,
            gas_price = gas_price,
            "Transaction broadcast"
        );

        // Confirm
        let started = Instant::now();
        let receipt = match self.client.await_receipt(tx_hash).await {
            Ok(receipt) => receipt,
            Err(e) => {
                tracing::warn!(
                    tx_hash = %tx_hash,
                    op = op.as_str(),
                    error = %e,
                    "Transaction did not confirm"
                );
                return Err(e);
            }
        };

        let block_number = receipt.block_number.unwrap_or_default();
        metrics::record_confirmation_time(op.as_str(), started.elapsed());
        tracing::info!(
            tx_hash = %tx_hash,
            op = op.as_str(),
            block_number = block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );

        Ok(Confirmed {
            tx_hash,
            block_number,
            receipt,
        })
    }
}

/// Apply the configured multiplier to a quoted gas price and enforce
/// the spike ceiling.
pub fn adjust_gas_price(quoted: u128, config: &ChainConfig) -> RegistryResult<u128> {
    let adjusted = (quoted as f64 * config.gas_price_multiplier) as u128;
    let adjusted_gwei = adjusted / 1_000_000_000;
    if adjusted_gwei > config.max_gas_price_gwei as u128 {
        return Err(RegistryError::GasPriceTooHigh {
            current_gwei: adjusted_gwei as u64,
            max_gwei: config.max_gas_price_gwei,
        });
    }
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_gas_price_applies_multiplier() {
        let config = ChainConfig {
            gas_price_multiplier: 1.5,
            max_gas_price_gwei: 500,
            ..ChainConfig::default()
        };
        // 10 gwei quoted -> 15 gwei adjusted
        let adjusted = adjust_gas_price(10_000_000_000, &config).unwrap();
        assert_eq!(adjusted, 15_000_000_000);
    }

    #[test]
    fn test_adjust_gas_price_identity_at_one() {
        let config = ChainConfig::default();
        assert_eq!(adjust_gas_price(2_000_000_000, &config).unwrap(), 2_000_000_000);
    }

    #[test]
    fn test_gas_price_cap_enforced() {
        let config = ChainConfig {
            gas_price_multiplier: 2.0,
            max_gas_price_gwei: 500,
            ..ChainConfig::default()
        };
        // 300 gwei quoted -> 600 gwei adjusted, over the 500 cap
        let err = adjust_gas_price(300_000_000_000, &config).unwrap_err();
        match err {
            RegistryError::GasPriceTooHigh { current_gwei, max_gwei } => {
                assert_eq!(current_gwei, 600);
                assert_eq!(max_gwei, 500);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_gas_limits_per_operation() {
        let config = ChainConfig::default();
        assert_eq!(OpKind::Registration.gas_limit(&config), 2_000_000);
        assert_eq!(OpKind::Validation.gas_limit(&config), 500_000);
        assert_eq!(OpKind::Registration.as_str(), "registration");
        assert_eq!(OpKind::Validation.as_str(), "validation");
    }
}
