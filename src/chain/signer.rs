//! Per-request signing credentials.
//!
//! # Security
//! - Private keys arrive in the request body, are parsed here, and live
//!   only for the duration of that request
//! - Keys are never logged, persisted, or exposed through Debug output
//! - Only the derived account address is ever printed

use alloy::network::{EthereumWallet, TransactionBuilder};
use alloy::primitives::Address;
use alloy::rpc::types::TransactionRequest;
use alloy::signers::local::PrivateKeySigner;

use crate::registry::types::{RegistryError, RegistryResult};

/// A transiently held signing key.
///
/// Derives the sending address and signs exactly the transactions the
/// caller authorized; dropped when the request handler returns.
pub struct Credential {
    signer: PrivateKeySigner,
}

impl Credential {
    /// Parse a hex-encoded private key (with or without 0x prefix).
    pub fn from_hex(private_key_hex: &str) -> RegistryResult<Self> {
        let key_hex = private_key_hex.strip_prefix("0x").unwrap_or(private_key_hex);

        let signer: PrivateKeySigner = key_hex.parse().map_err(|e| {
            RegistryError::InvalidCredential(format!("Invalid private key format: {}", e))
        })?;

        Ok(Self { signer })
    }

    /// The account address derived from the key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Sign a fully built transaction request into raw EIP-2718 bytes
    /// ready for `eth_sendRawTransaction`.
    pub async fn sign(&self, tx: TransactionRequest) -> RegistryResult<Vec<u8>> {
        use alloy::eips::eip2718::Encodable2718;

        let wallet = EthereumWallet::from(self.signer.clone());
        let envelope = tx
            .build(&wallet)
            .await
            .map_err(|e| RegistryError::Unexpected(format!("Failed to sign transaction: {}", e)))?;
        Ok(envelope.encoded_2718())
    }
}

// Deliberately reveals only the derived address.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("address", &self.signer.address())
            .finish_non_exhaustive()
    }
}
