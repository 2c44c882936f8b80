//! Model identifier parsing and rendering.
//!
//! The contract derives each identifier from `(name, version)` and hands it
//! back as a 32-byte value. Callers supply identifiers as hex strings with
//! or without a `0x` prefix and possibly shorter than 64 nibbles; short
//! input is left-padded with zeros before decoding. Rendering is always the
//! canonical 66-character `0x`-prefixed lowercase form.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::B256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::registry::types::RegistryError;

/// 32-byte identifier of a registered model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ModelId(B256);

impl ModelId {
    /// Parse a hex-string identifier.
    ///
    /// Accepts an optional `0x` prefix and up to 64 hex characters; shorter
    /// input is zero-padded on the left. Anything else fails with
    /// `InvalidIdentifier`.
    pub fn parse(input: &str) -> Result<Self, RegistryError> {
        let hex = input.strip_prefix("0x").unwrap_or(input);

        if hex.is_empty() {
            return Err(RegistryError::InvalidIdentifier(
                "identifier is empty".to_string(),
            ));
        }
        if hex.len() > 64 {
            return Err(RegistryError::InvalidIdentifier(format!(
                "identifier is {} hex characters, maximum is 64",
                hex.len()
            )));
        }
        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(RegistryError::InvalidIdentifier(format!(
                "identifier contains non-hex character {bad:?}"
            )));
        }

        let padded = format!("{hex:0>64}");
        let bytes = B256::from_str(&padded).map_err(|e| {
            RegistryError::InvalidIdentifier(format!("identifier decode failed: {e}"))
        })?;
        Ok(Self(bytes))
    }

    /// Canonical rendering: `0x` + 64 lowercase hex characters.
    pub fn to_hex(self) -> String {
        format!("0x{}", alloy::hex::encode(self.0.as_slice()))
    }

    /// The raw 32-byte value as the contract expects it.
    pub fn as_b256(self) -> B256 {
        self.0
    }
}

impl From<B256> for ModelId {
    fn from(bytes: B256) -> Self {
        Self(bytes)
    }
}

impl FromStr for ModelId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ModelId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ModelId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
