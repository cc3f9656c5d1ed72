//! Account and contract addresses: the low 20 bytes of the keccak-256 hash
//! of an uncompressed public key, same derivation the original node used
//! for wallet addresses and `create_contract_address`.

use crate::hash::hash_bytes;
use crate::signature::PublicKey;
use crate::{CryptoError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 20-byte address, displayed and serialized as `0x`-prefixed lowercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; 20]);

impl Address {
    /// The `0x0` sentinel recipient that marks a transaction as a contract
    /// deployment rather than a call.
    pub const DEPLOY_SENTINEL: Address = Address([0u8; 20]);

    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        if slice.len() != 20 {
            return Err(CryptoError::InvalidKey(format!(
                "expected 20-byte address, got {}",
                slice.len()
            )));
        }
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(slice);
        Ok(Self(bytes))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        // The deploy sentinel is conventionally written "0x0", not 40 zero
        // hex digits -- accept it explicitly rather than failing to parse.
        if trimmed == "0" {
            return Ok(Self::DEPLOY_SENTINEL);
        }
        let bytes =
            hex::decode(trimmed).map_err(|e| CryptoError::InvalidKey(format!("invalid hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    /// Derive the address controlled by a public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        let digest = hash_bytes(&public_key.to_bytes());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.as_bytes()[12..]);
        Self(bytes)
    }

    /// Derive the address a deployment transaction's contract will live at:
    /// the low 20 bytes of keccak-256 of the deploying transaction's hash
    /// *hex text*, not the hash's own bytes truncated directly -- mirrors
    /// `from_public_key` above and the original node's
    /// `create_contract_address` (`keccak256(tx.hash.encode('utf-8'))[-20:]`).
    pub fn from_tx_hash(tx_hash: &crate::hash::Hash256) -> Self {
        let digest = crate::hash::hash_text(&tx_hash.to_hex());
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest.as_bytes()[12..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_deploy_sentinel(&self) -> bool {
        *self == Self::DEPLOY_SENTINEL
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl TryFrom<String> for Address {
    type Error = CryptoError;
    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_hex()
    }
}
