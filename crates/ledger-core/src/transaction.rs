use crate::canonical::{canonical_json, length_prefixed};
use crate::error::{BlockchainError, Result};
use crate::types::{Amount, Nonce, Timestamp, DEPLOY_SENTINEL};
use ledger_crypto::{hash_text, signature, Hash256, Keypair};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An account-model transaction. `sender` is the signer's public key hex;
/// `recipient` is an address hex, or the [`DEPLOY_SENTINEL`] `"0x0"` for a
/// contract deployment. `data` carries a bare code name (deploy) or a
/// `{method, params}` object (call) — see `ledger_contracts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub nonce: Nonce,
    #[serde(rename = "from")]
    pub sender: String,
    #[serde(rename = "to")]
    pub recipient: String,
    pub amount: Amount,
    pub data: Value,
    pub timestamp: Timestamp,
    pub signature: String,
    pub hash: String,
}

impl Transaction {
    /// Build an unsigned transaction with its hash already computed (the
    /// hash covers the signature field, which is the empty string here).
    pub fn new_unsigned(
        nonce: Nonce,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: Amount,
        data: Value,
        timestamp: Timestamp,
    ) -> Self {
        let mut tx = Self {
            nonce,
            sender: sender.into(),
            recipient: recipient.into(),
            amount,
            data,
            timestamp,
            signature: String::new(),
            hash: String::new(),
        };
        tx.hash = tx.compute_hash().to_hex();
        tx
    }

    pub fn is_deploy(&self) -> bool {
        self.recipient == DEPLOY_SENTINEL
    }

    fn canonical_fields(&self) -> Vec<Vec<u8>> {
        vec![
            self.nonce.to_be_bytes().to_vec(),
            self.sender.as_bytes().to_vec(),
            self.recipient.as_bytes().to_vec(),
            self.amount.to_be_bytes().to_vec(),
            canonical_json(&self.data).into_bytes(),
            self.timestamp.to_be_bytes().to_vec(),
        ]
    }

    /// The digest signed by the sender: canonical encoding excluding
    /// `signature` and `hash`.
    pub fn signing_digest(&self) -> Hash256 {
        let fields = self.canonical_fields();
        let refs: Vec<&[u8]> = fields.iter().map(|f| f.as_slice()).collect();
        let payload = length_prefixed(&refs);
        hash_text(&hex::encode(payload))
    }

    /// The transaction hash: canonical encoding including `signature`
    /// (empty string if unsigned).
    pub fn compute_hash(&self) -> Hash256 {
        let mut fields = self.canonical_fields();
        fields.push(self.signature.as_bytes().to_vec());
        let refs: Vec<&[u8]> = fields.iter().map(|f| f.as_slice()).collect();
        let payload = length_prefixed(&refs);
        hash_text(&hex::encode(payload))
    }

    pub fn sign(&mut self, keypair: &Keypair) {
        let digest = self.signing_digest();
        self.signature = keypair.sign(&digest).to_hex();
        self.hash = self.compute_hash().to_hex();
    }

    /// Verify the signature against the sender's declared public key.
    pub fn verify_signature(&self) -> Result<bool> {
        let digest = self.signing_digest();
        Ok(signature::verify_hex(&self.sender, &digest, &self.signature)?)
    }

    /// Structural validation: hash matches content, signature is well-formed
    /// hex, recipient/sender are non-empty.
    pub fn validate_structure(&self) -> Result<()> {
        if self.sender.is_empty() {
            return Err(BlockchainError::MalformedTransaction(
                "sender must not be empty".into(),
            ));
        }
        if self.recipient.is_empty() {
            return Err(BlockchainError::MalformedTransaction(
                "recipient must not be empty".into(),
            ));
        }
        if self.compute_hash().to_hex() != self.hash {
            return Err(BlockchainError::MalformedTransaction(
                "hash does not match transaction content".into(),
            ));
        }
        Ok(())
    }
}
