use crate::hash::Hash256;
use crate::{CryptoError, Result};
use secp256k1::ecdsa;
use secp256k1::rand::rngs::OsRng;
use secp256k1::{Message, Secp256k1, SecretKey};
use std::fmt;

/// SECP256k1 public key, stored and displayed in uncompressed hex form —
/// the format `sender`/contract addresses derive from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicKey(secp256k1::PublicKey);

impl PublicKey {
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
            .map_err(|e| CryptoError::InvalidKey(format!("invalid hex: {e}")))?;
        let inner = secp256k1::PublicKey::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self(inner))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.serialize_uncompressed())
    }

    pub fn to_bytes(&self) -> [u8; 65] {
        self.0.serialize_uncompressed()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A SECP256k1 ECDSA signature over a 32-byte digest, stored as compact hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(ecdsa::Signature);

impl Signature {
    pub fn from_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
            .map_err(|e| CryptoError::InvalidSignature(format!("invalid hex: {e}")))?;
        let inner = ecdsa::Signature::from_compact(&bytes)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok(Self(inner))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0.serialize_compact())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// A SECP256k1 keypair used by clients and validators to sign transactions
/// and (per spec.md §9's open question) eventually consensus votes.
#[derive(Clone)]
pub struct Keypair {
    secret: SecretKey,
    public: PublicKey,
}

impl Keypair {
    pub fn generate() -> Self {
        let secp = Secp256k1::new();
        let secret = SecretKey::new(&mut OsRng);
        let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);
        Self {
            secret,
            public: PublicKey(public),
        }
    }

    pub fn from_secret_hex(hex_str: &str) -> Result<Self> {
        let bytes = hex::decode(hex_str.strip_prefix("0x").unwrap_or(hex_str))
            .map_err(|e| CryptoError::InvalidKey(format!("invalid hex: {e}")))?;
        let secret = SecretKey::from_slice(&bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let secp = Secp256k1::new();
        let public = secp256k1::PublicKey::from_secret_key(&secp, &secret);
        Ok(Self {
            secret,
            public: PublicKey(public),
        })
    }

    pub fn public_key(&self) -> PublicKey {
        self.public
    }

    pub fn secret_hex(&self) -> String {
        hex::encode(self.secret.secret_bytes())
    }

    /// Sign a pre-hashed 32-byte digest (the transaction's signing digest).
    pub fn sign(&self, digest: &Hash256) -> Signature {
        let secp = Secp256k1::new();
        let message = Message::from_digest(*digest.as_bytes());
        Signature(secp.sign_ecdsa(&message, &self.secret))
    }
}

/// Verify a signature over a digest against a public key, all in hex form —
/// the shape the mempool needs (sender/signature arrive as hex strings).
pub fn verify_hex(public_key_hex: &str, digest: &Hash256, signature_hex: &str) -> Result<bool> {
    let public_key = PublicKey::from_hex(public_key_hex)?;
    let signature = Signature::from_hex(signature_hex)?;
    Ok(verify(&public_key, digest, &signature))
}

pub fn verify(public_key: &PublicKey, digest: &Hash256, signature: &Signature) -> bool {
    let secp = Secp256k1::new();
    let message = Message::from_digest(*digest.as_bytes());
    secp.verify_ecdsa(&message, &signature.0, &public_key.0).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;

    #[test]
    fn sign_and_verify_roundtrip() {
        let keypair = Keypair::generate();
        let digest = hash_bytes(b"payload");
        let signature = keypair.sign(&digest);
        assert!(verify(&keypair.public_key(), &digest, &signature));
    }

    #[test]
    fn verify_fails_for_wrong_digest() {
        let keypair = Keypair::generate();
        let signature = keypair.sign(&hash_bytes(b"payload"));
        assert!(!verify(&keypair.public_key(), &hash_bytes(b"other"), &signature));
    }

    #[test]
    fn hex_roundtrip_for_keys_and_signatures() {
        let keypair = Keypair::generate();
        let digest = hash_bytes(b"payload");
        let signature = keypair.sign(&digest);

        let pk2 = PublicKey::from_hex(&keypair.public_key().to_hex()).unwrap();
        let sig2 = Signature::from_hex(&signature.to_hex()).unwrap();
        assert!(verify(&pk2, &digest, &sig2));

        assert!(verify_hex(&keypair.public_key().to_hex(), &digest, &signature.to_hex()).unwrap());
    }

    #[test]
    fn secret_hex_roundtrip_preserves_keypair() {
        let keypair = Keypair::generate();
        let restored = Keypair::from_secret_hex(&keypair.secret_hex()).unwrap();
        assert_eq!(keypair.public_key(), restored.public_key());
    }
}
