//! Cryptographic primitives shared by every other crate in the workspace:
//! keccak-256 hashing, SECP256k1 keypairs/signatures, and address derivation.

pub mod address;
pub mod hash;
pub mod merkle;
pub mod signature;

use thiserror::Error;

/// Errors surfaced by this crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CryptoError {
    #[error("invalid hash encoding: {0}")]
    InvalidHash(String),
    #[error("invalid key encoding: {0}")]
    InvalidKey(String),
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),
    #[error("signature verification failed")]
    VerificationFailed,
}

pub type Result<T> = std::result::Result<T, CryptoError>;

pub use address::Address;
pub use hash::{hash_bytes, hash_text, Hash256};
pub use merkle::merkle_root;
pub use signature::{Keypair, PublicKey, Signature};
