#[derive(thiserror::Error, Debug)]
pub enum BlockchainError {
    #[error("malformed transaction: {0}")]
    MalformedTransaction(String),
    #[error("invalid signature")]
    InvalidSignature,
    #[error("duplicate transaction")]
    DuplicateTransaction,
    #[error("proposal out of order: expected parent {expected}, got {got}")]
    ProposalOutOfOrder { expected: String, got: String },
    #[error("reconstructed block hash {reconstructed} does not match voting hash {expected}")]
    HashMismatch {
        expected: String,
        reconstructed: String,
    },
    #[error("contract execution failed: {0}")]
    ExecutionFailure(String),
    #[error(transparent)]
    Storage(#[from] ledger_storage::StorageError),
    #[error(transparent)]
    Crypto(#[from] ledger_crypto::CryptoError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BlockchainError>;
