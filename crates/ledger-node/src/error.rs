#[derive(thiserror::Error, Debug)]
pub enum NodeError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Storage(#[from] ledger_storage::StorageError),
    #[error(transparent)]
    Core(#[from] ledger_core::BlockchainError),
    #[error(transparent)]
    Contract(#[from] ledger_contracts::ContractError),
    #[error(transparent)]
    Consensus(#[from] ledger_consensus::ConsensusError),
    #[error(transparent)]
    Network(#[from] ledger_network::NetworkError),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, NodeError>;
