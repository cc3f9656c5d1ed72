#[derive(thiserror::Error, Debug)]
pub enum ConsensusError {
    #[error("this node is not the primary")]
    NotPrimary,
    #[error("consensus is not idle for the current height")]
    NotIdle,
    #[error("mempool is empty, nothing to propose")]
    EmptyMempool,
    #[error("no head block found -- chain store is not initialized")]
    NoHead,
    #[error("proposal out of order: expected parent {expected}, got {got}")]
    ProposalOutOfOrder { expected: String, got: String },
    #[error("reconstructed merkle root {reconstructed} does not match voting hash {voting_hash}")]
    HashMismatch {
        voting_hash: String,
        reconstructed: String,
    },
    #[error("consensus halted for this height after a commit-time invariant violation")]
    Halted,
    #[error(transparent)]
    Core(#[from] ledger_core::BlockchainError),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;
