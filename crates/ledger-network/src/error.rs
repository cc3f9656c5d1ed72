#[derive(thiserror::Error, Debug)]
pub enum NetworkError {
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
    #[error("peer io error: {0}")]
    Io(String),
    #[error(transparent)]
    Consensus(#[from] ledger_consensus::ConsensusError),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
