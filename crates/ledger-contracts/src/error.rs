#[derive(thiserror::Error, Debug)]
pub enum ContractError {
    #[error("unknown contract code name: {0}")]
    UnknownContract(String),
    #[error("contract '{contract}' has no method '{method}'")]
    UnknownMethod { contract: String, method: String },
    #[error("invalid parameters for '{0}': {1}")]
    InvalidParams(String, String),
    #[error("contract not deployed at address {0}")]
    NotDeployed(String),
    #[error("malformed call payload: {0}")]
    MalformedPayload(String),
    #[error("world-state access failed: {0}")]
    Storage(String),
}

impl From<ledger_core::BlockchainError> for ContractError {
    fn from(err: ledger_core::BlockchainError) -> Self {
        ContractError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ContractError>;
