#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] sled::Error),
    #[error("blocking task panicked: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, StorageError>;
