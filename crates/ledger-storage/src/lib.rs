//! Generic embedded key/value storage used by `ledger-core` to persist
//! blocks, the chain index, and contract state.

pub mod batch;
pub mod error;
pub mod store;

pub use batch::Batch;
pub use error::{Result, StorageError};
pub use store::Store;
