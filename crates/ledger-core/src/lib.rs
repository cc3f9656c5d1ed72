//! Block/transaction model, world-state, mempool, and the chain's
//! persistence layer -- everything the consensus state machine in
//! `ledger-consensus` needs to reconstruct and commit a block.

pub mod block;
pub mod canonical;
pub mod chain;
pub mod error;
pub mod mempool;
pub mod transaction;
pub mod types;
pub mod world_state;

pub use block::{Block, BlockHeader};
pub use chain::ChainStore;
pub use error::{BlockchainError, Result};
pub use mempool::{AdmitOutcome, Mempool};
pub use transaction::Transaction;
pub use types::{Amount, BlockHeight, Nonce, Timestamp, DEPLOY_SENTINEL, GENESIS_PROPOSER_ID, GENESIS_TIMESTAMP};
pub use world_state::{ContractEntry, WorldState};
