//! Shared scalar aliases. Kept as plain integers rather than newtypes since
//! the teacher's own core does the same and nothing here benefits from the
//! extra ceremony.

pub type Amount = u64;
pub type Nonce = u64;
pub type BlockHeight = u64;
pub type Timestamp = u64;

/// Fixed genesis timestamp shared by every node, so that independently
/// started nodes produce an identical genesis block hash.
pub const GENESIS_TIMESTAMP: Timestamp = 1_672_531_200;

pub const GENESIS_PROPOSER_ID: &str = "genesis";

/// Recipient sentinel marking a transaction as a contract deployment.
pub const DEPLOY_SENTINEL: &str = "0x0";
