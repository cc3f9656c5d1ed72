use crate::canonical::canonical_json;
use crate::transaction::Transaction;
use crate::types::{BlockHeight, Timestamp, GENESIS_PROPOSER_ID, GENESIS_TIMESTAMP};
use ledger_crypto::{hash_text, merkle_root, Hash256};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BlockHeader {
    pub index: BlockHeight,
    #[serde(rename = "prevHash")]
    pub prev_hash: String,
    #[serde(rename = "merkleRoot")]
    pub merkle_root: String,
    #[serde(rename = "stateRoot")]
    pub state_root: String,
    pub timestamp: Timestamp,
    #[serde(rename = "proposerId")]
    pub proposer_id: String,
}

impl BlockHeader {
    /// Canonical digest of the header, key-sorted so field declaration
    /// order never affects the hash.
    pub fn hash(&self) -> Hash256 {
        let value = json!({
            "index": self.index,
            "prevHash": self.prev_hash,
            "merkleRoot": self.merkle_root,
            "stateRoot": self.state_root,
            "timestamp": self.timestamp,
            "proposerId": self.proposer_id,
        });
        hash_text(&canonical_json(&value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Block {
    pub hash: String,
    pub header: BlockHeader,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Assemble a block and finalize its hash. `state_root` must already
    /// reflect executing `transactions` against the parent's post-state.
    pub fn new(
        index: BlockHeight,
        prev_hash: String,
        transactions: Vec<Transaction>,
        state_root: String,
        timestamp: Timestamp,
        proposer_id: String,
    ) -> Self {
        let merkle = Self::merkle_root_of(&transactions);
        let header = BlockHeader {
            index,
            prev_hash,
            merkle_root: merkle.to_hex(),
            state_root,
            timestamp,
            proposer_id,
        };
        let hash = header.hash().to_hex();
        Self {
            hash,
            header,
            transactions,
        }
    }

    /// The deterministic genesis block: index 0, all-zero prevHash, fixed
    /// timestamp, proposer `"genesis"`. `state_root` is supplied by the
    /// caller, who may have deployed a built-in contract before sealing it.
    pub fn genesis(state_root: String) -> Self {
        Self::new(
            0,
            Hash256::zero_hex(),
            Vec::new(),
            state_root,
            GENESIS_TIMESTAMP,
            GENESIS_PROPOSER_ID.to_string(),
        )
    }

    pub fn merkle_root_of(transactions: &[Transaction]) -> Hash256 {
        let hashes: Vec<Hash256> = transactions
            .iter()
            .map(|tx| {
                Hash256::from_hex(&tx.hash).expect("tx.hash is always produced by compute_hash")
            })
            .collect();
        merkle_root(&hashes)
    }

    /// The content-derived value replicas vote on: the merkle root of the
    /// proposed transactions. Deliberately excludes `stateRoot`, which is
    /// only known after execution at commit time.
    pub fn voting_hash(&self) -> String {
        self.header.merkle_root.clone()
    }

    pub fn recompute_hash(&self) -> Hash256 {
        self.header.hash()
    }
}
