use crate::block::Block;
use crate::error::Result;
use crate::types::BlockHeight;
use ledger_storage::{Batch, Store};

const BLOCK_PREFIX: &str = "block:";
const INDEX_PREFIX: &str = "index:";
const HEAD_KEY: &str = "head_hash";

fn block_key(hash: &str) -> String {
    format!("{BLOCK_PREFIX}{hash}")
}

fn index_key(height: BlockHeight) -> String {
    format!("{INDEX_PREFIX}{height}")
}

/// The append-only chain of committed blocks, layered on the raw store.
/// `save_block` is the only atomic multi-key write in this crate: block
/// body, height index, and head pointer move together or not at all, so a
/// crash mid-write can never leave `head_hash` pointing at an unwritten
/// block.
#[derive(Clone)]
pub struct ChainStore {
    store: Store,
}

impl ChainStore {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn save_block(&self, block: &Block) -> Result<()> {
        let encoded = serde_json::to_vec(block)?;
        let mut batch = Batch::new();
        batch.insert(block_key(&block.hash), &encoded);
        batch.insert(index_key(block.header.index), block.hash.as_bytes());
        batch.insert(HEAD_KEY, block.hash.as_bytes());
        self.store.apply_batch(batch).await?;
        Ok(())
    }

    pub async fn get_block_by_hash(&self, hash: &str) -> Result<Option<Block>> {
        match self.store.get(block_key(hash).as_bytes()).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn get_block_by_height(&self, height: BlockHeight) -> Result<Option<Block>> {
        match self.store.get(index_key(height).as_bytes()).await? {
            Some(hash_bytes) => {
                let hash = String::from_utf8_lossy(&hash_bytes).into_owned();
                self.get_block_by_hash(&hash).await
            }
            None => Ok(None),
        }
    }

    pub async fn get_head_block(&self) -> Result<Option<Block>> {
        match self.store.get(HEAD_KEY.as_bytes()).await? {
            Some(hash_bytes) => {
                let hash = String::from_utf8_lossy(&hash_bytes).into_owned();
                self.get_block_by_hash(&hash).await
            }
            None => Ok(None),
        }
    }
}
