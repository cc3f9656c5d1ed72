use crate::batch::Batch;
use crate::error::{Result, StorageError};
use std::path::Path;

/// Ordered, durable key/value storage backed by `sled`.
///
/// This crate knows nothing about blocks, transactions, or world state --
/// those encodings live in `ledger-core`, which builds `block:<hash>`,
/// `index:<height>`, `head_hash`, `contract_code:<addr>` and
/// `contract_storage:<addr>` keys on top of this raw store. Every method
/// hands blocking sled calls to `spawn_blocking` since the node otherwise
/// runs entirely on the async runtime.
#[derive(Clone)]
pub struct Store {
    db: sled::Db,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// In-memory store for tests that don't need a real path on disk. Public
    /// (not test-gated) so downstream crates' own test suites can use it too.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    pub async fn get(&self, key: impl AsRef<[u8]>) -> Result<Option<Vec<u8>>> {
        let db = self.db.clone();
        let key = key.as_ref().to_vec();
        tokio::task::spawn_blocking(move || -> Result<Option<Vec<u8>>> {
            Ok(db.get(key)?.map(|v| v.to_vec()))
        })
        .await?
    }

    pub async fn put(&self, key: impl AsRef<[u8]>, value: impl AsRef<[u8]>) -> Result<()> {
        let db = self.db.clone();
        let key = key.as_ref().to_vec();
        let value = value.as_ref().to_vec();
        tokio::task::spawn_blocking(move || -> Result<()> {
            db.insert(key, value)?;
            Ok(())
        })
        .await?
    }

    pub async fn remove(&self, key: impl AsRef<[u8]>) -> Result<()> {
        let db = self.db.clone();
        let key = key.as_ref().to_vec();
        tokio::task::spawn_blocking(move || -> Result<()> {
            db.remove(key)?;
            Ok(())
        })
        .await?
    }

    /// Apply a batch of writes atomically. Used by `save_block` to write the
    /// block body, the height index, and `head_hash` as a single operation.
    pub async fn apply_batch(&self, batch: Batch) -> Result<()> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            db.apply_batch(batch.0)?;
            Ok(())
        })
        .await?
    }

    /// Collect every key/value pair whose key starts with `prefix`, in key
    /// order. Used for state-root computation and contract lookup by name.
    pub async fn scan_prefix(&self, prefix: impl AsRef<[u8]>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let db = self.db.clone();
        let prefix = prefix.as_ref().to_vec();
        tokio::task::spawn_blocking(move || -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
            db.scan_prefix(prefix)
                .map(|entry| -> std::result::Result<(Vec<u8>, Vec<u8>), StorageError> {
                    let (key, value) = entry?;
                    Ok((key.to_vec(), value.to_vec()))
                })
                .collect()
        })
        .await?
    }

    pub async fn flush(&self) -> Result<()> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            db.flush()?;
            Ok(())
        })
        .await?
    }
}
