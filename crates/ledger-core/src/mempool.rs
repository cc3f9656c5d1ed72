use crate::transaction::Transaction;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Result of [`Mempool::admit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmitOutcome {
    Accepted,
    Duplicate,
    InvalidSignature,
}

/// One mempool per node, owned by the node object rather than a process-wide
/// global -- the source's shared/global mempool is exactly the pattern this
/// redesign replaces. Internally synchronized so callers never need their
/// own lock around it.
#[derive(Clone, Default)]
pub struct Mempool {
    transactions: Arc<Mutex<HashMap<String, Transaction>>>,
}

impl Mempool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a transaction: rejects duplicates and invalid signatures, both
    /// without propagating an error -- the outcome variant carries the
    /// reason for the caller (e.g. to decide whether to re-broadcast).
    pub async fn admit(&self, tx: Transaction) -> AdmitOutcome {
        let mut transactions = self.transactions.lock().await;
        if transactions.contains_key(&tx.hash) {
            return AdmitOutcome::Duplicate;
        }
        match tx.verify_signature() {
            Ok(true) => {}
            _ => return AdmitOutcome::InvalidSignature,
        }
        transactions.insert(tx.hash.clone(), tx);
        AdmitOutcome::Accepted
    }

    /// A stable snapshot of the current contents, in arbitrary but
    /// consistent order. The primary treats this snapshot as the source of
    /// truth for the next block's composition.
    pub async fn list(&self) -> Vec<Transaction> {
        self.transactions.lock().await.values().cloned().collect()
    }

    pub async fn remove(&self, hash: &str) -> Option<Transaction> {
        self.transactions.lock().await.remove(hash)
    }

    pub async fn remove_all(&self, hashes: impl IntoIterator<Item = impl AsRef<str>>) {
        let mut transactions = self.transactions.lock().await;
        for hash in hashes {
            transactions.remove(hash.as_ref());
        }
    }

    pub async fn contains(&self, hash: &str) -> bool {
        self.transactions.lock().await.contains_key(hash)
    }

    pub async fn clear(&self) {
        self.transactions.lock().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.transactions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
