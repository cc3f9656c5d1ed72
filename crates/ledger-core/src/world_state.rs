use crate::error::Result;
use ledger_crypto::{hash_bytes, Address, Hash256};
use ledger_storage::Store;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const CONTRACT_CODE_PREFIX: &str = "contract_code:";
const CONTRACT_STORAGE_PREFIX: &str = "contract_storage:";

fn code_key(address: &Address) -> String {
    format!("{CONTRACT_CODE_PREFIX}{}", address.to_hex())
}

fn storage_key(address: &Address) -> String {
    format!("{CONTRACT_STORAGE_PREFIX}{}", address.to_hex())
}

/// A deployed contract: its code name (looked up in `ledger_contracts`'
/// registry) and its JSON-serializable mutable storage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContractEntry {
    pub code_name: String,
    pub storage: Value,
}

/// The mapping from contract address to `{code-name, storage}`, backed by
/// the embedded store. Entries are created only by deploy transactions and
/// mutated only by block application; synchronizing concurrent access is
/// the caller's responsibility (a single world-state mutex upstream).
#[derive(Clone)]
pub struct WorldState {
    store: Store,
}

impl WorldState {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_contract(&self, address: &Address) -> Result<Option<ContractEntry>> {
        let code = self.store.get(code_key(address).as_bytes()).await?;
        let storage = self.store.get(storage_key(address).as_bytes()).await?;
        match (code, storage) {
            (Some(code), Some(storage)) => {
                let code_name = String::from_utf8_lossy(&code).into_owned();
                let storage: Value = serde_json::from_slice(&storage)?;
                Ok(Some(ContractEntry { code_name, storage }))
            }
            _ => Ok(None),
        }
    }

    /// Writes code name and storage as two individual keys, per the
    /// persisted-state layout (contract entries are not batched).
    pub async fn set_contract(&self, address: &Address, entry: &ContractEntry) -> Result<()> {
        self.store
            .put(code_key(address).as_bytes(), entry.code_name.as_bytes())
            .await?;
        let storage_bytes = serde_json::to_vec(&entry.storage)?;
        self.store
            .put(storage_key(address).as_bytes(), storage_bytes)
            .await?;
        Ok(())
    }

    /// Linear scan over `contract_code:*` for the first address whose code
    /// name matches. Used by genesis/tests to recover a contract's address
    /// without re-deriving it from a transaction hash.
    pub async fn find_contract_address_by_name(&self, code_name: &str) -> Result<Option<Address>> {
        let entries = self.store.scan_prefix(CONTRACT_CODE_PREFIX.as_bytes()).await?;
        for (key, value) in entries {
            if String::from_utf8_lossy(&value) == code_name {
                let key_str = String::from_utf8_lossy(&key);
                if let Some(hex_addr) = key_str.strip_prefix(CONTRACT_CODE_PREFIX) {
                    if let Ok(address) = Address::from_hex(hex_addr) {
                        return Ok(Some(address));
                    }
                }
            }
        }
        Ok(None)
    }

    /// keccak-256 fold over every `contract_storage:*` entry, in the
    /// store's natural (lexicographic) key order. Written into the block
    /// header as `stateRoot` before the block hash is finalized.
    pub async fn state_root(&self) -> Result<Hash256> {
        let entries = self
            .store
            .scan_prefix(CONTRACT_STORAGE_PREFIX.as_bytes())
            .await?;
        let mut buffer = Vec::new();
        for (key, value) in entries {
            buffer.extend_from_slice(&key);
            buffer.extend_from_slice(&value);
        }
        Ok(hash_bytes(&buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_crypto::Keypair;
    use serde_json::json;

    fn sample_address() -> Address {
        Address::from_public_key(&Keypair::generate().public_key())
    }

    #[tokio::test]
    async fn unknown_contract_is_none() {
        let world = WorldState::new(Store::temporary().unwrap());
        assert_eq!(world.get_contract(&sample_address()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let world = WorldState::new(Store::temporary().unwrap());
        let address = sample_address();
        let entry = ContractEntry {
            code_name: "Pharma".into(),
            storage: json!({"owner": "alice"}),
        };
        world.set_contract(&address, &entry).await.unwrap();
        assert_eq!(world.get_contract(&address).await.unwrap(), Some(entry));
    }

    #[tokio::test]
    async fn state_root_changes_when_storage_changes() {
        let world = WorldState::new(Store::temporary().unwrap());
        let address = sample_address();
        let before = world.state_root().await.unwrap();

        world
            .set_contract(
                &address,
                &ContractEntry {
                    code_name: "Pharma".into(),
                    storage: json!({"owner": "alice"}),
                },
            )
            .await
            .unwrap();
        let after = world.state_root().await.unwrap();
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn state_root_is_deterministic_for_same_content() {
        let world_a = WorldState::new(Store::temporary().unwrap());
        let world_b = WorldState::new(Store::temporary().unwrap());
        let address = sample_address();
        let entry = ContractEntry {
            code_name: "Pharma".into(),
            storage: json!({"owner": "alice"}),
        };
        world_a.set_contract(&address, &entry).await.unwrap();
        world_b.set_contract(&address, &entry).await.unwrap();
        assert_eq!(
            world_a.state_root().await.unwrap(),
            world_b.state_root().await.unwrap()
        );
    }

    #[tokio::test]
    async fn find_contract_address_by_name_locates_deployed_contract() {
        let world = WorldState::new(Store::temporary().unwrap());
        let address = sample_address();
        world
            .set_contract(
                &address,
                &ContractEntry {
                    code_name: "Pharma".into(),
                    storage: json!({}),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            world.find_contract_address_by_name("Pharma").await.unwrap(),
            Some(address)
        );
        assert_eq!(
            world.find_contract_address_by_name("Missing").await.unwrap(),
            None
        );
    }
}
