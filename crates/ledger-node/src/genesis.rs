use crate::config::GenesisContractConfig;
use crate::error::Result;
use ledger_contracts::{execute_transaction, ContractRegistry};
use ledger_core::{Block, ChainStore, Transaction, WorldState, GENESIS_TIMESTAMP};
use serde_json::json;
use tracing::info;

const GENESIS_DEPLOYER: &str = "genesis";

/// Build and, if the chain is empty, persist the genesis block. When
/// `contract` is set, its deployment is executed directly against
/// world-state before the block is sealed (spec.md §6's optional genesis
/// deploy), so every node that starts with the same configuration derives
/// the same genesis `stateRoot` -- the deploy transaction here is
/// deterministic (fixed nonce, sender, and timestamp) and is never placed
/// in the mempool, matching the original node's `_initialize_chain`.
pub async fn ensure_genesis(
    chain: &ChainStore,
    world: &WorldState,
    registry: &ContractRegistry,
    contract: Option<&GenesisContractConfig>,
) -> Result<Block> {
    if let Some(existing) = chain.get_block_by_height(0).await? {
        info!(hash = %existing.hash, "genesis block already present");
        return Ok(existing);
    }

    if let Some(contract) = contract {
        let data = if contract.args.is_null() {
            json!(contract.code_name)
        } else {
            json!({"contract": contract.code_name, "args": contract.args})
        };
        let deploy_tx = Transaction::new_unsigned(
            0,
            GENESIS_DEPLOYER,
            "0x0",
            0,
            data,
            GENESIS_TIMESTAMP,
        );
        execute_transaction(world, registry, &deploy_tx).await?;
    }

    let state_root = world.state_root().await?.to_hex();
    let genesis = Block::genesis(state_root);
    chain.save_block(&genesis).await?;
    info!(hash = %genesis.hash, "sealed genesis block");
    Ok(genesis)
}
