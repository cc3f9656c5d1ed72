//! End-to-end PBFT scenarios driven by manually relaying the messages each
//! node's [`NullBroadcaster`] records, rather than a real transport. This
//! exercises the exact literal scenarios from the specification: genesis
//! determinism, a single committed block agreeing across all replicas,
//! buffered out-of-order votes, wrong-parent rejection, and a contract call
//! surviving a full consensus round.

use ledger_consensus::{ConsensusMessage, NullBroadcaster, Pbft};
use ledger_contracts::ContractRegistry;
use ledger_core::{Block, ChainStore, Mempool, Transaction, WorldState};
use ledger_crypto::{Address, Hash256, Keypair};
use ledger_storage::Store;
use serde_json::json;
use std::sync::Arc;

struct TestNode {
    pbft: Arc<Pbft>,
    broadcaster: Arc<NullBroadcaster>,
    chain: ChainStore,
    world: WorldState,
    mempool: Mempool,
}

async fn make_node(node_id: &str, primary_id: &str) -> TestNode {
    let store = Store::temporary().unwrap();
    let chain = ChainStore::new(store.clone());
    let world = WorldState::new(store);
    let registry = ContractRegistry::builtin();
    let mempool = Mempool::new();

    let genesis_root = world.state_root().await.unwrap().to_hex();
    chain.save_block(&Block::genesis(genesis_root)).await.unwrap();

    let broadcaster = Arc::new(NullBroadcaster::default());
    let pbft = Arc::new(Pbft::new(
        node_id,
        primary_id,
        chain.clone(),
        world.clone(),
        registry,
        mempool.clone(),
        broadcaster.clone(),
    ));

    TestNode { pbft, broadcaster, chain, world, mempool }
}

async fn drain(node: &TestNode) -> Vec<(String, serde_json::Value)> {
    let mut guard = node.broadcaster.sent.lock().await;
    std::mem::take(&mut *guard)
}

/// Relay every outstanding message between every pair of nodes until no
/// node has anything left to send -- a fully-connected synchronous network
/// with no drops, which is enough rounds for PRE-PREPARE/PREPARE/COMMIT to
/// converge given this protocol's fixed depth.
async fn relay_to_quiescence(nodes: &[TestNode]) {
    for _ in 0..8 {
        let mut delivered_any = false;
        for i in 0..nodes.len() {
            let outgoing = drain(&nodes[i]).await;
            for (endpoint, payload) in outgoing {
                if endpoint != "/gossip/consensus" {
                    continue;
                }
                delivered_any = true;
                let message: ConsensusMessage = serde_json::from_value(payload).unwrap();
                for (j, peer) in nodes.iter().enumerate() {
                    if i == j {
                        continue;
                    }
                    let _ = peer.pbft.handle_message(message.clone()).await;
                }
            }
        }
        if !delivered_any {
            break;
        }
    }
}

fn signed_tx(keypair: &Keypair, nonce: u64, recipient: &str, data: serde_json::Value) -> Transaction {
    let mut tx = Transaction::new_unsigned(nonce, keypair.public_key().to_hex(), recipient, 0, data, 1_700_000_000);
    tx.sign(keypair);
    tx
}

async fn four_node_network() -> Vec<TestNode> {
    let mut nodes = Vec::new();
    for id in ["node1", "node2", "node3", "node4"] {
        nodes.push(make_node(id, "node1").await);
    }
    nodes
}

#[tokio::test]
async fn genesis_is_identical_across_four_fresh_nodes() {
    let nodes = four_node_network().await;
    let mut hashes = Vec::new();
    for node in &nodes {
        let head = node.chain.get_head_block().await.unwrap().unwrap();
        assert_eq!(head.header.index, 0);
        assert_eq!(head.header.prev_hash, "0".repeat(64));
        assert_eq!(head.header.proposer_id, "genesis");
        hashes.push(head.hash);
    }
    assert!(hashes.windows(2).all(|pair| pair[0] == pair[1]));
}

#[tokio::test]
async fn single_block_commit_agrees_across_all_replicas() {
    let nodes = four_node_network().await;
    let keypair = Keypair::generate();
    let tx = signed_tx(&keypair, 0, "0x0", json!("PharmaContract"));

    nodes[0].mempool.admit(tx.clone()).await;
    nodes[0].pbft.try_propose().await.unwrap();
    relay_to_quiescence(&nodes).await;

    let mut heads = Vec::new();
    for node in &nodes {
        let head = node.chain.get_head_block().await.unwrap().unwrap();
        assert_eq!(head.header.index, 1);
        assert_eq!(head.transactions.len(), 1);
        assert_eq!(head.transactions[0].hash, tx.hash);
        heads.push((head.hash, head.header.state_root));
    }
    assert!(heads.windows(2).all(|pair| pair[0] == pair[1]), "all replicas must agree on hash and stateRoot");
}

#[tokio::test]
async fn wrong_parent_proposal_is_rejected_and_head_does_not_advance() {
    let nodes = four_node_network().await;
    let replica = &nodes[1];

    let keypair = Keypair::generate();
    let tx = signed_tx(&keypair, 0, "0x0", json!("PharmaContract"));
    let bogus_parent = Block::new(1, "not-the-real-parent-hash".into(), vec![tx], String::new(), 1_700_000_000, "node1".into());
    let voting_hash = bogus_parent.voting_hash();

    let result = replica.pbft.handle_pre_prepare(bogus_parent, voting_hash).await;
    assert!(result.is_err());

    let head = replica.chain.get_head_block().await.unwrap().unwrap();
    assert_eq!(head.header.index, 0, "head must not advance on a rejected proposal");
}

#[tokio::test]
async fn commit_vote_buffered_before_prepare_quorum_still_commits_without_more_traffic() {
    let nodes = four_node_network().await;
    let keypair = Keypair::generate();
    let tx = signed_tx(&keypair, 0, "0x0", json!("PharmaContract"));
    let voting_hash = Block::merkle_root_of(&[tx.clone()]).to_hex();

    // node3 (index 2) receives COMMIT votes from node2 and node4 before it
    // has even seen a PRE-PREPARE for this height.
    nodes[2].pbft.handle_commit(voting_hash.clone(), "node2".into()).await.unwrap();
    nodes[2].pbft.handle_commit(voting_hash.clone(), "node4".into()).await.unwrap();

    nodes[0].mempool.admit(tx.clone()).await;
    nodes[0].pbft.try_propose().await.unwrap();

    let outgoing = drain(&nodes[0]).await;
    let (endpoint, payload) = outgoing.into_iter().next().expect("primary must broadcast PRE-PREPARE");
    assert_eq!(endpoint, "/gossip/consensus");
    let pre_prepare: ConsensusMessage = serde_json::from_value(payload).unwrap();

    // Deliver PRE-PREPARE to every replica; each records self-votes and
    // broadcasts its own PREPARE.
    for node in nodes.iter().skip(1) {
        node.pbft.handle_message(pre_prepare.clone()).await.unwrap();
    }

    // Relay only the PREPARE broadcasts from node2 and node4 to node3 --
    // exactly the two external votes node3 needs to reach PREPARE quorum.
    for i in [1usize, 3usize] {
        let outgoing = drain(&nodes[i]).await;
        for (endpoint, payload) in outgoing {
            assert_eq!(endpoint, "/gossip/consensus");
            let message: ConsensusMessage = serde_json::from_value(payload).unwrap();
            nodes[2].pbft.handle_message(message).await.unwrap();
        }
    }

    // node3 must now have committed -- the buffered COMMIT votes plus its
    // own self-commit-vote already met quorum the instant PREPARE quorum
    // was reached, with no further COMMIT traffic delivered to it.
    let head = nodes[2].chain.get_head_block().await.unwrap().unwrap();
    assert_eq!(head.header.index, 1, "buffered commit votes must be consumed once PREPARE quorum is reached");
}

#[tokio::test]
async fn contract_call_effect_survives_full_consensus_and_breach_is_sticky() {
    let nodes = four_node_network().await;
    let deployer = Keypair::generate();
    let carrier = Keypair::generate();

    let deploy_tx = signed_tx(
        &deployer,
        0,
        "0x0",
        json!({"contract": "PharmaContract", "args": {"min_temp": 2, "max_temp": 8}}),
    );
    nodes[0].mempool.admit(deploy_tx.clone()).await;
    nodes[0].pbft.try_propose().await.unwrap();
    relay_to_quiescence(&nodes).await;

    let address = Address::from_tx_hash(&Hash256::from_hex(&deploy_tx.hash).unwrap());

    let good_reading = signed_tx(
        &carrier,
        0,
        &address.to_hex(),
        json!({"method": "record_temperature", "params": {"shipment_id": "S1", "temp": 5, "location": ["A"]}}),
    );
    nodes[0].mempool.admit(good_reading).await;
    nodes[0].pbft.try_propose().await.unwrap();
    relay_to_quiescence(&nodes).await;

    let breach_reading = signed_tx(
        &carrier,
        1,
        &address.to_hex(),
        json!({"method": "record_temperature", "params": {"shipment_id": "S1", "temp": 12, "location": ["B"]}}),
    );
    nodes[0].mempool.admit(breach_reading).await;
    nodes[0].pbft.try_propose().await.unwrap();
    relay_to_quiescence(&nodes).await;

    for node in &nodes {
        let entry = node.world.get_contract(&address).await.unwrap().unwrap();
        assert_eq!(entry.storage["shipments"]["S1"]["status"], "BREACHED");
        assert_eq!(entry.storage["shipments"]["S1"]["readings"].as_array().unwrap().len(), 2);
        let head = node.chain.get_head_block().await.unwrap().unwrap();
        assert_eq!(head.header.index, 3);
    }
}
