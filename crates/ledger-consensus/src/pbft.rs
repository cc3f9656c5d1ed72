use crate::broadcast::Broadcaster;
use crate::error::{ConsensusError, Result};
use crate::message::ConsensusMessage;
use crate::state::{Action, HeightState, Phase};
use ledger_contracts::{execute_block, ContractRegistry};
use ledger_core::{Block, ChainStore, Mempool, WorldState};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Validators tolerate f Byzantine faults out of N = 3f + 1; quorum is
/// 2f + 1. Fixed at the spec's N=4, f=1 -- this core has no membership
/// protocol to make it configurable.
pub const QUORUM: usize = 3;

fn now_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_secs()
}

/// The PBFT state machine for one node. Holds the single consensus mutex
/// guarding phase/candidate/vote logs; chain storage, world-state, the
/// contract registry and the mempool are each independently synchronized
/// (or, for the store, internally thread-safe), so the consensus mutex is
/// never held across a store write or a broadcast.
pub struct Pbft {
    node_id: String,
    primary_id: String,
    state: Mutex<HeightState>,
    chain: ChainStore,
    world: WorldState,
    registry: ContractRegistry,
    mempool: Mempool,
    broadcaster: Arc<dyn Broadcaster>,
}

impl Pbft {
    pub fn new(
        node_id: impl Into<String>,
        primary_id: impl Into<String>,
        chain: ChainStore,
        world: WorldState,
        registry: ContractRegistry,
        mempool: Mempool,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        Self {
            node_id: node_id.into(),
            primary_id: primary_id.into(),
            state: Mutex::new(HeightState::default()),
            chain,
            world,
            registry,
            mempool,
            broadcaster,
        }
    }

    pub fn is_primary(&self) -> bool {
        self.node_id == self.primary_id
    }

    /// Primary-only: assemble a candidate block from the mempool and kick
    /// off consensus. Returns a typed rejection rather than silently
    /// no-op'ing, so an API handler can report *why* `/mine` did nothing.
    pub async fn try_propose(&self) -> Result<()> {
        if !self.is_primary() {
            return Err(ConsensusError::NotPrimary);
        }

        let transactions = self.mempool.list().await;
        if transactions.is_empty() {
            return Err(ConsensusError::EmptyMempool);
        }

        let head = self.chain.get_head_block().await?.ok_or(ConsensusError::NoHead)?;

        let mut guard = self.state.lock().await;
        if guard.phase != Phase::Idle {
            return Err(ConsensusError::NotIdle);
        }

        let block = Block::new(
            head.header.index + 1,
            head.hash.clone(),
            transactions,
            String::new(),
            now_timestamp(),
            self.node_id.clone(),
        );
        let (voting_hash, action) = guard.propose(block.clone(), &self.node_id);
        drop(guard);

        info!(height = block.header.index, %voting_hash, "primary proposed block");
        self.dispatch(action, &block, &voting_hash).await;
        Ok(())
    }

    /// Replica path: accept (or reject) an inbound PRE-PREPARE.
    pub async fn handle_pre_prepare(&self, block: Block, voting_hash: String) -> Result<()> {
        let head = self.chain.get_head_block().await?.ok_or(ConsensusError::NoHead)?;

        let mut guard = self.state.lock().await;
        if guard.phase != Phase::Idle {
            return Err(ConsensusError::NotIdle);
        }
        if block.header.index != head.header.index + 1 || block.header.prev_hash != head.hash {
            return Err(ConsensusError::ProposalOutOfOrder {
                expected: head.hash,
                got: block.header.prev_hash,
            });
        }

        let action = guard.accept_proposal(block, &self.node_id);
        drop(guard);

        info!(%voting_hash, node = %self.node_id, "replica accepted proposal");
        self.dispatch_simple(action).await;
        Ok(())
    }

    pub async fn handle_prepare(&self, voting_hash: String, sender_id: String) -> Result<()> {
        let mut guard = self.state.lock().await;
        let actions = guard.record_prepare_vote(&voting_hash, &sender_id, QUORUM);
        drop(guard);
        self.run_actions(actions).await;
        Ok(())
    }

    pub async fn handle_commit(&self, voting_hash: String, sender_id: String) -> Result<()> {
        let mut guard = self.state.lock().await;
        let actions = guard.record_commit_vote(&voting_hash, &sender_id, QUORUM);
        drop(guard);
        self.run_actions(actions).await;
        Ok(())
    }

    pub async fn handle_message(&self, message: ConsensusMessage) -> Result<()> {
        match message {
            ConsensusMessage::PrePrepare { block, voting_hash, .. } => {
                self.handle_pre_prepare(block, voting_hash).await
            }
            ConsensusMessage::Prepare { voting_hash, sender_id } => {
                self.handle_prepare(voting_hash, sender_id).await
            }
            ConsensusMessage::Commit { voting_hash, sender_id } => {
                self.handle_commit(voting_hash, sender_id).await
            }
        }
    }

    async fn run_actions(&self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::BroadcastPrepare { voting_hash } => {
                    self.send(ConsensusMessage::Prepare {
                        voting_hash,
                        sender_id: self.node_id.clone(),
                    })
                    .await;
                }
                Action::BroadcastCommit { voting_hash } => {
                    self.send(ConsensusMessage::Commit {
                        voting_hash,
                        sender_id: self.node_id.clone(),
                    })
                    .await;
                }
                Action::Commit { block, voting_hash } => {
                    self.commit(block, voting_hash).await;
                }
            }
        }
    }

    async fn dispatch(&self, action: Action, block: &Block, voting_hash: &str) {
        if let Action::BroadcastPrepare { .. } = &action {
            self.send(ConsensusMessage::PrePrepare {
                block: block.clone(),
                sender_id: self.node_id.clone(),
                voting_hash: voting_hash.to_string(),
            })
            .await;
        } else {
            self.run_actions(vec![action]).await;
        }
    }

    async fn dispatch_simple(&self, action: Action) {
        self.run_actions(vec![action]).await;
    }

    async fn send(&self, message: ConsensusMessage) {
        let payload = match serde_json::to_value(&message) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "failed to serialize consensus message");
                return;
            }
        };
        self.broadcaster.broadcast("/gossip/consensus", payload).await;
    }

    /// Commit semantics: reconstruct the block, verify the voting hash,
    /// execute transactions, compute the state root, finalize the block
    /// hash, persist, and reset to IDLE. Runs outside the consensus mutex.
    async fn commit(&self, candidate: Block, voting_hash: String) {
        if candidate.header.merkle_root != voting_hash {
            warn!(%voting_hash, reconstructed = %candidate.header.merkle_root, "merkle root mismatch at commit, halting");
            self.state.lock().await.halt();
            return;
        }

        execute_block(&self.world, &self.registry, &candidate.transactions).await;

        let state_root = match self.world.state_root().await {
            Ok(root) => root.to_hex(),
            Err(err) => {
                warn!(error = %err, "state root computation failed, halting");
                self.state.lock().await.halt();
                return;
            }
        };

        let finalized = Block::new(
            candidate.header.index,
            candidate.header.prev_hash.clone(),
            candidate.transactions.clone(),
            state_root,
            candidate.header.timestamp,
            candidate.header.proposer_id.clone(),
        );

        if let Err(err) = self.chain.save_block(&finalized).await {
            warn!(error = %err, "failed to persist committed block, halting");
            self.state.lock().await.halt();
            return;
        }

        self.mempool
            .remove_all(finalized.transactions.iter().map(|tx| tx.hash.as_str()))
            .await;

        info!(height = finalized.header.index, hash = %finalized.hash, "committed block");
        self.state.lock().await.reset_to_idle();
    }

    pub async fn phase(&self) -> Phase {
        self.state.lock().await.phase
    }
}
