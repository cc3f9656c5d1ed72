use ledger_core::Block;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    PrePrepared,
    Prepared,
    /// Entered the instant COMMIT quorum is reached, before the async
    /// execute/persist work runs. Prevents a second concurrent vote
    /// delivery from re-triggering the same commit.
    Committing,
    /// A commit-time invariant was violated; this height is stuck until an
    /// operator resets the node. No further vote processing advances it.
    Halted,
}

/// What the caller must do after recording a vote: broadcast the next
/// round's message, or run the commit sequence. Produced while holding the
/// state lock, executed after releasing it (locking discipline forbids
/// broadcast or store writes inside the critical section).
#[derive(Debug, Clone)]
pub enum Action {
    BroadcastPrepare { voting_hash: String },
    BroadcastCommit { voting_hash: String },
    Commit { block: Block, voting_hash: String },
}

/// Per-height consensus state: phase, the candidate block, and the
/// PREPARE/COMMIT vote sets keyed by voting hash. A vote for a hash other
/// than the tracked candidate's is still recorded (for diagnostics) but
/// never advances the phase -- conflicting proposals for the same height
/// must not let an attacker's hash sneak into the quorum count.
#[derive(Default)]
pub struct HeightState {
    pub phase: Phase,
    pub candidate: Option<Block>,
    pub prepare_log: HashMap<String, HashSet<String>>,
    pub commit_log: HashMap<String, HashSet<String>>,
}

impl Default for Phase {
    fn default() -> Self {
        Phase::Idle
    }
}

impl HeightState {
    fn tracked_hash(&self) -> Option<String> {
        self.candidate.as_ref().map(|b| b.voting_hash())
    }

    /// Enter PRE-PREPARED as the primary: record self-votes in both logs
    /// (the original records both PREPARE and COMMIT self-votes the moment
    /// it proposes, not just PREPARE) and hand back the broadcast the
    /// caller owes its peers.
    pub fn propose(&mut self, block: Block, self_id: &str) -> (String, Action) {
        let voting_hash = block.voting_hash();
        self.candidate = Some(block);
        self.phase = Phase::PrePrepared;
        self.prepare_log
            .entry(voting_hash.clone())
            .or_default()
            .insert(self_id.to_string());
        self.commit_log
            .entry(voting_hash.clone())
            .or_default()
            .insert(self_id.to_string());
        (voting_hash.clone(), Action::BroadcastPrepare { voting_hash })
    }

    /// Accept a PRE-PREPARE as a replica. Caller has already checked the
    /// proposal admission guard (index/parent match the current head).
    pub fn accept_proposal(&mut self, block: Block, self_id: &str) -> Action {
        let voting_hash = block.voting_hash();
        self.candidate = Some(block);
        self.phase = Phase::PrePrepared;
        self.prepare_log
            .entry(voting_hash.clone())
            .or_default()
            .insert(self_id.to_string());
        self.commit_log
            .entry(voting_hash.clone())
            .or_default()
            .insert(self_id.to_string());
        Action::BroadcastPrepare { voting_hash }
    }

    /// Record a PREPARE vote and re-examine whether any phase transition it
    /// unlocks (possibly chained straight into a commit, if COMMIT votes
    /// for this hash were already buffered) is now due.
    pub fn record_prepare_vote(&mut self, voting_hash: &str, voter: &str, quorum: usize) -> Vec<Action> {
        self.prepare_log
            .entry(voting_hash.to_string())
            .or_default()
            .insert(voter.to_string());
        self.advance(voting_hash, quorum)
    }

    /// Record a COMMIT vote. Votes that arrive before this node has even
    /// reached PRE-PREPARED are still recorded here -- the log itself is
    /// the buffer described in the spec's late-votes rule, and `advance`
    /// re-examines it every time the phase changes.
    pub fn record_commit_vote(&mut self, voting_hash: &str, voter: &str, quorum: usize) -> Vec<Action> {
        self.commit_log
            .entry(voting_hash.to_string())
            .or_default()
            .insert(voter.to_string());
        self.advance(voting_hash, quorum)
    }

    fn advance(&mut self, voting_hash: &str, quorum: usize) -> Vec<Action> {
        let mut actions = Vec::new();

        if self.tracked_hash().as_deref() != Some(voting_hash) {
            // Vote for a hash we aren't tracking (no candidate yet, or a
            // conflicting proposal): logged above, never advances phase.
            return actions;
        }

        loop {
            match self.phase {
                Phase::PrePrepared => {
                    let count = self.prepare_log.get(voting_hash).map_or(0, HashSet::len);
                    if count >= quorum {
                        self.phase = Phase::Prepared;
                        actions.push(Action::BroadcastCommit {
                            voting_hash: voting_hash.to_string(),
                        });
                        continue;
                    }
                    break;
                }
                Phase::Prepared => {
                    let count = self.commit_log.get(voting_hash).map_or(0, HashSet::len);
                    if count >= quorum {
                        if let Some(block) = self.candidate.clone() {
                            self.phase = Phase::Committing;
                            actions.push(Action::Commit {
                                block,
                                voting_hash: voting_hash.to_string(),
                            });
                        }
                    }
                    break;
                }
                Phase::Idle | Phase::Committing | Phase::Halted => break,
            }
        }

        actions
    }

    pub fn reset_to_idle(&mut self) {
        *self = HeightState::default();
    }

    pub fn halt(&mut self) {
        self.phase = Phase::Halted;
    }
}
