use crate::error::{NetworkError, Result};
use ledger_consensus::{Broadcaster, ConsensusMessage, Pbft};
use ledger_core::{AdmitOutcome, Mempool, Transaction};
use std::sync::Arc;
use tracing::{debug, warn};

/// The two inbound message endpoints the transport collaborator calls into
/// (spec.md §6): `inbound_tx` admits a transaction and floods it onward if
/// it was newly seen; `inbound_consensus` dispatches by `type` to the PBFT
/// state machine. Dispatch owns no locks of its own -- `Mempool` and `Pbft`
/// already synchronize themselves internally.
pub struct Dispatcher {
    mempool: Mempool,
    consensus: Arc<Pbft>,
    broadcaster: Arc<dyn Broadcaster>,
}

impl Dispatcher {
    pub fn new(mempool: Mempool, consensus: Arc<Pbft>, broadcaster: Arc<dyn Broadcaster>) -> Self {
        Self { mempool, consensus, broadcaster }
    }

    /// Admit a transaction dict to the mempool; re-broadcast to peers only
    /// if this was the first time this node saw it, so flooding terminates
    /// instead of echoing forever.
    pub async fn inbound_tx(&self, tx_payload: serde_json::Value) -> Result<AdmitOutcome> {
        let tx: Transaction = serde_json::from_value(tx_payload.clone())
            .map_err(|e| NetworkError::MalformedEnvelope(e.to_string()))?;

        let outcome = self.mempool.admit(tx).await;
        match outcome {
            AdmitOutcome::Accepted => {
                debug!("admitted new transaction, re-flooding");
                self.broadcaster.broadcast("/gossip/tx", tx_payload).await;
            }
            AdmitOutcome::Duplicate => debug!("duplicate transaction, not re-flooded"),
            AdmitOutcome::InvalidSignature => warn!("rejected transaction with invalid signature"),
        }
        Ok(outcome)
    }

    /// Dispatch an inbound consensus message (PRE-PREPARE/PREPARE/COMMIT) to
    /// the PBFT state machine.
    pub async fn inbound_consensus(&self, msg_payload: serde_json::Value) -> Result<()> {
        let message: ConsensusMessage = serde_json::from_value(msg_payload)
            .map_err(|e| NetworkError::MalformedEnvelope(e.to_string()))?;
        self.consensus.handle_message(message).await?;
        Ok(())
    }

    /// Route an already-decoded envelope by its endpoint string. Used by
    /// the TCP listener, which only knows envelopes, not message types.
    pub async fn dispatch_envelope(&self, endpoint: &str, payload: serde_json::Value) -> Result<()> {
        match endpoint {
            "/gossip/tx" => {
                self.inbound_tx(payload).await?;
                Ok(())
            }
            "/gossip/consensus" => self.inbound_consensus(payload).await,
            other => Err(NetworkError::UnknownEndpoint(other.to_string())),
        }
    }
}
