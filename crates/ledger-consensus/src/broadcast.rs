use async_trait::async_trait;

/// The only thing consensus needs from the transport layer: deliver a
/// payload to every other validator's named inbound endpoint, best-effort.
/// Resolves the source's circular dependency between the gossip layer and
/// the transaction/block types -- this trait takes an endpoint string and
/// an already-serialized payload, never a `Block` or `Transaction`
/// directly, so an implementation in `ledger-network` never needs to
/// depend on this crate's message types.
#[async_trait]
pub trait Broadcaster: Send + Sync {
    async fn broadcast(&self, endpoint: &str, payload: serde_json::Value);
}

/// A broadcaster that records what it was asked to send instead of sending
/// anything -- used by tests that exercise consensus in isolation.
#[derive(Default)]
pub struct NullBroadcaster {
    pub sent: tokio::sync::Mutex<Vec<(String, serde_json::Value)>>,
}

#[async_trait]
impl Broadcaster for NullBroadcaster {
    async fn broadcast(&self, endpoint: &str, payload: serde_json::Value) {
        self.sent.lock().await.push((endpoint.to_string(), payload));
    }
}
