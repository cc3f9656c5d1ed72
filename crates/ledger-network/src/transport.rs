use crate::peer::PeerList;
use crate::wire::Envelope;
use async_trait::async_trait;
use ledger_consensus::Broadcaster;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::warn;

/// Flooding broadcast over plain TCP: one connection per peer per message,
/// each send dispatched onto its own background task so a single
/// unreachable peer can never stall the caller. The core only needs "best
/// effort, no ordering, tolerate drops" (spec.md §4.6) -- this is the
/// simplest transport that provides that, matching the corpus's own
/// TCP-socket gossip sketch rather than reaching for a full P2P library the
/// dependency tree doesn't carry.
#[derive(Clone)]
pub struct TcpBroadcaster {
    self_id: String,
    peers: PeerList,
}

impl TcpBroadcaster {
    pub fn new(self_id: impl Into<String>, peers: PeerList) -> Self {
        Self { self_id: self_id.into(), peers }
    }
}

#[async_trait]
impl Broadcaster for TcpBroadcaster {
    async fn broadcast(&self, endpoint: &str, payload: serde_json::Value) {
        let envelope = Envelope::new(endpoint, payload);
        let line = match envelope.to_line() {
            Ok(line) => line,
            Err(err) => {
                warn!(error = %err, "failed to encode outbound envelope");
                return;
            }
        };

        for peer in self.peers.others(&self.self_id) {
            let address = peer.address.clone();
            let peer_id = peer.id.clone();
            let line = line.clone();
            tokio::spawn(async move {
                if let Err(err) = send_line(&address, &line).await {
                    // A single unreachable peer is logged and ignored: the
                    // protocol assumes enough other peers will deliver.
                    warn!(peer = %peer_id, %address, error = %err, "broadcast to peer failed");
                }
            });
        }
    }
}

async fn send_line(address: &str, line: &str) -> std::io::Result<()> {
    let mut stream = TcpStream::connect(address).await?;
    stream.write_all(line.as_bytes()).await?;
    stream.flush().await
}
