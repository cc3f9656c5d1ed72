use serde::{Deserialize, Serialize};

/// A validator's id and the TCP address its inbound listener is bound to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Peer {
    pub id: String,
    pub address: String,
}

/// The static validator set this node gossips with. Fixed at startup from
/// configuration -- there is no membership protocol (spec.md's Non-goals).
#[derive(Debug, Clone, Default)]
pub struct PeerList {
    peers: Vec<Peer>,
}

impl PeerList {
    pub fn new(peers: Vec<Peer>) -> Self {
        Self { peers }
    }

    /// Every peer except `self_id` -- a node never floods itself.
    pub fn others(&self, self_id: &str) -> Vec<&Peer> {
        self.peers.iter().filter(|p| p.id != self_id).collect()
    }

    pub fn all(&self) -> &[Peer] {
        &self.peers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PeerList {
        PeerList::new(vec![
            Peer { id: "node1".into(), address: "127.0.0.1:9001".into() },
            Peer { id: "node2".into(), address: "127.0.0.1:9002".into() },
            Peer { id: "node3".into(), address: "127.0.0.1:9003".into() },
        ])
    }

    #[test]
    fn others_excludes_self() {
        let peers = sample().others("node2");
        assert_eq!(peers.len(), 2);
        assert!(peers.iter().all(|p| p.id != "node2"));
    }
}
