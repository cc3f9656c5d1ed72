use ledger_core::Block;
use serde::{Deserialize, Serialize};

/// Wire shape of a consensus message, tagged by `type`. Matches the shapes
/// `inbound_consensus` dispatches on: PRE-PREPARE carries the full proposed
/// block, PREPARE/COMMIT carry only the voting hash and the voter's id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConsensusMessage {
    #[serde(rename = "PRE-PREPARE")]
    PrePrepare {
        block: Block,
        sender_id: String,
        voting_hash: String,
    },
    #[serde(rename = "PREPARE")]
    Prepare { voting_hash: String, sender_id: String },
    #[serde(rename = "COMMIT")]
    Commit { voting_hash: String, sender_id: String },
}

impl ConsensusMessage {
    pub fn sender_id(&self) -> &str {
        match self {
            ConsensusMessage::PrePrepare { sender_id, .. } => sender_id,
            ConsensusMessage::Prepare { sender_id, .. } => sender_id,
            ConsensusMessage::Commit { sender_id, .. } => sender_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepare_message_roundtrips_through_json() {
        let msg = ConsensusMessage::Prepare {
            voting_hash: "abc".into(),
            sender_id: "node2".into(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"PREPARE\""));
        let restored: ConsensusMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.sender_id(), "node2");
    }

    #[test]
    fn pre_prepare_message_carries_the_block() {
        let block = Block::genesis("root".into());
        let msg = ConsensusMessage::PrePrepare {
            block: block.clone(),
            sender_id: "node1".into(),
            voting_hash: block.voting_hash(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        let restored: ConsensusMessage = serde_json::from_str(&json).unwrap();
        match restored {
            ConsensusMessage::PrePrepare { block: restored_block, .. } => {
                assert_eq!(restored_block.hash, block.hash);
            }
            _ => panic!("expected PrePrepare"),
        }
    }
}
