use serde::{Deserialize, Serialize};

/// The only thing that crosses the wire between two nodes: a logical
/// endpoint name and an already-serialized JSON payload. Mirrors
/// [`ledger_consensus::Broadcaster::broadcast`]'s signature so the
/// transport never needs to know about `Transaction` or `ConsensusMessage`
/// directly -- it forwards bytes, the dispatcher on the receiving end
/// decides what they mean.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub endpoint: String,
    pub payload: serde_json::Value,
}

impl Envelope {
    pub fn new(endpoint: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { endpoint: endpoint.into(), payload }
    }

    /// Frame as a single newline-terminated JSON line -- the flooding
    /// transport's wire format. One line per message, read with
    /// `AsyncBufReadExt::read_line` on the receiving side.
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');
        Ok(line)
    }

    pub fn from_line(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim_end())
    }
}
