use crate::error::{NodeError, Result};
use ledger_network::Peer;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Optional PharmaContract deployment folded into the genesis block, so a
/// fresh node's genesis `stateRoot` already reflects it (spec.md §6:
/// "Optionally, genesis deploys one built-in contract by calling the
/// executor directly before sealing the genesis block").
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisContractConfig {
    pub code_name: String,
    #[serde(default)]
    pub args: serde_json::Value,
}

/// Everything one validator needs to start: its own identity, the static
/// peer set, where to persist state, which contracts it registers, and the
/// deterministic genesis parameters (spec.md §6 "Configuration").
#[derive(Debug, Clone, Deserialize)]
pub struct NodeConfig {
    pub node_id: String,
    pub primary_id: String,
    pub listen_address: String,
    pub peers: Vec<Peer>,
    pub data_dir: PathBuf,
    #[serde(default)]
    pub contract_code_names: Vec<String>,
    #[serde(default)]
    pub genesis_contract: Option<GenesisContractConfig>,
    /// How often the primary drains the mempool and proposes, in seconds.
    /// The spec does not mandate a cadence ("periodically, or on demand");
    /// zero disables the periodic trigger and leaves proposing fully
    /// on-demand.
    #[serde(default = "default_propose_interval_secs")]
    pub propose_interval_secs: u64,
}

fn default_propose_interval_secs() -> u64 {
    5
}

impl NodeConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("reading {}: {e}", path.as_ref().display())))?;
        let config: NodeConfig =
            toml::from_str(&text).map_err(|e| NodeError::Config(format!("parsing config: {e}")))?;
        Ok(config)
    }

    pub fn is_primary(&self) -> bool {
        self.node_id == self.primary_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("node.toml");
        std::fs::write(
            &path,
            r#"
            node_id = "node1"
            primary_id = "node1"
            listen_address = "127.0.0.1:9001"
            data_dir = "./data/node1"
            peers = [
                { id = "node1", address = "127.0.0.1:9001" },
                { id = "node2", address = "127.0.0.1:9002" },
            ]
            "#,
        )
        .unwrap();

        let config = NodeConfig::load(&path).unwrap();
        assert!(config.is_primary());
        assert_eq!(config.peers.len(), 2);
        assert_eq!(config.propose_interval_secs, 5);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = NodeConfig::load("/nonexistent/path/node.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
