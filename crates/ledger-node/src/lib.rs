//! Node wiring: configuration, genesis construction, and the `Node` struct
//! that assembles storage, world-state, the contract registry, the
//! mempool, PBFT consensus, and the gossip transport into one running
//! validator. The `ledgerd` binary (`src/main.rs`) is a thin CLI shell
//! around this crate.

pub mod config;
pub mod error;
pub mod genesis;
pub mod node;

pub use config::{GenesisContractConfig, NodeConfig};
pub use error::{NodeError, Result};
pub use node::Node;
