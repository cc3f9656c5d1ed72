use clap::Parser;
use ledger_node::config::NodeConfig;
use ledger_node::node::Node;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// A permissioned, replicated ledger validator.
#[derive(Parser, Debug)]
#[command(name = "ledgerd")]
struct Cli {
    /// Path to this node's TOML configuration file.
    #[arg(long, default_value = "node.toml")]
    config: PathBuf,

    /// Override the data directory from the config file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override this node's id from the config file.
    #[arg(long)]
    node_id: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let mut config = NodeConfig::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(node_id) = cli.node_id {
        config.node_id = node_id;
    }

    tracing::info!(node_id = %config.node_id, primary = %config.primary_id, "starting validator");
    let node = Arc::new(Node::bootstrap(config).await?);
    node.run().await?;
    Ok(())
}
