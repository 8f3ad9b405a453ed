//! sbch mock node
//!
//! Serves the `sbch_*` JSON-RPC namespace over HTTP from a chain snapshot
//! held in memory. Useful for exercising clients without a full node.

mod cli;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use cli::Cli;
use sbch_rpc::{
    ApiConfig, ChainSnapshot, MemoryBackend, RpcHandler, RpcServer, SbchApi, ServerConfig,
};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    tracing::info!("sbch mock node starting...");

    let snapshot = match &cli.snapshot {
        Some(path) => load_snapshot(path)?,
        None => ChainSnapshot::default(),
    };
    tracing::info!(
        blocks = snapshot.blocks.len(),
        transactions = snapshot.transactions.len(),
        epochs = snapshot.epochs.len(),
        cc_epochs = snapshot.cc_epochs.len(),
        "chain snapshot ready"
    );

    let backend = Arc::new(MemoryBackend::from_snapshot(snapshot));
    let api = Arc::new(SbchApi::with_config(backend, api_config(&cli)));
    let server = RpcServer::new(server_config(&cli), RpcHandler::new(api));

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Shutdown signal received"),
    }

    tracing::info!("sbch mock node stopped");

    Ok(())
}

fn api_config(cli: &Cli) -> ApiConfig {
    ApiConfig {
        latest_block_too_old_age: cli.health_max_age,
        epoch_window: cli.epoch_window,
    }
}

fn server_config(cli: &Cli) -> ServerConfig {
    ServerConfig {
        request_timeout: Duration::from_secs(cli.request_timeout),
        enable_cors: !cli.no_cors,
        ..ServerConfig::new(cli.rpc_addr)
    }
}

/// Load a chain snapshot from a JSON file
fn load_snapshot(path: &Path) -> Result<ChainSnapshot> {
    tracing::info!("Loading snapshot from {:?}", path);
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot: ChainSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    Ok(snapshot)
}
