//! CLI argument parsing for the mock node

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use sbch_rpc::{DEFAULT_EPOCH_WINDOW, DEFAULT_LATEST_BLOCK_TOO_OLD_AGE};

/// sbch_* JSON-RPC server backed by a chain snapshot
#[derive(Parser, Debug, Clone)]
#[command(name = "sbch-mock-node")]
#[command(about = "Serve the sbch_* namespace from a JSON chain snapshot")]
#[command(version)]
pub struct Cli {
    /// RPC server listen address
    #[arg(long, default_value = "0.0.0.0:8545")]
    pub rpc_addr: SocketAddr,

    /// Chain snapshot file (JSON); an empty chain is served if not specified
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Health check threshold in seconds when the caller passes 0
    #[arg(
        long,
        default_value_t = DEFAULT_LATEST_BLOCK_TOO_OLD_AGE,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub health_max_age: u64,

    /// Number of epochs returned when the end epoch is 0
    #[arg(long, default_value_t = DEFAULT_EPOCH_WINDOW)]
    pub epoch_window: u64,

    /// Per-request timeout in seconds
    #[arg(long, default_value = "30")]
    pub request_timeout: u64,

    /// Disable CORS headers
    #[arg(long)]
    pub no_cors: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
