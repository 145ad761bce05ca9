//! ledger-node — the digital-cash ledger's standalone node binary.
//!
//! Startup sequence:
//!   1. Load configuration (inflator set, data directory, RPC listen address)
//!   2. Open the persistent state database
//!   3. Construct the state engine (C3 + C5 + C6)
//!   4. Start the JSON-RPC server exposing `checkTx`/`deliverTx` and the
//!      query surface (C8's transport, standing in for the BFT consensus
//!      engine this core is meant to run behind)
//!   5. Run until terminated — there is no block loop here: each RPC call
//!      to `deliverTx` is applied immediately, under the assumption that
//!      the caller serializes its own calls the way a real consensus
//!      driver would.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tracing::info;

use ledger_core::{InflatorSet, PubKeyHex};
use ledger_rpc::server::RpcServerState;
use ledger_rpc::RpcServer;
use ledger_state::{LedgerEngine, StateDb};

#[derive(Parser, Debug)]
#[command(
    name = "ledger-node",
    version,
    about = "Digital-cash ledger state machine — standalone node for manual operation and testing"
)]
struct Args {
    /// Path to the node's JSON config file (inflator set, data dir, RPC address).
    #[arg(long)]
    config: PathBuf,

    /// Override the data directory from the config file.
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Override the RPC listen address from the config file.
    #[arg(long)]
    rpc_addr: Option<SocketAddr>,
}

/// On-disk configuration shape. Missing file or malformed JSON surfaces as
/// a contextual error at startup, never a panic.
#[derive(Debug, Deserialize)]
struct Config {
    /// Public keys authorized to mint, set tax, and claim fees.
    inflators: Vec<String>,
    /// Directory for the persistent state database.
    data_dir: PathBuf,
    /// JSON-RPC listen address.
    rpc_addr: SocketAddr,
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing config JSON from {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ledger=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    info!("ledger node starting");

    let mut config = load_config(&args.config)?;
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if let Some(addr) = args.rpc_addr {
        config.rpc_addr = addr;
    }

    // ── State database ────────────────────────────────────────────────────
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating data dir {}", config.data_dir.display()))?;
    let db = StateDb::open(&config.data_dir).context("opening state database")?;

    // ── Inflator set ──────────────────────────────────────────────────────
    let inflators = InflatorSet::new(config.inflators.into_iter().map(PubKeyHex));
    info!(count = inflators.len(), "loaded inflator set");

    // ── State engine ──────────────────────────────────────────────────────
    let engine = Arc::new(LedgerEngine::new(db, inflators));

    // ── RPC server ────────────────────────────────────────────────────────
    let rpc_state = Arc::new(RpcServerState {
        engine: Arc::clone(&engine),
    });
    let rpc_handle = RpcServer::new(rpc_state)
        .start(config.rpc_addr)
        .await
        .context("starting RPC server")?;

    info!("node ready");
    rpc_handle.stopped().await;
    Ok(())
}
