//! airlock-node — the airlock distribution node binary.
//!
//! Startup sequence:
//!   1. Open (or initialise) the state database
//!   2. Build the state engine around the vault ledger
//!   3. Start the JSON-RPC 2.0 server
//!   4. Run until interrupted, flushing state on shutdown

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use airlock_core::types::AccountId;
use airlock_rpc::{RpcServer, RpcServerState};
use airlock_state::{SingleAdmin, StateDb, StateEngine, VaultLedger};

#[derive(Parser, Debug)]
#[command(
    name = "airlock-node",
    version,
    about = "Airlock node — front-running-resistant token distribution with vesting"
)]
struct Args {
    /// Directory for the persistent state database.
    #[arg(long, default_value = "~/.airlock/data")]
    data_dir: PathBuf,

    /// JSON-RPC listen address.
    #[arg(long, default_value = "127.0.0.1:8545")]
    rpc_addr: SocketAddr,

    /// Base-58 account id of the distribution administrator.
    #[arg(long)]
    admin: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,airlock=debug".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    info!("airlock node starting");

    let admin = AccountId::from_b58(&args.admin)
        .map_err(|e| anyhow::anyhow!("invalid --admin account id: {e}"))?;

    // ── State database ────────────────────────────────────────────────────────
    let data_dir = expand_tilde(&args.data_dir);
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data dir {}", data_dir.display()))?;

    let db = Arc::new(StateDb::open(&data_dir).context("opening state database")?);
    let height = db.current_height().context("reading height")?;
    info!(height, "state database open");

    // ── State engine ──────────────────────────────────────────────────────────
    let ledger = VaultLedger::new(Arc::clone(&db));
    let engine = Arc::new(StateEngine::new(
        Arc::clone(&db),
        ledger,
        SingleAdmin(admin),
    ));

    // ── RPC server ────────────────────────────────────────────────────────────
    let rpc_state = Arc::new(RpcServerState { engine });
    let _rpc_handle = RpcServer::new(rpc_state)
        .start(args.rpc_addr)
        .await
        .context("starting RPC server")?;

    info!("node ready");
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;

    info!("shutting down — flushing state");
    db.flush().context("flushing state database")?;
    Ok(())
}

/// Expand a leading `~` to the user's home directory (`HOME` or `USERPROFILE`).
fn expand_tilde(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            return PathBuf::from(home).join(stripped);
        }
    }
    path.to_path_buf()
}
