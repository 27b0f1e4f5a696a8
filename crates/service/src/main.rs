//! deaddropd - the blind relay daemon.
//!
//! Stores public keys and sealed envelopes. Holds no private keys and
//! cannot read what passes through it.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use deaddrop_service::{process, IdentityMode, ServiceConfig};

/// deaddrop relay - blind store-and-forward for sealed envelopes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on for HTTP requests
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Path to the database file (omit for the in-memory store)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// How identities are assigned (server-assigned or client-chosen)
    #[arg(long)]
    identity_mode: Option<IdentityMode>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level: tracing::Level = args.log_level.parse().unwrap_or(tracing::Level::INFO);

    let mut config = ServiceConfig::default();
    config.log_level = log_level;
    config.apply_env()?;

    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }
    if let Some(db_path) = args.database {
        config.db_path = Some(db_path);
    }
    if let Some(mode) = args.identity_mode {
        config.identity_mode = mode;
    }

    let _guard = process::init_logging(&config);

    tracing::info!("starting deaddrop relay on {}", config.listen_addr);

    process::run(&config).await?;

    Ok(())
}
