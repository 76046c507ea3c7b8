//! Entry point for the holdem server.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use holdem_server::config::Config;
use holdem_server::server::{run_server, AppState};

#[derive(Parser, Debug)]
#[command(name = "holdem-server", version, about = "Multi-table no-limit hold'em server")]
struct Cli {
    /// Listen address; overrides the config file value.
    #[arg(long)]
    listen: Option<String>,

    /// Path to the TOML config (created with defaults if missing).
    #[arg(long, default_value = "holdem.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    let mut cfg = Config::load_or_create(&cli.config)
        .with_context(|| format!("loading or creating config '{}'", cli.config.display()))?;
    if let Some(listen) = cli.listen {
        cfg.listen = listen;
    }

    let addr: SocketAddr = cfg
        .listen
        .parse()
        .with_context(|| format!("invalid listen address '{}'", cfg.listen))?;

    tracing::info!(config = %cli.config.display(), tables = cfg.tables, "starting");
    let state = AppState::new(cfg);
    run_server(addr, state).await
}
