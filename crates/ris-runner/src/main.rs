//! # ris-tail
//!
//! Tail the RIPE RIS Live BGP feed and print one line per UPDATE.
//!
//! # Usage
//!
//! ```bash
//! ris-tail                                   # all collectors, all of IPv4
//! ris-tail --prefix 151.101.0.0/16           # one address block, all collectors
//! ris-tail --host rrc21 --log-level debug    # one collector
//! ris-tail --config ris.json
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ipnet::IpNet;
use ris_core::config::{ClientConfig, load_config};
use ris_core::ws::LoopExit;
use ris_feed::session::run_session;
use tokio::sync::watch;
use tracing::{error, info, warn};

/// RIS Live BGP update tail.
#[derive(Parser)]
#[command(name = "ris-tail", about = "Subscribe to RIS Live and log BGP updates")]
struct Cli {
    /// Optional configuration file (JSON). Flags below override it.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// WebSocket endpoint.
    #[arg(long)]
    url: Option<String>,

    /// Client name sent to RIS Live as the `client` query parameter.
    #[arg(long)]
    client: Option<String>,

    /// Only receive messages from this collector (e.g. rrc21).
    #[arg(long)]
    host: Option<String>,

    /// Only receive updates for prefixes inside this CIDR block.
    #[arg(long)]
    prefix: Option<IpNet>,

    /// Keepalive interval in seconds.
    #[arg(long)]
    ping_interval: Option<u64>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Optional log directory for file output.
    #[arg(long)]
    log_dir: Option<String>,
}

impl Cli {
    /// File config (or defaults) with command-line overrides applied.
    fn client_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => {
                load_config(path).with_context(|| format!("failed to load config {}", path.display()))?
            }
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.url {
            config.url = url.clone();
        }
        if let Some(client) = &self.client {
            config.client = Some(client.clone());
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(prefix) = self.prefix {
            config.prefix = prefix;
        }
        if let Some(secs) = self.ping_interval {
            config.ping_interval_sec = secs;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Initialize logging
    ris_core::logging::init_logging(&cli.log_level, cli.log_dir.as_deref(), "ris-tail")?;

    // 2. Resolve configuration
    let config = cli.client_config()?;
    info!(
        "ris-tail starting: url={}, host={:?}, prefix={}, ping={}s",
        config.url, config.host, config.prefix, config.ping_interval_sec,
    );

    // 3. Ctrl+C flips the shutdown flag once
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("unable to listen for interrupt signal: {e}");
                // Keep the sender alive: a dropped sender is not an interrupt.
                std::future::pending::<()>().await;
            }
        }
    });

    // 4. Run until interrupted or the connection dies
    let report = run_session(&config, shutdown_rx).await?;

    match report.exit {
        LoopExit::Interrupted { .. } => info!("shut down cleanly"),
        LoopExit::WriteFailed(reason) => warn!("connection lost: {reason}"),
    }
    Ok(())
}
