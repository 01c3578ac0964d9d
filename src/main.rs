//! Sybil verifier service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (edge: prefix, OPTIONS, 405)
//!                         │
//!                         ▼
//!                     routing (".*/verify", "/")
//!                         │
//!                         ▼
//!                     verify::handler ──▶ upstream::twitter (post lookup)
//!                         │          ──▶ upstream::github  (read + guarded write)
//!                         ▼
//!     Client Response ◀── status + status text (+ CORS)
//!
//!     Cross-cutting: config, observability, resilience, lifecycle
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use sybil_verifier::config::{self, schema::Credentials};
use sybil_verifier::lifecycle::{wait_for_signal, Shutdown};
use sybil_verifier::observability::{logging, metrics};
use sybil_verifier::HttpServer;

#[derive(Parser)]
#[command(name = "sybil-verifier")]
#[command(about = "Verifies signed social posts and records them in the Sybil list", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "SYBIL_VERIFIER_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = config::load_or_default(args.config.as_deref())?;
    logging::init(&config.observability)?;

    tracing::info!("sybil-verifier v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mount_prefix = %config.server.mount_prefix,
        conflict_retries = config.retries.conflict_retries,
        "Configuration loaded"
    );

    let credentials = Credentials::from_env()?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, &credentials)?;

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Shutdown requested, draining in-flight requests");
        shutdown.trigger();
    });

    server.run(listener, shutdown_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
