//! HTTP forwarding gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────────────┐
//!                    │                       GATEWAY                        │
//!                    │                                                      │
//!   Client Request   │  ┌──────────┐    ┌──────────────┐    ┌────────────┐  │
//!   ─────────────────┼─▶│   http   │───▶│   routing    │───▶│ forwarding │  │
//!                    │  │  server  │    │dispatch table│    │ operation  │  │
//!                    │  └──────────┘    └──────────────┘    └─────┬──────┘  │
//!                    │                                            │         │
//!                    │                                   url + headers      │
//!                    │                                            ▼         │
//!   Client Response  │  ┌──────────┐                       ┌────────────┐   │
//!   ◀────────────────┼──│ response │◀──── BackendOutcome ──│  outbound  │◀──┼── Backend
//!                    │  │  relay   │                       │   client   │   │
//!                    │  └──────────┘                       └────────────┘   │
//!                    │                                                      │
//!                    │   config · observability · security · lifecycle      │
//!                    └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use edge_gateway::config::load_config;
use edge_gateway::lifecycle::signals::forward_signals;
use edge_gateway::observability::{logging, metrics};
use edge_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-gateway")]
#[command(about = "Forwards a stable public API to its backend services", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Configuration errors are fatal before anything is bound
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "edge-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_url = %config.upstream.backend_url,
        dashboard_url = %config.upstream.dashboard_url,
        connect_timeout_secs = config.timeouts.connect_secs,
        read_timeout_secs = config.timeouts.read_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let mut serving = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut serving => {
            // Server stopped on its own; surface why.
            result??;
            return Ok(());
        }
        _ = forward_signals(&shutdown) => {}
    }
    serving.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
