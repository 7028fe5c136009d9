use anyhow::{Context, Result};
use axum::{Router, routing::get};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::prelude::*;

use room_relay::RelayHub;

mod config;
mod health;
mod metrics;
mod names;
mod net;
mod ws;

use crate::metrics::ServerMetrics;

#[derive(Parser)]
#[command(name = "couch")]
#[command(about = "Event relay for couch multiplayer - one host screen, many phone controllers")]
struct Cli {
    /// Host to bind to (overrides config)
    #[arg(short = 'b', long)]
    host: Option<String>,

    /// Port for the web server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

/// Shared state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub hub: Arc<RelayHub>,
    pub metrics: Arc<ServerMetrics>,
    /// Outbound queue depth per connection.
    pub outbound_queue: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_directive = if cli.debug {
        "couch_hub=debug,room_relay=debug,tower_http=debug,info"
    } else {
        "couch_hub=info,room_relay=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_directive));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_filter)
        .init();

    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port)
        .parse::<SocketAddr>()
        .context("invalid host/port")?;

    // Computed once; rooms created later all carry the same hint.
    let address_hint = net::server_address_hint(config.server.port);

    let mut hub =
        RelayHub::new(names::room_names()).with_name_attempts(config.relay.name_attempts);
    if let Some(hint) = &address_hint {
        hub = hub.with_server_address(hint);
    }

    let state = AppState {
        hub: Arc::new(hub),
        metrics: Arc::new(ServerMetrics::new()),
        outbound_queue: config.relay.outbound_queue,
    };

    let app = Router::new()
        .route("/ws", get(ws::ws_handler))
        .route("/health", get(health::health_handler))
        .route("/health/live", get(health::health_live_handler))
        .route("/metrics", get(health::metrics_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    let actual_addr = listener.local_addr()?;

    info!("Couch Hub listening on http://{}", actual_addr);
    match &address_hint {
        Some(hint) => info!("Controllers connect via ws://{}/ws", hint),
        None => info!("No LAN address detected - controllers must use the bind address"),
    }

    let shutdown_signal = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
        info!("Received shutdown signal");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("Server error")
}
