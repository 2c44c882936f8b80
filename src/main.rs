//! On-chain ML Model Registry Service
//!
//! A backend service that registers machine learning models and their
//! validation records on an Ethereum-compatible blockchain, built with
//! Tokio, Axum and Alloy.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────────────────┐
//!                  │                    MODEL REGISTRY                       │
//!                  │                                                         │
//!   HTTP Request   │  ┌─────────┐    ┌──────────┐    ┌───────────────┐      │
//!   ───────────────┼─▶│  http   │───▶│ registry │───▶│   contract    │      │
//!                  │  │ server  │    │  client  │    │binding+events │      │
//!                  │  └─────────┘    └──────────┘    └───────┬───────┘      │
//!                  │                                         │              │
//!                  │                                         ▼              │
//!                  │                                 ┌───────────────┐      │
//!   HTTP Response  │                                 │     chain     │      │    Ethereum
//!   ◀──────────────┼─────────────────────────────────│signer + orch- │◀─────┼─── JSON-RPC
//!                  │                                 │estrator+client│      │    node
//!                  │                                 └───────────────┘      │
//!                  │                                                        │
//!                  │  ┌──────────────────────────────────────────────────┐  │
//!                  │  │             Cross-Cutting Concerns               │  │
//!                  │  │  ┌─────────┐  ┌──────────────┐  ┌────────────┐   │  │
//!                  │  │  │ config  │  │observability │  │ lifecycle  │   │  │
//!                  │  │  └─────────┘  └──────────────┘  └────────────┘   │  │
//!                  │  └──────────────────────────────────────────────────┘  │
//!                  └────────────────────────────────────────────────────────┘
//! ```
//!
//! Write operations build, sign and broadcast a transaction, then block
//! until the receipt lands or the confirmation window expires. Signing
//! keys arrive with each request and never outlive it.

// Core subsystems
pub mod chain;
pub mod config;
pub mod contract;
pub mod http;
pub mod registry;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::registry::RegistryClient;

#[derive(Parser)]
#[command(name = "model-registry")]
#[command(about = "Blockchain-backed ML model registry service", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to a TOML configuration file. Without it, configuration
    /// comes from defaults plus REGISTRY_* environment overrides.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::loader::load_config(path)?,
        None => config::loader::config_from_env()?,
    };

    observability::logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "model-registry starting"
    );

    tracing::info!(
        bind_address = %config.server.bind_address,
        api_prefix = %config.server.api_prefix,
        rpc_url = %config.chain.rpc_url,
        chain_id = config.chain.chain_id,
        contract_address = ?config.contract.address,
        "Configuration loaded"
    );

    // Initialize metrics server
    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            crate::observability::metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    // Connect the registry. Comes up degraded (not down) when the
    // contract address is missing or the chain is unreachable.
    let registry = Arc::new(RegistryClient::connect(&config).await?);

    // Bind TCP listener
    let listener = TcpListener::bind(&config.server.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Ctrl+C triggers graceful shutdown
    let shutdown = Shutdown::new();
    let server_rx = shutdown.subscribe();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        shutdown.trigger();
    });

    // Create and run HTTP server
    let server = HttpServer::new(&config, registry);
    server.run(listener, server_rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
