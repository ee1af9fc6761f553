//! Ethereum balance exporter.
//!
//! # Architecture Overview
//!
//! ```text
//!   Prometheus                 ┌───────────────────────────────────────────────┐
//!   GET /metrics ─────────────▶│ http::server ──▶ scrape::executor             │
//!                              │                    │  one task per address    │
//!                              │                    ▼  (bounded, deadline)     │
//!                              │               scrape::resolver                │
//!                              │                    │  per-call timeout        │
//!                              │                    ▼                          │
//!                              │             blockchain::registry ──▶ client ──┼──▶ JSON-RPC
//!                              │                                               │    endpoints
//!   exposition text ◀──────────│ observability::metrics ◀── outcomes           │
//!                              └───────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use ethereum_balance_exporter::config::{load_config, ConfigError};
use ethereum_balance_exporter::observability::logging::{self, LogFormat};
use ethereum_balance_exporter::{HttpServer, NetworkRegistry, Shutdown};

#[derive(Parser)]
#[command(name = "ethereum-balance-exporter", version)]
#[command(about = "Prometheus exporter for Ethereum address balances", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Address to serve /metrics on.
    #[arg(short, long, default_value = "0.0.0.0:8080")]
    listen: String,

    /// Log level (trace, debug, info, warn, error). RUST_LOG overrides it.
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format (text or json).
    #[arg(long, default_value = "text")]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(&cli.log_level, cli.log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "ethereum-balance-exporter starting");

    let config = match load_config(&cli.config) {
        Ok(config) => Arc::new(config),
        Err(ConfigError::Validation(errors)) => {
            eprintln!("Invalid configuration in {}:", cli.config.display());
            for error in &errors {
                eprintln!("  {error}");
            }
            tracing::error!(violations = errors.len(), "Configuration rejected");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("Failed to load {}: {e}", cli.config.display());
            tracing::error!(error = %e, "Configuration could not be loaded");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        networks = config.networks().len(),
        addresses = config.addresses().len(),
        rpc_timeout_secs = config.scrape().rpc_timeout_secs,
        deadline_secs = config.scrape().deadline_secs,
        "Configuration loaded"
    );

    let registry = Arc::new(NetworkRegistry::connect(&config));

    let listener = match TcpListener::bind(&cli.listen).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %cli.listen, error = %e, "Failed to bind listener");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, registry);
    if let Err(e) = server.run(listener, server_shutdown).await {
        tracing::error!(error = %e, "HTTP server failed");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
