//! `product_service`: product catalog over HTTP, dispatched through a
//! validating mediator.
//!
//! Usage:
//!   product_service [--config <path>] [--bind <addr>] [--backend memory|sqlite]

mod app_system;
mod config;
mod domain;
mod error;
mod http;
mod mediator;
mod product;
mod repository;
mod validation;

#[cfg(test)]
mod mock_framework;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::app_system::{setup_tracing, ProductSystem};
use crate::config::{AppConfig, StorageBackend};
use crate::http::AppState;

/// Product service.
#[derive(Parser, Debug)]
#[command(name = "product_service", about = "Product catalog service")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Listen address (overrides `[server] bind`).
    #[arg(long = "bind")]
    bind: Option<String>,

    /// Storage backend (overrides `[storage] backend`).
    #[arg(long = "backend", value_enum)]
    backend: Option<StorageBackend>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())
        .context("loading configuration")?
        .override_with(cli.bind, cli.backend);

    // Setup tracing once for the entire application
    setup_tracing(&config.logging.filter);

    info!(backend = ?config.storage.backend, "Starting product service");
    let system = ProductSystem::start(&config).await?;

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("binding {}", config.server.bind))?;

    let shutdown = system.shutdown_token();
    let state = AppState::new(system.mediator.clone(), shutdown.clone());
    let server = tokio::spawn(http::serve(listener, state, shutdown.clone()));

    tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
    info!("Ctrl-C received");
    shutdown.cancel();

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!(error = %e, "HTTP server error"),
        Err(e) => error!(error = %e, "HTTP server task failed"),
    }

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Product service stopped");
    Ok(())
}
