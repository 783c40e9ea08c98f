// ABOUTME: Vitals API server binary
// ABOUTME: Loads configuration, opens the record store, and serves the HTTP API until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vitals API Contributors

//! # Vitals API Server Binary
//!
//! Serves the read-only health-metrics API. All settings come from the
//! environment (and an optional `.env` file); the flags below override a few
//! of them for local runs.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use vitals_api::config::{DatabaseUrl, ServerConfig};
use vitals_api::database::Database;
use vitals_api::logging;
use vitals_api::resources::ServerResources;
use vitals_api::server;

#[derive(Parser)]
#[command(name = "vitals-api-server")]
#[command(about = "Vitals API - read-only REST API for daily health metrics")]
struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override the database URL
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Loads .env first so RUST_LOG and LOG_FORMAT from it reach the subscriber
    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http.port = http_port;
    }
    if let Some(url) = args.database_url {
        config.database.url = DatabaseUrl::parse_url(&url)?;
    }

    logging::init_from_env()?;

    info!("Starting Vitals API");
    info!("{}", config.summary());

    let database = Database::new(&config.database).await?;
    let resources = Arc::new(ServerResources::new(config, database)?);

    if let Err(e) = server::serve(resources).await {
        error!("Server error: {e}");
        return Err(e.into());
    }

    Ok(())
}
