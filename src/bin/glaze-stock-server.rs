// ABOUTME: Server binary for the glaze stock HTTP API
// ABOUTME: Loads configuration, opens the database, and serves until shutdown
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! # Glaze Stock Server Binary

use anyhow::Result;
use clap::Parser;
use glaze_stock_server::{
    config::{DatabaseUrl, ServerConfig},
    database::Database,
    logging,
    resources::ServerResources,
    server,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "glaze-stock-server")]
#[command(about = "Glaze Stock Server - materials, recipes, purchases, and production planning")]
pub struct Args {
    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,

    /// Override database URL (`sqlite:<path>` or `sqlite::memory:`)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::from_env()?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    if let Some(url) = args.database_url.as_deref() {
        config.database.url = DatabaseUrl::parse_url(url)?;
    }

    info!("Starting Glaze Stock Server");
    info!("{}", config.summary());

    let database = Database::connect(&config.database).await?;
    let resources = Arc::new(ServerResources::new(database, Arc::new(config)));

    if let Err(e) = server::run(resources).await {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
