// ABOUTME: Shared server resources injected into every route handler
// ABOUTME: Bundles the database, configuration, and production service behind one Arc
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::database::{Database, StockStore};
use crate::services::ProductionService;

/// Resources shared by all handlers through axum state
#[derive(Clone)]
pub struct ServerResources {
    /// Database handle
    pub database: Database,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Production simulation and confirmation
    pub production: ProductionService,
}

impl ServerResources {
    /// Build resources over an opened database
    #[must_use]
    pub fn new(database: Database, config: Arc<ServerConfig>) -> Self {
        let stock: Arc<dyn StockStore> = Arc::new(database.materials());
        let production =
            ProductionService::new(database.recipes(), stock, config.production);
        Self {
            database,
            config,
            production,
        }
    }
}
