// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides quiet logging, in-memory databases, and seeded server resources
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used
)]
//! Shared test utilities for `glaze_stock_server`

use std::sync::{Arc, Once};

use glaze_stock_server::{
    config::{ProductionConfig, ServerConfig},
    database::{CreateRecipeRequest, Database, RecordPurchaseRequest, StockStore},
    models::MaterialCategory,
    resources::ServerResources,
    server::build_router,
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Database {
    init_test_logging();
    Database::in_memory().await.unwrap()
}

/// Server resources over a fresh in-memory database
pub async fn create_test_resources() -> Arc<ServerResources> {
    create_test_resources_with(ProductionConfig::default()).await
}

/// Server resources with a custom production configuration
pub async fn create_test_resources_with(production: ProductionConfig) -> Arc<ServerResources> {
    let database = create_test_database().await;
    let config = ServerConfig {
        production,
        ..ServerConfig::default()
    };
    Arc::new(ServerResources::new(database, Arc::new(config)))
}

/// Full application router over the given resources
pub fn test_router(resources: &Arc<ServerResources>) -> axum::Router {
    build_router(resources)
}

/// Store the "Base Claire" recipe: kaolin 60 %, silice 40 %
pub async fn create_base_claire(database: &Database) {
    database
        .recipes()
        .create(&CreateRecipeRequest {
            name: "Base Claire".to_owned(),
            base: [("kaolin", 60.0), ("silice", 40.0)].into_iter().collect(),
            ..CreateRecipeRequest::default()
        })
        .await
        .unwrap();
}

/// Set a material's stock, creating it first if needed
pub async fn set_stock(database: &Database, name: &str, category: MaterialCategory, quantity: f64) {
    let materials = database.materials();
    if materials.get_by_name(name).await.unwrap().is_none() {
        materials.create(name, category, None).await.unwrap();
    }
    materials.put(name, quantity).await.unwrap();
}

/// Record a purchase of an existing material
pub async fn buy(database: &Database, name: &str, quantity: f64, price: f64) -> f64 {
    database
        .purchases()
        .record(&RecordPurchaseRequest {
            name: name.to_owned(),
            quantity: Some(quantity),
            price: Some(price),
            ..RecordPurchaseRequest::default()
        })
        .await
        .unwrap()
        .new_stock
}
