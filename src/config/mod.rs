// ABOUTME: Configuration management module for centralized server settings
// ABOUTME: Handles environment configs, database location, and feasibility thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Configuration module
//!
//! - **Environment**: Server configuration from environment variables
//! - **Database**: `SQLite` location parsing
//! - **Production**: Threshold tables and missing-material policy

/// Database location configuration
pub mod database;
/// Environment and server configuration
pub mod environment;
/// Feasibility calculator configuration
pub mod production;

pub use database::{DatabaseConfig, DatabaseUrl};
pub use environment::{CorsConfig, ServerConfig};
pub use production::{MissingMaterialPolicy, ProductionConfig, StockThresholds, ThresholdTable};
