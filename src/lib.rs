// ABOUTME: Main library entry point for the glaze stock server
// ABOUTME: Tracks ceramic glaze materials, purchases, recipes, and production feasibility
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

#![deny(unsafe_code)]

//! # Glaze Stock Server
//!
//! An HTTP backend for a ceramics workshop. It keeps the stock of raw glaze
//! materials (bases and oxides), records purchases, stores recipes as
//! percentage compositions, and answers the question "can I make this much
//! of this glaze right now?" before decrementing stock for a confirmed run.
//!
//! ## Architecture
//!
//! - **Production**: pure feasibility calculator and two-phase confirmation
//! - **Database**: `SQLite` storage behind per-table managers and `StockStore`
//! - **Services**: production workflow over storage
//! - **Routes**: axum routers per domain
//! - **Config**: environment-only configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use glaze_stock_server::config::ServerConfig;
//! use glaze_stock_server::errors::AppResult;
//!
//! fn main() -> AppResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("{}", config.summary());
//!     Ok(())
//! }
//! ```

/// Configuration management
pub mod config;

/// Domain constants re-exported from `glaze-core`
pub mod constants;

/// `SQLite` storage and the stock store abstraction
pub mod database;

/// Unified error handling
pub mod errors;

/// Structured logging setup
pub mod logging;

/// HTTP middleware layers
pub mod middleware;

/// Domain models re-exported from `glaze-core`
pub mod models;

/// Production feasibility and confirmation logic
pub mod production;

/// Shared handler resources
pub mod resources;

/// HTTP routes
pub mod routes;

/// Router assembly and serving
pub mod server;

/// Domain services
pub mod services;
