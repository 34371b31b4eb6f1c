// ABOUTME: Route module organization for the glaze stock HTTP API
// ABOUTME: One router per domain, merged by the server module
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Route module
//!
//! Each domain module contains only route definitions and thin handler
//! functions that delegate to managers and services.

/// Health check routes
pub mod health;
/// Material creation and stock listing routes
pub mod materials;
/// Production simulation and confirmation routes
pub mod production;
/// Purchase recording and history routes
pub mod purchases;
/// Recipe routes
pub mod recipes;

pub use health::HealthRoutes;
pub use materials::MaterialsRoutes;
pub use production::ProductionRoutes;
pub use purchases::PurchasesRoutes;
pub use recipes::RecipesRoutes;
