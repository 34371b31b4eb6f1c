// ABOUTME: Domain service layer for business logic extracted from route handlers
// ABOUTME: Keeps HTTP handlers thin by owning multi-step stock workflows
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Domain service layer
//!
//! Services combine storage managers with the pure production logic so that
//! route handlers only translate HTTP to calls and back.

/// Production simulation and confirmation
pub mod production;

pub use production::ProductionService;
