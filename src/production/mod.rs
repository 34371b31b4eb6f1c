// ABOUTME: Production planning: pure feasibility calculator and two-phase confirmation
// ABOUTME: Neither submodule touches storage; services apply the resulting deltas
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

/// Two-phase confirmation state machine
pub mod confirmation;
/// Feasibility calculator
pub mod feasibility;

pub use confirmation::{
    decide, rejection_error, ConfirmationDecision, ProductionOutcome, StockAfter, StockDelta,
};
pub use feasibility::{
    classify, simulate, validate_demand, FeasibilityReport, MaterialReport, StockColor,
    StockLookup, StockStatus,
};
