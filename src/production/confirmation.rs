// ABOUTME: Two-phase production confirmation deciding between reject, override prompt, and apply
// ABOUTME: Turns a feasibility report into stock deltas and the client-facing production outcome
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Production confirmation
//!
//! ```text
//! Pending ──black──────────────▶ Rejected
//!    │
//!    ├──warnings, no override──▶ AwaitingOverride ──override=true──▶ Applied
//!    │
//!    └──otherwise──────────────▶ Applied
//! ```
//!
//! Only [`ConfirmationDecision::Apply`] carries stock deltas. The caller
//! applies them atomically and reports [`ProductionOutcome::Applied`].

use serde::{Deserialize, Serialize};

use super::feasibility::{FeasibilityReport, MaterialReport};
use crate::constants::rounding::round2;
use crate::errors::AppError;

/// Signed stock change for one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockDelta {
    /// Material name
    pub material: String,
    /// Change in quantity (negative for consumption)
    pub delta: f64,
}

/// What to do with a simulated production run
#[derive(Debug, Clone, PartialEq)]
pub enum ConfirmationDecision {
    /// At least one material is black
    Reject {
        /// Black lines
        blocking: Vec<MaterialReport>,
    },
    /// Red or orange lines exist and no override was given
    AwaitOverride {
        /// Red and orange lines
        warnings: Vec<MaterialReport>,
    },
    /// Decrement every composition material by its required mass
    Apply {
        /// One negative delta per composition line
        deltas: Vec<StockDelta>,
    },
}

/// Decide the next state for a simulated run
#[must_use]
pub fn decide(report: &FeasibilityReport, override_warnings: bool) -> ConfirmationDecision {
    let blocking = report.blocking();
    if !blocking.is_empty() {
        return ConfirmationDecision::Reject { blocking };
    }

    let warnings = report.warnings();
    if !warnings.is_empty() && !override_warnings {
        return ConfirmationDecision::AwaitOverride { warnings };
    }

    ConfirmationDecision::Apply {
        deltas: report
            .details
            .iter()
            .map(|line| StockDelta {
                material: line.material.clone(),
                delta: -line.required_mass,
            })
            .collect(),
    }
}

/// Post-production stock of one material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAfter {
    /// Material name
    pub material: String,
    /// Stock after the run, rounded to 2 decimals
    pub new_stock: f64,
}

/// Client-facing result of a production request that was not rejected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProductionOutcome {
    /// Nothing was changed; resubmit with `override: true` to proceed
    AwaitingOverride {
        /// Human-readable prompt
        message: String,
        /// Red and orange lines
        details: Vec<MaterialReport>,
    },
    /// Stock was decremented
    Applied {
        /// Human-readable confirmation
        message: String,
        /// Stock of every composition material after the run
        stock_after: Vec<StockAfter>,
    },
}

impl ProductionOutcome {
    /// Advisory outcome for low-stock warnings
    #[must_use]
    pub fn awaiting_override(details: Vec<MaterialReport>) -> Self {
        Self::AwaitingOverride {
            message: "Warning: stock is low for some materials. Resubmit with 'override': true to confirm.".to_owned(),
            details,
        }
    }

    /// Successful outcome with rounded post-production stock
    #[must_use]
    pub fn applied(report: &FeasibilityReport, stock_after: Vec<(String, f64)>) -> Self {
        Self::Applied {
            message: format!(
                "Production of {} g of '{}' completed",
                report.demand, report.recipe
            ),
            stock_after: stock_after
                .into_iter()
                .map(|(material, quantity)| StockAfter {
                    material,
                    new_stock: round2(quantity),
                })
                .collect(),
        }
    }
}

/// Error returned when black materials block production
#[must_use]
pub fn rejection_error(blocking: &[MaterialReport]) -> AppError {
    let names: Vec<&str> = blocking.iter().map(|line| line.material.as_str()).collect();
    AppError::invalid_input(format!(
        "Production impossible: stock too low for {}",
        names.join(", ")
    ))
    .with_details(serde_json::json!({ "details": blocking }))
}
