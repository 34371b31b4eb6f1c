// ABOUTME: Pure production-feasibility calculator over a recipe composition and a stock snapshot
// ABOUTME: Computes required masses, remaining stock, traffic-light colors, and maximum producible mass
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Feasibility calculator
//!
//! [`simulate`] performs no I/O. Callers hand it a composition, a target
//! mass, and anything implementing [`StockLookup`]; the same inputs always
//! produce the same [`FeasibilityReport`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::{MissingMaterialPolicy, ProductionConfig, ThresholdTable};
use crate::constants::composition::BASE_PERCENT_TOTAL;
use crate::constants::rounding::round2;
use crate::errors::{AppError, AppResult};
use crate::models::{CompositionEntry, StockLevel};

/// Read-only view of material stock used during a simulation
pub trait StockLookup {
    /// Stock of a normalised material name, `None` when the material is unknown
    fn stock_of(&self, material: &str) -> Option<StockLevel>;
}

impl StockLookup for HashMap<String, StockLevel> {
    fn stock_of(&self, material: &str) -> Option<StockLevel> {
        self.get(material).copied()
    }
}

/// Outcome label for one material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    /// Enough stock remains after production
    Ok,
    /// Remaining stock would fall below the black threshold
    Insufficient,
    /// Material does not exist in stock
    InsufficientAbsent,
}

/// Traffic-light color of the remaining stock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockColor {
    /// Production refused
    Black,
    /// Critically low
    Red,
    /// Low
    Orange,
    /// Comfortable
    Green,
}

impl StockColor {
    /// Red or orange: production needs an explicit override
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(self, Self::Red | Self::Orange)
    }
}

/// Classify a remaining mass against a threshold table
///
/// Bounds are strict: a remaining mass equal to a threshold falls in the
/// better band.
#[must_use]
pub fn classify(remaining_after: f64, table: &ThresholdTable) -> (StockStatus, StockColor) {
    if remaining_after < table.black {
        (StockStatus::Insufficient, StockColor::Black)
    } else if remaining_after < table.red {
        (StockStatus::Ok, StockColor::Red)
    } else if remaining_after < table.orange {
        (StockStatus::Ok, StockColor::Orange)
    } else {
        (StockStatus::Ok, StockColor::Green)
    }
}

/// Per-material line of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialReport {
    /// Material name
    pub material: String,
    /// Mass consumed by the production run
    pub required_mass: f64,
    /// Current stock (0 when absent)
    pub available: f64,
    /// Stock left after the run
    pub remaining_after: f64,
    /// Status label
    pub status: StockStatus,
    /// Traffic-light color
    pub color: StockColor,
    /// Shortfall against the required mass
    pub missing: f64,
}

/// Result of a simulated production run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// Recipe name
    pub recipe: String,
    /// Requested output mass
    pub demand: f64,
    /// True when no material is black
    pub production_possible: bool,
    /// Largest output mass the current stock allows
    pub max_producible: f64,
    /// One line per composition entry, in composition order
    pub details: Vec<MaterialReport>,
}

impl FeasibilityReport {
    /// Lines that block production
    #[must_use]
    pub fn blocking(&self) -> Vec<MaterialReport> {
        self.details
            .iter()
            .filter(|line| line.color == StockColor::Black)
            .cloned()
            .collect()
    }

    /// Lines that require an override
    #[must_use]
    pub fn warnings(&self) -> Vec<MaterialReport> {
        self.details
            .iter()
            .filter(|line| line.color.is_warning())
            .cloned()
            .collect()
    }
}

/// Check a requested production mass
///
/// # Errors
///
/// Returns `MissingRequiredField` when absent, `InvalidInput` when not a
/// finite positive number
pub fn validate_demand(demand: Option<f64>) -> AppResult<f64> {
    let demand = demand.ok_or_else(|| AppError::missing_field("mass"))?;
    if !demand.is_finite() || demand <= 0.0 {
        return Err(AppError::invalid_input(format!(
            "Field 'mass' must be a positive number, got {demand}"
        )));
    }
    Ok(demand)
}

/// Simulate producing `demand` of a recipe against a stock snapshot
///
/// # Errors
///
/// Returns `InvalidInput` if `demand` is not a finite positive number
pub fn simulate<S>(
    recipe: &str,
    composition: &[CompositionEntry],
    demand: f64,
    stock: &S,
    config: &ProductionConfig,
) -> AppResult<FeasibilityReport>
where
    S: StockLookup + ?Sized,
{
    let demand = validate_demand(Some(demand))?;

    let mut details = Vec::with_capacity(composition.len());
    let mut min_ratio = f64::INFINITY;
    let mut absent_required = false;

    for entry in composition {
        let required_mass = round2(entry.percentage / BASE_PERCENT_TOTAL * demand);

        let Some(level) = stock.stock_of(&entry.material) else {
            if required_mass > 0.0 {
                absent_required = true;
            }
            details.push(MaterialReport {
                material: entry.material.clone(),
                required_mass,
                available: 0.0,
                remaining_after: round2(-required_mass),
                status: StockStatus::InsufficientAbsent,
                color: StockColor::Black,
                missing: required_mass,
            });
            continue;
        };

        let available = level.quantity;
        let remaining_after = round2(available - required_mass);
        let (status, color) =
            classify(remaining_after, config.thresholds.for_category(level.category));

        if required_mass > 0.0 {
            min_ratio = min_ratio.min(available / required_mass);
        }

        details.push(MaterialReport {
            material: entry.material.clone(),
            required_mass,
            available,
            remaining_after,
            status,
            color,
            missing: round2((required_mass - available).max(0.0)),
        });
    }

    let forced_zero =
        absent_required && config.missing_material_policy == MissingMaterialPolicy::ForceZero;
    let max_producible = if forced_zero || !min_ratio.is_finite() || min_ratio <= 0.0 {
        0.0
    } else {
        round2(min_ratio * demand)
    };

    Ok(FeasibilityReport {
        recipe: recipe.to_owned(),
        demand,
        production_possible: details.iter().all(|line| line.color != StockColor::Black),
        max_producible,
        details,
    })
}
