// ABOUTME: Production feasibility configuration: threshold tables and missing-material policy
// ABOUTME: Defaults come from glaze-core constants and can be overridden from the environment
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use crate::constants::thresholds;
use crate::errors::{AppError, AppResult};
use crate::models::MaterialCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Remaining-stock limits for one material category
///
/// A remaining mass strictly below `black` is insufficient, below `red` is
/// critical, below `orange` is low, anything else is comfortable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTable {
    /// Production refused below this remaining mass
    pub black: f64,
    /// Critically low below this remaining mass
    pub red: f64,
    /// Low below this remaining mass
    pub orange: f64,
}

impl ThresholdTable {
    /// Check that limits are finite, non-negative, and ordered
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` naming the offending table
    pub fn validate(&self, label: &str) -> AppResult<()> {
        let limits = [self.black, self.red, self.orange];
        if limits.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(AppError::config_invalid(format!(
                "{label} thresholds must be finite and non-negative"
            )));
        }
        if self.black > self.red || self.red > self.orange {
            return Err(AppError::config_invalid(format!(
                "{label} thresholds must satisfy black <= red <= orange, got {} / {} / {}",
                self.black, self.red, self.orange
            )));
        }
        Ok(())
    }
}

/// Threshold tables for both material categories
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockThresholds {
    /// Limits applied to base materials
    pub base: ThresholdTable,
    /// Limits applied to oxides
    pub oxide: ThresholdTable,
}

impl StockThresholds {
    /// Table for a material category
    #[must_use]
    pub const fn for_category(&self, category: MaterialCategory) -> &ThresholdTable {
        match category {
            MaterialCategory::Base => &self.base,
            MaterialCategory::Oxide => &self.oxide,
        }
    }

    /// Validate both tables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if either table is malformed
    pub fn validate(&self) -> AppResult<()> {
        self.base.validate("Base")?;
        self.oxide.validate("Oxide")
    }
}

impl Default for StockThresholds {
    fn default() -> Self {
        Self {
            base: ThresholdTable {
                black: thresholds::BASE_BLACK_G,
                red: thresholds::BASE_RED_G,
                orange: thresholds::BASE_ORANGE_G,
            },
            oxide: ThresholdTable {
                black: thresholds::OXIDE_BLACK_G,
                red: thresholds::OXIDE_RED_G,
                orange: thresholds::OXIDE_ORANGE_G,
            },
        }
    }
}

/// How a material missing from stock affects the maximum producible mass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingMaterialPolicy {
    /// Any absent material with a positive requirement forces the maximum to zero
    #[default]
    ForceZero,
    /// Absent materials are left out of the ratio computation
    Exclude,
}

impl MissingMaterialPolicy {
    /// Parse from configuration string
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` for unknown values
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "force_zero" | "force-zero" | "zero" => Ok(Self::ForceZero),
            "exclude" => Ok(Self::Exclude),
            other => Err(AppError::config_invalid(format!(
                "Invalid MISSING_MATERIAL_POLICY '{other}': use 'force_zero' or 'exclude'"
            ))),
        }
    }
}

impl fmt::Display for MissingMaterialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForceZero => write!(f, "force_zero"),
            Self::Exclude => write!(f, "exclude"),
        }
    }
}

/// Settings consumed by the feasibility calculator
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ProductionConfig {
    /// Threshold tables per category
    pub thresholds: StockThresholds,
    /// Treatment of absent materials in the maximum-production ratio
    pub missing_material_policy: MissingMaterialPolicy,
}
