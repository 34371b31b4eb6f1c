// ABOUTME: Material model with category and stock quantity
// ABOUTME: Defines MaterialCategory, Material, StockLevel, and name normalisation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::units::DEFAULT_UNIT;
use crate::errors::{AppError, AppResult};

/// Category of a raw material
///
/// The category decides which threshold table applies when a simulated
/// production run is classified, and which recipe partition must sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MaterialCategory {
    /// Main constituent; recipe percentages of bases sum to 100
    #[default]
    Base,
    /// Colorant or additive; percentages are added on top of the base
    #[serde(alias = "oxyde")]
    Oxide,
}

impl MaterialCategory {
    /// Convert to database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Oxide => "oxide",
        }
    }

    /// Parse a user- or database-supplied category
    ///
    /// Accepts the legacy `oxyde` spelling.
    ///
    /// # Errors
    ///
    /// Returns `InvalidFormat` for any other value
    pub fn parse(s: &str) -> AppResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "oxide" | "oxyde" => Ok(Self::Oxide),
            other => Err(AppError::invalid_format(format!(
                "Invalid material category '{other}': use 'base' or 'oxide'"
            ))),
        }
    }
}

/// Normalise a material name into its case-insensitive key
#[must_use]
pub fn normalize_material_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A raw material tracked by stock quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier
    pub id: Uuid,
    /// Normalised unique name
    pub name: String,
    /// Base or oxide
    pub category: MaterialCategory,
    /// Unit of the stock quantity
    pub unit: String,
    /// Current stock quantity
    pub quantity: f64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last stock or metadata change
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Create a material with zero stock
    ///
    /// The name is normalised; an empty unit falls back to grams.
    #[must_use]
    pub fn new(name: &str, category: MaterialCategory, unit: Option<&str>) -> Self {
        let now = Utc::now();
        let unit = unit
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_UNIT);
        Self {
            id: Uuid::new_v4(),
            name: normalize_material_name(name),
            category,
            unit: unit.to_owned(),
            quantity: 0.0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stock snapshot used by the feasibility calculator
    #[must_use]
    pub const fn stock_level(&self) -> StockLevel {
        StockLevel {
            quantity: self.quantity,
            category: self.category,
        }
    }
}

/// Quantity and category of a material at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StockLevel {
    /// Available quantity
    pub quantity: f64,
    /// Category selecting the threshold table
    pub category: MaterialCategory,
}
