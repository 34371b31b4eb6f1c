// ABOUTME: Purchase model for the append-only acquisition log
// ABOUTME: Each purchase increases the referenced material's stock when recorded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::material::MaterialCategory;

/// A recorded acquisition of a material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    /// Unique identifier
    pub id: Uuid,
    /// Purchased material id
    pub material_id: Uuid,
    /// Purchased material name
    pub material: String,
    /// Category of the purchased material
    pub category: MaterialCategory,
    /// Quantity acquired, in the material's unit
    pub quantity: f64,
    /// Price paid for this purchase
    pub price: f64,
    /// Supplier name, if given
    pub supplier: Option<String>,
    /// Purchase date
    pub date: NaiveDate,
    /// Time the purchase was recorded
    pub created_at: DateTime<Utc>,
}
