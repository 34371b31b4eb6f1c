// ABOUTME: Core data models for the glaze stock platform
// ABOUTME: Re-exports Material, Recipe, CompositionEntry, and Purchase structures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! # Data Models
//!
//! - `Material`: a raw ingredient (base or oxide) with its current stock
//! - `Recipe`: a named, ordered composition of materials by percentage
//! - `Purchase`: an append-only acquisition that increases stock
//!
//! Material names are case-insensitive keys: every entry point normalises
//! them with [`normalize_material_name`] before storage or lookup.

mod material;
mod purchase;
mod recipe;

pub use material::{normalize_material_name, Material, MaterialCategory, StockLevel};
pub use purchase::Purchase;
pub use recipe::{build_composition, CompositionEntry, Percentages, Recipe};
