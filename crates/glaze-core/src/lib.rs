// ABOUTME: Core types and constants for the glaze stock server
// ABOUTME: Foundation crate with error handling, stock thresholds, and domain models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

#![deny(unsafe_code)]

//! # Glaze Core
//!
//! Foundation crate providing shared types and constants for the glaze stock
//! server. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Stock thresholds, units, and numeric tolerances
//! - **models**: Materials, recipes, compositions, and purchases

/// Unified error handling system with standard error codes and HTTP responses
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Material, Recipe, Purchase)
pub mod models;
