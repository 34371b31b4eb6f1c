// ABOUTME: Core data models re-exported from glaze-core
// ABOUTME: Materials, recipes with compositions, and purchases
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

pub use glaze_core::models::*;
