// ABOUTME: Domain constants re-exported from glaze-core
// ABOUTME: Thresholds, rounding, units, and service identity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

pub use glaze_core::constants::*;
