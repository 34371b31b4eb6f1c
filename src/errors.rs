// ABOUTME: Error handling re-exports for the stock server crate
// ABOUTME: The error taxonomy itself lives in glaze-core so models can share it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

pub use glaze_core::errors::*;
