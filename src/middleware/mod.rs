// ABOUTME: HTTP middleware layers applied to the API router
// ABOUTME: Currently provides CORS configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

/// CORS configuration
pub mod cors;

pub use cors::setup_cors;
