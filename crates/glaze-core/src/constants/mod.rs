// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Stock thresholds, units, and numeric tolerances for the glaze platform
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single
//! large list. Runtime-tunable values (thresholds) only provide defaults
//! here; the server configuration may override them.

/// Default remaining-stock thresholds (in grams) used to color a material
/// after a simulated production run.
pub mod thresholds {
    /// Base material: below this remaining mass production is refused
    pub const BASE_BLACK_G: f64 = 100.0;
    /// Base material: below this remaining mass stock is critically low
    pub const BASE_RED_G: f64 = 200.0;
    /// Base material: below this remaining mass stock is low
    pub const BASE_ORANGE_G: f64 = 300.0;

    /// Oxide: below this remaining mass production is refused
    pub const OXIDE_BLACK_G: f64 = 5.0;
    /// Oxide: below this remaining mass stock is critically low
    pub const OXIDE_RED_G: f64 = 20.0;
    /// Oxide: below this remaining mass stock is low
    pub const OXIDE_ORANGE_G: f64 = 30.0;
}

/// Recipe composition rules
pub mod composition {
    /// Required sum of base percentages
    pub const BASE_PERCENT_TOTAL: f64 = 100.0;
    /// Tolerance when comparing the base percentage sum against 100
    pub const BASE_PERCENT_TOLERANCE: f64 = 1e-9;
}

/// Measurement units
pub mod units {
    /// Default unit for newly created materials
    pub const DEFAULT_UNIT: &str = "g";
}

/// Numeric formatting
pub mod rounding {
    /// Decimal places kept in masses and prices returned to clients
    pub const DECIMAL_PLACES: i32 = 2;

    /// Round a value half away from zero to [`DECIMAL_PLACES`] decimals
    #[must_use]
    pub fn round2(value: f64) -> f64 {
        let factor = 10f64.powi(DECIMAL_PLACES);
        (value * factor).round() / factor
    }
}

/// Date formats
pub mod dates {
    /// Accepted purchase date format
    pub const PURCHASE_DATE_FORMAT: &str = "%Y-%m-%d";
}

/// Service identity
pub mod service {
    /// Service name used in logs
    pub const SERVICE_NAME: &str = "glaze-stock-server";
    /// API version reported in response metadata
    pub const API_VERSION: &str = "1.0";
}

#[cfg(test)]
mod tests {
    use super::rounding::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(1666.666_666), 1666.67);
        assert_eq!(round2(300.0), 300.0);
        assert_eq!(round2(-0.004), -0.0);
        assert_eq!(round2(12.345_1), 12.35);
    }
}
