// ABOUTME: Environment-based server configuration loading and summary
// ABOUTME: Reads ports, database location, CORS origins, thresholds, and policy from env vars
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Environment-only configuration
//!
//! The server has no configuration file: every setting comes from an
//! environment variable with a default suitable for local development.

use super::database::{DatabaseConfig, DatabaseUrl, DEFAULT_DATABASE_PATH};
use super::production::{MissingMaterialPolicy, ProductionConfig, StockThresholds, ThresholdTable};
use crate::constants::thresholds;
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::info;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 5000;

/// Default bind address
pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Comma-separated allowed origins, `*` for any
    pub allowed_origins: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: "*".to_owned(),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    pub http_host: String,
    /// Listen port
    pub http_port: u16,
    /// Environment label (development, staging, production)
    pub environment: String,
    /// Database settings
    pub database: DatabaseConfig,
    /// CORS settings
    pub cors: CorsConfig,
    /// Feasibility calculator settings
    pub production: ProductionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_host: DEFAULT_HTTP_HOST.to_owned(),
            http_port: DEFAULT_HTTP_PORT,
            environment: "development".to_owned(),
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
            production: ProductionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` when a variable is present but cannot be parsed,
    /// or when the resulting threshold tables are inconsistent
    pub fn from_env() -> AppResult<Self> {
        info!("Loading configuration from environment variables");

        let http_port = match env::var("HTTP_PORT").or_else(|_| env::var("PORT")) {
            Ok(value) => parse_value("HTTP_PORT", &value)?,
            Err(_) => DEFAULT_HTTP_PORT,
        };

        let thresholds = StockThresholds {
            base: ThresholdTable {
                black: parse_env("BASE_BLACK_THRESHOLD", thresholds::BASE_BLACK_G)?,
                red: parse_env("BASE_RED_THRESHOLD", thresholds::BASE_RED_G)?,
                orange: parse_env("BASE_ORANGE_THRESHOLD", thresholds::BASE_ORANGE_G)?,
            },
            oxide: ThresholdTable {
                black: parse_env("OXIDE_BLACK_THRESHOLD", thresholds::OXIDE_BLACK_G)?,
                red: parse_env("OXIDE_RED_THRESHOLD", thresholds::OXIDE_RED_G)?,
                orange: parse_env("OXIDE_ORANGE_THRESHOLD", thresholds::OXIDE_ORANGE_G)?,
            },
        };
        thresholds.validate()?;

        let config = Self {
            http_host: env_var_or("HTTP_HOST", DEFAULT_HTTP_HOST),
            http_port,
            environment: env_var_or("ENVIRONMENT", "development"),
            database: DatabaseConfig {
                url: DatabaseUrl::parse_url(&env_var_or(
                    "DATABASE_URL",
                    &format!("sqlite:{DEFAULT_DATABASE_PATH}"),
                ))?,
                auto_migrate: parse_env("AUTO_MIGRATE", true)?,
            },
            cors: CorsConfig {
                allowed_origins: env_var_or("CORS_ALLOWED_ORIGINS", "*"),
            },
            production: ProductionConfig {
                thresholds,
                missing_material_policy: MissingMaterialPolicy::parse(&env_var_or(
                    "MISSING_MATERIAL_POLICY",
                    "force_zero",
                ))?,
            },
        };

        Ok(config)
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Get a summary of the configuration for logging
    #[must_use]
    pub fn summary(&self) -> String {
        let thresholds = &self.production.thresholds;
        format!(
            "Glaze Stock Server Configuration:\n\
             - Environment: {}\n\
             - HTTP: {}\n\
             - Database: {}\n\
             - Auto Migrate: {}\n\
             - CORS Origins: {}\n\
             - Base Thresholds (black/red/orange): {} / {} / {}\n\
             - Oxide Thresholds (black/red/orange): {} / {} / {}\n\
             - Missing Material Policy: {}",
            self.environment,
            self.bind_address(),
            self.database.url,
            self.database.auto_migrate,
            self.cors.allowed_origins,
            thresholds.base.black,
            thresholds.base.red,
            thresholds.base.orange,
            thresholds.oxide.black,
            thresholds.oxide.red,
            thresholds.oxide.orange,
            self.production.missing_material_policy,
        )
    }
}

/// Get environment variable or default value
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

/// Parse an optional environment variable, falling back to `default` when unset
fn parse_env<T>(key: &str, default: T) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    env::var(key).map_or(Ok(default), |value| parse_value(key, &value))
}

fn parse_value<T>(key: &str, value: &str) -> AppResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| AppError::config_invalid(format!("Invalid {key} value '{value}': {e}")))
}
