// ABOUTME: Tests for environment-driven server configuration
// ABOUTME: Runs serially because each test mutates process environment variables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;

use glaze_stock_server::{
    config::{DatabaseUrl, MissingMaterialPolicy, ServerConfig},
    errors::ErrorCode,
};
use serial_test::serial;

const VARS: &[&str] = &[
    "HTTP_HOST",
    "HTTP_PORT",
    "PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "AUTO_MIGRATE",
    "CORS_ALLOWED_ORIGINS",
    "MISSING_MATERIAL_POLICY",
    "BASE_BLACK_THRESHOLD",
    "BASE_RED_THRESHOLD",
    "BASE_ORANGE_THRESHOLD",
    "OXIDE_BLACK_THRESHOLD",
    "OXIDE_RED_THRESHOLD",
    "OXIDE_ORANGE_THRESHOLD",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_env();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 5000);
    assert_eq!(config.bind_address(), "0.0.0.0:5000");
    assert!(config.database.auto_migrate);
    assert!(!config.database.url.is_memory());
    assert_eq!(config.cors.allowed_origins, "*");
    assert_eq!(config.production.thresholds.base.black, 100.0);
    assert_eq!(config.production.thresholds.oxide.black, 5.0);
    assert_eq!(
        config.production.missing_material_policy,
        MissingMaterialPolicy::ForceZero
    );
}

#[test]
#[serial]
fn test_overrides_from_environment() {
    clear_env();
    env::set_var("HTTP_PORT", "8081");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("AUTO_MIGRATE", "false");
    env::set_var("OXIDE_BLACK_THRESHOLD", "2.5");
    env::set_var("MISSING_MATERIAL_POLICY", "exclude");

    let config = ServerConfig::from_env().unwrap();
    clear_env();

    assert_eq!(config.http_port, 8081);
    assert!(matches!(config.database.url, DatabaseUrl::Memory));
    assert!(!config.database.auto_migrate);
    assert_eq!(config.production.thresholds.oxide.black, 2.5);
    assert_eq!(config.production.thresholds.oxide.red, 20.0);
    assert_eq!(
        config.production.missing_material_policy,
        MissingMaterialPolicy::Exclude
    );
    assert!(config.summary().contains("Missing Material Policy: exclude"));
}

#[test]
#[serial]
fn test_port_fallback() {
    clear_env();
    env::set_var("PORT", "9000");
    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 9000);

    // HTTP_PORT wins over PORT
    env::set_var("HTTP_PORT", "9001");
    let config = ServerConfig::from_env().unwrap();
    clear_env();
    assert_eq!(config.http_port, 9001);
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_env();
    env::set_var("HTTP_PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    clear_env();
    env::set_var("MISSING_MATERIAL_POLICY", "ignore");
    assert!(ServerConfig::from_env().is_err());

    clear_env();
    // red below black breaks the band ordering
    env::set_var("BASE_RED_THRESHOLD", "50");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigInvalid);

    clear_env();
}
