// ABOUTME: SQLite storage for materials, recipes, and purchases with schema migration
// ABOUTME: Defines the StockStore trait through which production reads and mutates stock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! # Database Management
//!
//! A single [`Database`] owns the connection pool and hands out one manager
//! per table family. Stock mutations go through [`StockStore`] so services
//! never issue ad-hoc updates.

mod materials;
mod purchases;
mod recipes;

pub use materials::{MaterialsManager, StockListing};
pub use purchases::{
    CategoryHistory, PurchaseHistory, PurchaseRecord, PurchasesManager, RecordPurchaseRequest,
    RecordedPurchase,
};
pub use recipes::{CreateRecipeRequest, CreatedRecipe, RecipesManager};

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::config::{DatabaseConfig, DatabaseUrl};
use crate::errors::{AppError, AppResult};
use crate::models::StockLevel;
use crate::production::StockDelta;

/// How long a connection waits for the `SQLite` write lock
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Atomic access to material stock quantities
#[async_trait]
pub trait StockStore: Send + Sync {
    /// Current stock of a material, `None` when unknown
    async fn get(&self, material: &str) -> AppResult<Option<StockLevel>>;

    /// Overwrite the stock quantity of an existing material
    async fn put(&self, material: &str, quantity: f64) -> AppResult<()>;

    /// Add `delta` to a material's stock and return the new quantity
    async fn apply_delta(&self, material: &str, delta: f64) -> AppResult<f64>;

    /// Apply every delta in one transaction, all-or-nothing
    ///
    /// Returns `(material, new_quantity)` in input order.
    async fn apply_deltas(&self, deltas: &[StockDelta]) -> AppResult<Vec<(String, f64)>>;

    /// Stock of the named materials; unknown names are omitted
    async fn snapshot(&self, materials: &[String]) -> AppResult<HashMap<String, StockLevel>>;
}

/// Connection pool plus per-table managers
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the configured database and run migrations when enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created, the
    /// connection fails, or a migration fails
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let pool = match &config.url {
            DatabaseUrl::Memory => {
                let options = SqliteConnectOptions::from_str("sqlite::memory:")
                    .map_err(|e| AppError::config_invalid(format!("Invalid database URL: {e}")))?
                    .foreign_keys(true);
                // Every connection to :memory: is a separate database, so the pool is pinned to one
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
            }
            DatabaseUrl::SQLite { path } => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::storage(format!(
                            "Failed to create data directory {}: {e}",
                            parent.display()
                        ))
                    })?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .foreign_keys(true)
                    .journal_mode(SqliteJournalMode::Wal)
                    .busy_timeout(BUSY_TIMEOUT);
                SqlitePoolOptions::new().connect_with(options).await
            }
        }
        .map_err(|e| AppError::database(format!("Failed to connect to {}: {e}", config.url)))?;

        let db = Self { pool };
        if config.auto_migrate {
            db.migrate().await?;
        }

        info!(url = %config.url, migrated = config.auto_migrate, "Database ready");
        Ok(db)
    }

    /// Open an in-memory database with the schema applied
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migration fails
    pub async fn in_memory() -> AppResult<Self> {
        Self::connect(&DatabaseConfig {
            url: DatabaseUrl::Memory,
            auto_migrate: true,
        })
        .await
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Materials and stock manager
    #[must_use]
    pub fn materials(&self) -> MaterialsManager {
        MaterialsManager::new(self.pool.clone())
    }

    /// Recipes manager
    #[must_use]
    pub fn recipes(&self) -> RecipesManager {
        RecipesManager::new(self.pool.clone())
    }

    /// Purchases manager
    #[must_use]
    pub fn purchases(&self) -> PurchasesManager {
        PurchasesManager::new(self.pool.clone())
    }

    /// Check the connection with a trivial query
    ///
    /// # Errors
    ///
    /// Returns an error if the database does not answer
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Database ping failed: {e}")))?;
        Ok(())
    }

    /// Create tables and indexes if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS materials (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                category TEXT NOT NULL CHECK (category IN ('base', 'oxide')),
                unit TEXT NOT NULL DEFAULT 'g',
                quantity REAL NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                description_url TEXT,
                production_doc_url TEXT,
                created_at TEXT NOT NULL
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS recipe_compositions (
                recipe_id TEXT NOT NULL REFERENCES recipes(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                material_id TEXT NOT NULL REFERENCES materials(id),
                category TEXT NOT NULL CHECK (category IN ('base', 'oxide')),
                percentage REAL NOT NULL,
                PRIMARY KEY (recipe_id, position)
            )
            ",
            r"
            CREATE TABLE IF NOT EXISTS purchases (
                id TEXT PRIMARY KEY,
                material_id TEXT NOT NULL REFERENCES materials(id),
                quantity REAL NOT NULL,
                price REAL NOT NULL,
                supplier TEXT,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_purchases_material ON purchases(material_id)",
            "CREATE INDEX IF NOT EXISTS idx_purchases_date ON purchases(date)",
            "CREATE INDEX IF NOT EXISTS idx_compositions_material ON recipe_compositions(material_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Migration failed: {e}")))?;
        }

        debug!("Database schema is up to date");
        Ok(())
    }
}

/// Begin a transaction that takes the write lock up front
///
/// A deferred `BEGIN` that reads before writing cannot wait for a lock
/// upgrade and fails with `SQLITE_BUSY` under concurrent writers.
async fn begin_write(pool: &SqlitePool) -> AppResult<Transaction<'static, Sqlite>> {
    pool.begin_with("BEGIN IMMEDIATE")
        .await
        .map_err(|e| AppError::database(format!("Failed to begin transaction: {e}")))
}

/// Map an insert failure, turning unique violations into `ResourceAlreadyExists`
fn insert_error(e: &sqlx::Error, resource: &str, context: &str) -> AppError {
    if e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
    {
        AppError::already_exists(resource)
    } else {
        AppError::database(format!("Failed to {context}: {e}"))
    }
}

/// Parse a stored RFC 3339 timestamp
fn parse_timestamp(value: &str) -> AppResult<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| AppError::internal(format!("Invalid datetime: {e}")))
}

/// Parse a stored UUID
fn parse_uuid(value: &str) -> AppResult<uuid::Uuid> {
    uuid::Uuid::parse_str(value).map_err(|e| AppError::internal(format!("Invalid UUID: {e}")))
}
