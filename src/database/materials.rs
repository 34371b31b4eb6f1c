// ABOUTME: Database operations for raw materials and their stock quantities
// ABOUTME: Implements StockStore with additive updates and transactional batch application
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use super::{begin_write, insert_error, parse_timestamp, parse_uuid, StockStore};
use crate::errors::{AppError, AppResult};
use crate::models::{normalize_material_name, Material, MaterialCategory, StockLevel};
use crate::production::StockDelta;

const MATERIAL_COLUMNS: &str = "id, name, category, unit, quantity, created_at, updated_at";

/// Stock listing partitioned by category, each ordered by quantity descending
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockListing {
    /// Base materials
    pub bases: Vec<Material>,
    /// Oxides
    pub oxides: Vec<Material>,
}

/// Materials database manager
#[derive(Clone)]
pub struct MaterialsManager {
    pool: SqlitePool,
}

impl MaterialsManager {
    /// Create a new materials manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a material with zero stock
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` for an empty name,
    /// `ResourceAlreadyExists` if the normalised name is taken, or a
    /// database error
    pub async fn create(
        &self,
        name: &str,
        category: MaterialCategory,
        unit: Option<&str>,
    ) -> AppResult<Material> {
        let material = Material::new(name, category, unit);
        if material.name.is_empty() {
            return Err(AppError::missing_field("name"));
        }

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        insert_material(&mut conn, &material).await?;

        info!(
            material = %material.name,
            category = material.category.as_str(),
            unit = %material.unit,
            "Material created"
        );
        Ok(material)
    }

    /// Get a material by name (case-insensitive)
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Material>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        fetch_material(&mut conn, &normalize_material_name(name)).await
    }

    /// List all materials ordered by quantity descending
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<Material>> {
        let rows = sqlx::query(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY quantity DESC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list materials: {e}")))?;

        rows.iter().map(row_to_material).collect()
    }

    /// List stock split into bases and oxides
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list_stock(&self) -> AppResult<StockListing> {
        let (bases, oxides) = self
            .list()
            .await?
            .into_iter()
            .partition(|m| m.category == MaterialCategory::Base);
        Ok(StockListing { bases, oxides })
    }
}

#[async_trait]
impl StockStore for MaterialsManager {
    async fn get(&self, material: &str) -> AppResult<Option<StockLevel>> {
        Ok(self
            .get_by_name(material)
            .await?
            .map(|m| m.stock_level()))
    }

    async fn put(&self, material: &str, quantity: f64) -> AppResult<()> {
        let result = sqlx::query("UPDATE materials SET quantity = $1, updated_at = $2 WHERE name = $3")
            .bind(quantity)
            .bind(Utc::now().to_rfc3339())
            .bind(normalize_material_name(material))
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set stock: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Material '{material}'")));
        }
        Ok(())
    }

    async fn apply_delta(&self, material: &str, delta: f64) -> AppResult<f64> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;
        add_to_stock(&mut conn, &normalize_material_name(material), delta).await
    }

    async fn apply_deltas(&self, deltas: &[StockDelta]) -> AppResult<Vec<(String, f64)>> {
        let mut tx = begin_write(&self.pool).await?;

        let mut updated = Vec::with_capacity(deltas.len());
        for change in deltas {
            let name = normalize_material_name(&change.material);
            // An error here drops the transaction, which rolls back earlier updates
            let quantity = add_to_stock(&mut tx, &name, change.delta).await?;
            updated.push((name, quantity));
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit stock update: {e}")))?;

        debug!(materials = updated.len(), "Stock deltas applied");
        Ok(updated)
    }

    async fn snapshot(&self, materials: &[String]) -> AppResult<HashMap<String, StockLevel>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| AppError::database(format!("Failed to acquire connection: {e}")))?;

        let mut levels = HashMap::with_capacity(materials.len());
        for name in materials {
            let key = normalize_material_name(name);
            if let Some(material) = fetch_material(&mut conn, &key).await? {
                levels.insert(key, material.stock_level());
            }
        }
        Ok(levels)
    }
}

/// Fetch a material by its normalised name on an existing connection
pub(super) async fn fetch_material(
    conn: &mut SqliteConnection,
    name: &str,
) -> AppResult<Option<Material>> {
    let row = sqlx::query(&format!(
        "SELECT {MATERIAL_COLUMNS} FROM materials WHERE name = $1"
    ))
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to get material: {e}")))?;

    row.map(|r| row_to_material(&r)).transpose()
}

/// Insert a material on an existing connection
pub(super) async fn insert_material(
    conn: &mut SqliteConnection,
    material: &Material,
) -> AppResult<()> {
    sqlx::query(
        r"
        INSERT INTO materials (id, name, category, unit, quantity, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(material.id.to_string())
    .bind(&material.name)
    .bind(material.category.as_str())
    .bind(&material.unit)
    .bind(material.quantity)
    .bind(material.created_at.to_rfc3339())
    .bind(material.updated_at.to_rfc3339())
    .execute(&mut *conn)
    .await
    .map_err(|e| {
        insert_error(
            &e,
            &format!("Material '{}'", material.name),
            "create material",
        )
    })?;
    Ok(())
}

/// Add `delta` to a material's stock and return the new quantity
pub(super) async fn add_to_stock(
    conn: &mut SqliteConnection,
    name: &str,
    delta: f64,
) -> AppResult<f64> {
    let row = sqlx::query(
        r"
        UPDATE materials
        SET quantity = quantity + $1, updated_at = $2
        WHERE name = $3
        RETURNING quantity
        ",
    )
    .bind(delta)
    .bind(Utc::now().to_rfc3339())
    .bind(name)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| AppError::database(format!("Failed to update stock: {e}")))?;

    row.map(|r| r.get::<f64, _>("quantity"))
        .ok_or_else(|| AppError::not_found(format!("Material '{name}'")))
}

/// Convert a database row to a Material struct
fn row_to_material(row: &SqliteRow) -> AppResult<Material> {
    let id: String = row.get("id");
    let category: String = row.get("category");
    let created_at: String = row.get("created_at");
    let updated_at: String = row.get("updated_at");

    Ok(Material {
        id: parse_uuid(&id)?,
        name: row.get("name"),
        category: MaterialCategory::parse(&category)?,
        unit: row.get("unit"),
        quantity: row.get("quantity"),
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
