// ABOUTME: Database operations for glaze recipes and their ordered compositions
// ABOUTME: Creates recipes transactionally, auto-creating referenced materials with zero stock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::materials::{fetch_material, insert_material};
use super::{begin_write, insert_error, parse_timestamp, parse_uuid};
use crate::errors::{AppError, AppResult};
use crate::models::{
    build_composition, CompositionEntry, Material, MaterialCategory, Percentages, Recipe,
};

/// Request to create a recipe
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateRecipeRequest {
    /// Unique recipe name
    pub name: String,
    /// Base partition, must sum to 100
    pub base: Percentages,
    /// Oxide partition
    pub oxides: Percentages,
    /// Optional web description link
    pub description_url: Option<String>,
    /// Optional production log link
    pub production_doc_url: Option<String>,
}

/// Newly stored recipe and the materials created for it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedRecipe {
    /// Stored recipe
    pub recipe: Recipe,
    /// Names of materials that did not exist before
    pub created_materials: Vec<String>,
}

/// Recipes database manager
#[derive(Clone)]
pub struct RecipesManager {
    pool: SqlitePool,
}

impl RecipesManager {
    /// Create a new recipes manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Validate and store a recipe
    ///
    /// Unknown materials are created with zero stock in the same
    /// transaction, using the partition they appear in as their category.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a bad name or composition,
    /// `ResourceAlreadyExists` for a duplicate name, or a database error
    pub async fn create(&self, request: &CreateRecipeRequest) -> AppResult<CreatedRecipe> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::missing_field("name"));
        }
        let composition = build_composition(&request.base, &request.oxides)?;

        let mut tx = begin_write(&self.pool).await?;

        let exists = sqlx::query("SELECT 1 FROM recipes WHERE name = $1")
            .bind(name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to check recipe: {e}")))?;
        if exists.is_some() {
            return Err(AppError::already_exists(format!("Recipe '{name}'")));
        }

        let recipe = Recipe {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            composition,
            description_url: non_empty(request.description_url.as_deref()),
            production_doc_url: non_empty(request.production_doc_url.as_deref()),
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO recipes (id, name, description_url, production_doc_url, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(recipe.id.to_string())
        .bind(&recipe.name)
        .bind(&recipe.description_url)
        .bind(&recipe.production_doc_url)
        .bind(recipe.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_error(&e, &format!("Recipe '{name}'"), "create recipe"))?;

        let mut created_materials = Vec::new();
        for (position, entry) in recipe.composition.iter().enumerate() {
            let material = if let Some(existing) = fetch_material(&mut tx, &entry.material).await? {
                existing
            } else {
                let material = Material::new(&entry.material, entry.category, None);
                insert_material(&mut tx, &material).await?;
                created_materials.push(material.name.clone());
                material
            };

            sqlx::query(
                r"
                INSERT INTO recipe_compositions (recipe_id, position, material_id, category, percentage)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(recipe.id.to_string())
            .bind(i64::try_from(position).unwrap_or(i64::MAX))
            .bind(material.id.to_string())
            .bind(entry.category.as_str())
            .bind(entry.percentage)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to store composition: {e}")))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit recipe: {e}")))?;

        info!(
            recipe = %recipe.name,
            bases = recipe.base().len(),
            oxides = recipe.oxides().len(),
            created_materials = created_materials.len(),
            "Recipe created"
        );

        Ok(CreatedRecipe {
            recipe,
            created_materials,
        })
    }

    /// List all recipes ordered by name
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn list(&self) -> AppResult<Vec<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.name, r.description_url, r.production_doc_url, r.created_at,
                   m.name AS material, c.category, c.percentage
            FROM recipes r
            LEFT JOIN recipe_compositions c ON c.recipe_id = r.id
            LEFT JOIN materials m ON m.id = c.material_id
            ORDER BY r.name ASC, c.position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list recipes: {e}")))?;

        let mut recipes: Vec<Recipe> = Vec::new();
        for row in &rows {
            let id = parse_uuid(&row.get::<String, _>("id"))?;
            let starts_new = recipes.last().is_none_or(|last| last.id != id);
            if starts_new {
                recipes.push(row_to_recipe(row, id)?);
            }
            if let (Some(recipe), Some(entry)) = (recipes.last_mut(), row_to_entry(row)?) {
                recipe.composition.push(entry);
            }
        }
        Ok(recipes)
    }

    /// Get a recipe by exact (trimmed) name
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn get_by_name(&self, name: &str) -> AppResult<Option<Recipe>> {
        let rows = sqlx::query(
            r"
            SELECT r.id, r.name, r.description_url, r.production_doc_url, r.created_at,
                   m.name AS material, c.category, c.percentage
            FROM recipes r
            LEFT JOIN recipe_compositions c ON c.recipe_id = r.id
            LEFT JOIN materials m ON m.id = c.material_id
            WHERE r.name = $1
            ORDER BY c.position ASC
            ",
        )
        .bind(name.trim())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get recipe: {e}")))?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };
        let mut recipe = row_to_recipe(first, parse_uuid(&first.get::<String, _>("id"))?)?;
        for row in &rows {
            if let Some(entry) = row_to_entry(row)? {
                recipe.composition.push(entry);
            }
        }
        Ok(Some(recipe))
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_owned)
}

/// Recipe header columns, composition left empty
fn row_to_recipe(row: &SqliteRow, id: Uuid) -> AppResult<Recipe> {
    let created_at: String = row.get("created_at");
    Ok(Recipe {
        id,
        name: row.get("name"),
        composition: Vec::new(),
        description_url: row.get("description_url"),
        production_doc_url: row.get("production_doc_url"),
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Composition columns of a joined row, `None` for a recipe without entries
fn row_to_entry(row: &SqliteRow) -> AppResult<Option<CompositionEntry>> {
    let material: Option<String> = row.get("material");
    let category: Option<String> = row.get("category");
    let percentage: Option<f64> = row.get("percentage");

    match (material, category, percentage) {
        (Some(material), Some(category), Some(percentage)) => Ok(Some(CompositionEntry {
            material,
            category: MaterialCategory::parse(&category)?,
            percentage,
        })),
        _ => Ok(None),
    }
}
