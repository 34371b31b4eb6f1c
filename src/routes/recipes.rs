// ABOUTME: Route handlers for creating, listing, and fetching glaze recipes
// ABOUTME: Provides POST/GET /api/recipes and GET /api/recipes/:name
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Recipes routes
//!
//! Recipes are exposed with their composition split back into `base` and
//! `oxides` maps, the shape clients submit them in.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::database::CreateRecipeRequest;
use crate::errors::AppError;
use crate::models::{Percentages, Recipe};
use crate::resources::ServerResources;

/// Request body for creating a recipe
#[derive(Debug, Deserialize)]
pub struct CreateRecipeBody {
    /// Unique recipe name
    #[serde(default, alias = "nom")]
    pub name: String,
    /// Base materials and percentages (must sum to 100)
    #[serde(default)]
    pub base: Percentages,
    /// Oxides and percentages
    #[serde(default, alias = "oxydes")]
    pub oxides: Percentages,
    /// Optional web description link
    #[serde(default)]
    pub description_url: Option<String>,
    /// Optional production log link
    #[serde(default)]
    pub production_doc_url: Option<String>,
}

impl From<CreateRecipeBody> for CreateRecipeRequest {
    fn from(body: CreateRecipeBody) -> Self {
        Self {
            name: body.name,
            base: body.base,
            oxides: body.oxides,
            description_url: body.description_url,
            production_doc_url: body.production_doc_url,
        }
    }
}

/// Recipe as returned to clients
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipeResponse {
    /// Recipe name
    pub name: String,
    /// Base partition
    pub base: Percentages,
    /// Oxide partition
    pub oxides: Percentages,
    /// Web description link
    pub description_url: Option<String>,
    /// Production log link
    pub production_doc_url: Option<String>,
    /// Creation timestamp
    pub created_at: String,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            base: recipe.base(),
            oxides: recipe.oxides(),
            name: recipe.name,
            description_url: recipe.description_url,
            production_doc_url: recipe.production_doc_url,
            created_at: recipe.created_at.to_rfc3339(),
        }
    }
}

/// Response for a created recipe
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateRecipeResponse {
    /// Confirmation message
    pub message: String,
    /// Stored recipe
    pub recipe: RecipeResponse,
    /// Materials created with zero stock for this recipe
    pub created_materials: Vec<String>,
}

/// Recipes routes handler
pub struct RecipesRoutes;

impl RecipesRoutes {
    /// Create all recipe routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/recipes",
                get(Self::handle_list).post(Self::handle_create),
            )
            .route("/api/recipes/:name", get(Self::handle_get))
            .with_state(resources)
    }

    /// Handle POST /api/recipes - Create a recipe
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<CreateRecipeBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(body) = payload?;
        let request: CreateRecipeRequest = body.into();
        let created = resources.database.recipes().create(&request).await?;

        let recipe: RecipeResponse = created.recipe.into();
        let response = CreateRecipeResponse {
            message: format!(
                "Recipe '{}' created with {} base(s) and {} oxide(s)",
                recipe.name,
                recipe.base.len(),
                recipe.oxides.len()
            ),
            recipe,
            created_materials: created.created_materials,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/recipes - List recipes ordered by name
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let recipes: Vec<RecipeResponse> = resources
            .database
            .recipes()
            .list()
            .await?
            .into_iter()
            .map(Into::into)
            .collect();
        Ok((StatusCode::OK, Json(recipes)).into_response())
    }

    /// Handle GET /api/recipes/:name - Fetch one recipe
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(name): Path<String>,
    ) -> Result<Response, AppError> {
        let recipe = resources
            .database
            .recipes()
            .get_by_name(&name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe '{name}'")))?;

        let response: RecipeResponse = recipe.into();
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
