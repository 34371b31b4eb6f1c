// ABOUTME: Route handlers for material creation and the stock listing
// ABOUTME: Provides POST /api/materials and GET /api/stock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Material, MaterialCategory};
use crate::resources::ServerResources;

/// Request body for creating a material
#[derive(Debug, Deserialize)]
pub struct CreateMaterialBody {
    /// Material name
    #[serde(default, alias = "nom")]
    pub name: String,
    /// `base` (default) or `oxide`
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    /// Unit, grams when absent
    #[serde(default, alias = "unite")]
    pub unit: Option<String>,
}

/// Response for a created material
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateMaterialResponse {
    /// Confirmation message
    pub message: String,
    /// Stored material
    pub material: Material,
}

/// One material in the stock listing
#[derive(Debug, Serialize, Deserialize)]
pub struct StockEntry {
    /// Material name
    pub name: String,
    /// Material category
    pub category: MaterialCategory,
    /// Current quantity
    pub quantity: f64,
    /// Unit of the quantity
    pub unit: String,
}

impl From<Material> for StockEntry {
    fn from(material: Material) -> Self {
        Self {
            name: material.name,
            category: material.category,
            quantity: material.quantity,
            unit: material.unit,
        }
    }
}

/// Stock listing response
#[derive(Debug, Serialize, Deserialize)]
pub struct StockResponse {
    /// Base materials, largest stock first
    pub bases: Vec<StockEntry>,
    /// Oxides, largest stock first
    pub oxides: Vec<StockEntry>,
}

/// Materials routes handler
pub struct MaterialsRoutes;

impl MaterialsRoutes {
    /// Create all material routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/materials", post(Self::handle_create))
            .route("/api/stock", get(Self::handle_stock))
            .with_state(resources)
    }

    /// Handle POST /api/materials - Create a material with zero stock
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<CreateMaterialBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(body) = payload?;
        let category = body
            .category
            .as_deref()
            .map(MaterialCategory::parse)
            .transpose()?
            .unwrap_or_default();

        let material = resources
            .database
            .materials()
            .create(&body.name, category, body.unit.as_deref())
            .await?;

        let response = CreateMaterialResponse {
            message: format!("Material '{}' created", material.name),
            material,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/stock - List stock by category
    async fn handle_stock(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let listing = resources.database.materials().list_stock().await?;

        let response = StockResponse {
            bases: listing.bases.into_iter().map(Into::into).collect(),
            oxides: listing.oxides.into_iter().map(Into::into).collect(),
        };
        Ok((StatusCode::OK, Json(response)).into_response())
    }
}
