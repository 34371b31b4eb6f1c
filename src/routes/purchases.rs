// ABOUTME: Route handlers for recording purchases and reading the purchase history
// ABOUTME: Provides POST /api/purchases and GET /api/purchases/history
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

use crate::database::RecordPurchaseRequest;
use crate::errors::AppError;
use crate::models::Purchase;
use crate::resources::ServerResources;

/// Request body for recording a purchase
#[derive(Debug, Deserialize)]
pub struct RecordPurchaseBody {
    /// Material name
    #[serde(default, alias = "nom")]
    pub name: String,
    /// Quantity acquired
    #[serde(default, alias = "quantite")]
    pub quantity: Option<f64>,
    /// Price paid
    #[serde(default, alias = "prix")]
    pub price: Option<f64>,
    /// Supplier
    #[serde(default, alias = "fournisseur")]
    pub supplier: Option<String>,
    /// Date as `YYYY-MM-DD`
    #[serde(default)]
    pub date: Option<String>,
    /// Category for an unknown material
    #[serde(default, alias = "type")]
    pub category: Option<String>,
    /// Unit for an unknown material
    #[serde(default, alias = "unite")]
    pub unit: Option<String>,
}

impl From<RecordPurchaseBody> for RecordPurchaseRequest {
    fn from(body: RecordPurchaseBody) -> Self {
        Self {
            name: body.name,
            quantity: body.quantity,
            price: body.price,
            supplier: body.supplier,
            date: body.date,
            category: body.category,
            unit: body.unit,
        }
    }
}

/// Response for a recorded purchase
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordPurchaseResponse {
    /// Confirmation message
    pub message: String,
    /// Stored purchase
    pub purchase: Purchase,
    /// Material stock after the purchase
    pub new_stock: f64,
    /// True when the purchase created the material
    pub material_created: bool,
}

/// Purchases routes handler
pub struct PurchasesRoutes;

impl PurchasesRoutes {
    /// Create all purchase routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/purchases", post(Self::handle_record))
            .route("/api/purchases/history", get(Self::handle_history))
            .with_state(resources)
    }

    /// Handle POST /api/purchases - Record a purchase and increase stock
    async fn handle_record(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<RecordPurchaseBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(body) = payload?;
        let request: RecordPurchaseRequest = body.into();
        let recorded = resources.database.purchases().record(&request).await?;

        let response = RecordPurchaseResponse {
            message: format!(
                "Purchase of {} for '{}' recorded",
                recorded.purchase.quantity, recorded.purchase.material
            ),
            purchase: recorded.purchase,
            new_stock: recorded.new_stock,
            material_created: recorded.material_created,
        };
        Ok((StatusCode::CREATED, Json(response)).into_response())
    }

    /// Handle GET /api/purchases/history - Purchases grouped by category
    async fn handle_history(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let history = resources.database.purchases().history().await?;
        Ok((StatusCode::OK, Json(history)).into_response())
    }
}
