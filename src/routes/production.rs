// ABOUTME: Route handlers for production simulation and confirmed production
// ABOUTME: Provides POST /api/production/simulate and POST /api/production/produce
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

//! Production routes
//!
//! `simulate` never changes stock. `produce` answers 400 when a material is
//! black, 200 with `state: awaiting_override` when warnings need an explicit
//! override, and 200 with `state: applied` once stock has been decremented.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::resources::ServerResources;

/// Request body for a simulation
#[derive(Debug, Deserialize)]
pub struct SimulateBody {
    /// Recipe name
    #[serde(default, alias = "recette")]
    pub recipe: String,
    /// Target output mass
    #[serde(default, alias = "masse")]
    pub mass: Option<f64>,
}

/// Request body for a production run
#[derive(Debug, Deserialize)]
pub struct ProduceBody {
    /// Recipe name
    #[serde(default, alias = "recette")]
    pub recipe: String,
    /// Target output mass
    #[serde(default, alias = "masse")]
    pub mass: Option<f64>,
    /// Proceed despite red or orange materials
    #[serde(default, rename = "override")]
    pub override_warnings: bool,
}

/// Production routes handler
pub struct ProductionRoutes;

impl ProductionRoutes {
    /// Create all production routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/production/simulate", post(Self::handle_simulate))
            .route("/api/production/produce", post(Self::handle_produce))
            .with_state(resources)
    }

    /// Handle POST /api/production/simulate - Feasibility report
    async fn handle_simulate(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<SimulateBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(body) = payload?;
        let report = resources
            .production
            .simulate(&body.recipe, body.mass)
            .await?;
        Ok((StatusCode::OK, Json(report)).into_response())
    }

    /// Handle POST /api/production/produce - Two-phase production
    async fn handle_produce(
        State(resources): State<Arc<ServerResources>>,
        payload: Result<Json<ProduceBody>, JsonRejection>,
    ) -> Result<Response, AppError> {
        let Json(body) = payload?;
        let outcome = resources
            .production
            .produce(&body.recipe, body.mass, body.override_warnings)
            .await?;
        Ok((StatusCode::OK, Json(outcome)).into_response())
    }
}
