// ABOUTME: Production service wiring recipe lookup, stock snapshots, and the feasibility calculator
// ABOUTME: Applies confirmed production runs through the StockStore in a single transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::ProductionConfig;
use crate::database::{RecipesManager, StockStore};
use crate::errors::{AppError, AppResult};
use crate::production::{
    decide, feasibility, rejection_error, validate_demand, ConfirmationDecision,
    FeasibilityReport, ProductionOutcome,
};

/// Simulates and confirms production runs
#[derive(Clone)]
pub struct ProductionService {
    recipes: RecipesManager,
    stock: Arc<dyn StockStore>,
    config: ProductionConfig,
}

impl ProductionService {
    /// Create a production service over a recipe source and a stock store
    #[must_use]
    pub fn new(recipes: RecipesManager, stock: Arc<dyn StockStore>, config: ProductionConfig) -> Self {
        Self {
            recipes,
            stock,
            config,
        }
    }

    /// Simulate producing `mass` of a recipe without touching stock
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredField` or `InvalidInput` for a bad request,
    /// `ResourceNotFound` if the recipe does not exist, or a storage error
    pub async fn simulate(&self, recipe: &str, mass: Option<f64>) -> AppResult<FeasibilityReport> {
        let recipe_name = recipe.trim();
        if recipe_name.is_empty() {
            return Err(AppError::missing_field("recipe"));
        }
        let demand = validate_demand(mass)?;

        let recipe = self
            .recipes
            .get_by_name(recipe_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Recipe '{recipe_name}'")))?;

        let names: Vec<String> = recipe
            .composition
            .iter()
            .map(|entry| entry.material.clone())
            .collect();
        let snapshot = self.stock.snapshot(&names).await?;

        let report = feasibility::simulate(
            &recipe.name,
            &recipe.composition,
            demand,
            &snapshot,
            &self.config,
        )?;

        info!(
            recipe = %report.recipe,
            demand = report.demand,
            production_possible = report.production_possible,
            max_producible = report.max_producible,
            "Production simulated"
        );
        Ok(report)
    }

    /// Run the two-phase confirmation and apply the run when allowed
    ///
    /// # Errors
    ///
    /// Returns the errors of [`Self::simulate`], an `InvalidInput` error
    /// carrying the black materials when production is impossible, or a
    /// storage error if the stock update fails (in which case nothing is
    /// applied)
    pub async fn produce(
        &self,
        recipe: &str,
        mass: Option<f64>,
        override_warnings: bool,
    ) -> AppResult<ProductionOutcome> {
        let report = self.simulate(recipe, mass).await?;

        match decide(&report, override_warnings) {
            ConfirmationDecision::Reject { blocking } => {
                warn!(
                    recipe = %report.recipe,
                    demand = report.demand,
                    blocking = blocking.len(),
                    "Production rejected"
                );
                Err(rejection_error(&blocking))
            }
            ConfirmationDecision::AwaitOverride { warnings } => {
                info!(
                    recipe = %report.recipe,
                    demand = report.demand,
                    warnings = warnings.len(),
                    "Production awaiting override"
                );
                Ok(ProductionOutcome::awaiting_override(warnings))
            }
            ConfirmationDecision::Apply { deltas } => {
                let stock_after = self.stock.apply_deltas(&deltas).await?;
                info!(
                    recipe = %report.recipe,
                    demand = report.demand,
                    overridden = override_warnings,
                    materials = stock_after.len(),
                    "Production applied"
                );
                Ok(ProductionOutcome::applied(&report, stock_after))
            }
        }
    }
}
