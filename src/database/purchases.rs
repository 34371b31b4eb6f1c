// ABOUTME: Database operations for the append-only purchase log and purchase history
// ABOUTME: Recording a purchase inserts the row and increments stock in one transaction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

use super::begin_write;
use super::materials::{add_to_stock, fetch_material, insert_material};
use crate::constants::dates::PURCHASE_DATE_FORMAT;
use crate::constants::rounding::round2;
use crate::errors::{AppError, AppResult};
use crate::models::{normalize_material_name, Material, MaterialCategory, Purchase};

/// Request to record a purchase
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPurchaseRequest {
    /// Material name
    pub name: String,
    /// Quantity acquired
    pub quantity: Option<f64>,
    /// Price paid
    pub price: Option<f64>,
    /// Supplier name
    pub supplier: Option<String>,
    /// Purchase date as `YYYY-MM-DD`, today (UTC) when absent
    pub date: Option<String>,
    /// Category, required when the material does not exist yet
    pub category: Option<String>,
    /// Unit for a newly created material
    pub unit: Option<String>,
}

/// Stored purchase with the resulting stock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedPurchase {
    /// Stored purchase
    pub purchase: Purchase,
    /// Material stock after the purchase
    pub new_stock: f64,
    /// True when the material was created by this purchase
    pub material_created: bool,
}

/// One line of the purchase history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRecord {
    /// Material name
    pub material: String,
    /// Quantity acquired
    pub quantity: f64,
    /// Price paid
    pub price: f64,
    /// Supplier name
    pub supplier: Option<String>,
    /// Purchase date
    pub date: NaiveDate,
}

/// Purchases of one category with spending totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryHistory {
    /// Purchases, newest first
    pub purchases: Vec<PurchaseRecord>,
    /// Total price per material, rounded to 2 decimals
    pub price_by_material: BTreeMap<String, f64>,
    /// Total price for the category, rounded to 2 decimals
    pub total_price: f64,
}

impl CategoryHistory {
    fn push(&mut self, record: PurchaseRecord) {
        let total = self
            .price_by_material
            .entry(record.material.clone())
            .or_insert(0.0);
        *total = round2(*total + record.price);
        self.total_price += record.price;
        self.purchases.push(record);
    }
}

/// Purchase history split by category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PurchaseHistory {
    /// Base material purchases
    pub bases: CategoryHistory,
    /// Oxide purchases
    pub oxides: CategoryHistory,
}

/// Purchases database manager
#[derive(Clone)]
pub struct PurchasesManager {
    pool: SqlitePool,
}

impl PurchasesManager {
    /// Create a new purchases manager
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Record a purchase and increase the material's stock
    ///
    /// An unknown material is created when `category` is given.
    ///
    /// # Errors
    ///
    /// Returns a validation error for missing or out-of-range fields, an
    /// unknown material without category, or a malformed date; otherwise a
    /// database error
    pub async fn record(&self, request: &RecordPurchaseRequest) -> AppResult<RecordedPurchase> {
        let name = normalize_material_name(&request.name);
        if name.is_empty() {
            return Err(AppError::missing_field("name"));
        }
        let quantity = request
            .quantity
            .ok_or_else(|| AppError::missing_field("quantity"))?;
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(AppError::out_of_range(format!(
                "Field 'quantity' must be a positive number, got {quantity}"
            )));
        }
        let price = request.price.ok_or_else(|| AppError::missing_field("price"))?;
        if !price.is_finite() || price < 0.0 {
            return Err(AppError::out_of_range(format!(
                "Field 'price' must be a non-negative number, got {price}"
            )));
        }
        let date = parse_purchase_date(request.date.as_deref())?;
        let category = request
            .category
            .as_deref()
            .map(MaterialCategory::parse)
            .transpose()?;
        let supplier = request
            .supplier
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        let mut tx = begin_write(&self.pool).await?;

        let (material, material_created) = match fetch_material(&mut tx, &name).await? {
            Some(existing) => (existing, false),
            None => {
                let category = category.ok_or_else(|| {
                    AppError::invalid_input(format!(
                        "Unknown material '{name}': field 'category' ('base' or 'oxide') is required to create it"
                    ))
                })?;
                let material = Material::new(&name, category, request.unit.as_deref());
                insert_material(&mut tx, &material).await?;
                (material, true)
            }
        };

        let purchase = Purchase {
            id: Uuid::new_v4(),
            material_id: material.id,
            material: material.name.clone(),
            category: material.category,
            quantity,
            price,
            supplier,
            date,
            created_at: Utc::now(),
        };

        sqlx::query(
            r"
            INSERT INTO purchases (id, material_id, quantity, price, supplier, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ",
        )
        .bind(purchase.id.to_string())
        .bind(purchase.material_id.to_string())
        .bind(purchase.quantity)
        .bind(purchase.price)
        .bind(&purchase.supplier)
        .bind(purchase.date.format(PURCHASE_DATE_FORMAT).to_string())
        .bind(purchase.created_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to record purchase: {e}")))?;

        let new_stock = add_to_stock(&mut tx, &material.name, quantity).await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit purchase: {e}")))?;

        info!(
            material = %purchase.material,
            quantity,
            price,
            new_stock,
            material_created,
            "Purchase recorded"
        );

        Ok(RecordedPurchase {
            purchase,
            new_stock,
            material_created,
        })
    }

    /// Purchase history grouped by category, newest first
    ///
    /// # Errors
    ///
    /// Returns an error if database operation fails
    pub async fn history(&self) -> AppResult<PurchaseHistory> {
        let rows = sqlx::query(
            r"
            SELECT p.quantity, p.price, p.supplier, p.date, m.name, m.category
            FROM purchases p
            JOIN materials m ON m.id = p.material_id
            ORDER BY p.date DESC, p.created_at DESC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to load purchase history: {e}")))?;

        let mut history = PurchaseHistory::default();
        for row in &rows {
            let category = MaterialCategory::parse(&row.get::<String, _>("category"))?;
            let date: String = row.get("date");
            let record = PurchaseRecord {
                material: row.get("name"),
                quantity: row.get("quantity"),
                price: row.get("price"),
                supplier: row.get("supplier"),
                date: NaiveDate::parse_from_str(&date, PURCHASE_DATE_FORMAT)
                    .map_err(|e| AppError::internal(format!("Invalid stored date: {e}")))?,
            };
            match category {
                MaterialCategory::Base => history.bases.push(record),
                MaterialCategory::Oxide => history.oxides.push(record),
            }
        }

        history.bases.total_price = round2(history.bases.total_price);
        history.oxides.total_price = round2(history.oxides.total_price);
        Ok(history)
    }
}

/// Parse a purchase date, defaulting to today in UTC
///
/// # Errors
///
/// Returns `InvalidFormat` when the value is not `YYYY-MM-DD`
pub fn parse_purchase_date(value: Option<&str>) -> AppResult<NaiveDate> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, PURCHASE_DATE_FORMAT).map_err(|_| {
            AppError::invalid_format(format!("Invalid date '{raw}': expected YYYY-MM-DD"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_purchase_date() {
        assert_eq!(
            parse_purchase_date(Some("2024-03-15")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
        assert_eq!(parse_purchase_date(None).unwrap(), Utc::now().date_naive());
        assert!(parse_purchase_date(Some("15/03/2024")).is_err());
    }

    #[test]
    fn test_category_history_totals() {
        let mut history = CategoryHistory::default();
        for price in [10.25, 5.5] {
            history.push(PurchaseRecord {
                material: "kaolin".to_owned(),
                quantity: 1000.0,
                price,
                supplier: None,
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            });
        }
        assert_eq!(history.purchases.len(), 2);
        assert_eq!(history.price_by_material["kaolin"], 15.75);
    }
}
