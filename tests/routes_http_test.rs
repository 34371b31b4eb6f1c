// ABOUTME: HTTP-level tests for the glaze stock API router
// ABOUTME: Exercises every endpoint through tower oneshot requests against an in-memory database
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Glaze Stock Server Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;
mod helpers;

use glaze_stock_server::models::MaterialCategory;
use helpers::axum_test::AxumTestRequest;
use serde_json::{json, Value};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_and_ready() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::get("/health")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");

    let response = AxumTestRequest::get("/ready")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
}

// ============================================================================
// Materials and stock
// ============================================================================

#[tokio::test]
async fn test_create_material_and_list_stock() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/materials")
        .json(&json!({ "name": "Cobalt", "category": "oxide" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["material"]["name"], "cobalt");
    assert_eq!(body["material"]["quantity"], 0.0);

    let response = AxumTestRequest::post("/api/materials")
        .json(&json!({ "name": "COBALT" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 409);

    let response = AxumTestRequest::get("/api/stock")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["bases"], json!([]));
    assert_eq!(body["oxides"][0]["name"], "cobalt");
}

#[tokio::test]
async fn test_create_material_rejects_unknown_category() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/materials")
        .json(&json!({ "name": "kaolin", "category": "glass" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_legacy_field_names_are_accepted() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/materials")
        .json(&json!({ "nom": "Fer", "type": "oxyde", "unite": "g" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 201);

    let response = AxumTestRequest::post("/api/purchases")
        .json(&json!({ "nom": "fer", "quantite": 250.0, "prix": 6.4, "fournisseur": "Ceradel" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["new_stock"], 250.0);
}

// ============================================================================
// Purchases
// ============================================================================

#[tokio::test]
async fn test_purchase_then_history() {
    let resources = common::create_test_resources().await;
    common::set_stock(&resources.database, "kaolin", MaterialCategory::Base, 0.0).await;

    let response = AxumTestRequest::post("/api/purchases")
        .json(&json!({
            "name": "kaolin",
            "quantity": 2500.0,
            "price": 12.5,
            "date": "2024-05-02"
        }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["new_stock"], 2500.0);
    assert_eq!(body["material_created"], false);

    let response = AxumTestRequest::get("/api/stock")
        .send(common::test_router(&resources))
        .await;
    let body: Value = response.json();
    assert_eq!(body["bases"][0]["quantity"], 2500.0);

    let response = AxumTestRequest::get("/api/purchases/history")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["bases"]["purchases"][0]["material"], "kaolin");
    assert_eq!(body["bases"]["total_price"], 12.5);
    assert_eq!(body["oxides"]["purchases"], json!([]));
}

#[tokio::test]
async fn test_purchase_without_quantity_is_rejected() {
    let resources = common::create_test_resources().await;
    common::set_stock(&resources.database, "kaolin", MaterialCategory::Base, 0.0).await;

    let response = AxumTestRequest::post("/api/purchases")
        .json(&json!({ "name": "kaolin", "price": 3.0 }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "MISSING_REQUIRED_FIELD");
}

// ============================================================================
// Recipes
// ============================================================================

#[tokio::test]
async fn test_recipe_endpoints() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({
            "nom": "Base Claire",
            "base": { "kaolin": 60.0, "silice": 40.0 },
            "oxydes": { "fer": 2.0 }
        }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(body["created_materials"], json!(["kaolin", "silice", "fer"]));
    assert_eq!(body["recipe"]["oxides"]["fer"], 2.0);

    let response = AxumTestRequest::get("/api/recipes")
        .send(common::test_router(&resources))
        .await;
    let body: Value = response.json();
    assert_eq!(body.as_array().unwrap().len(), 1);

    let response = AxumTestRequest::get("/api/recipes/Base%20Claire")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["base"]["kaolin"], 60.0);

    let response = AxumTestRequest::get("/api/recipes/Tenmoku")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_recipe_keeps_submitted_material_order() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;

    let response = AxumTestRequest::post("/api/recipes")
        .raw_json(r#"{"name": "Ordre", "base": {"silice": 40, "kaolin": 60}, "oxides": {"rutile": 4, "fer": 1}}"#)
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json();
    assert_eq!(
        body["created_materials"],
        json!(["silice", "kaolin", "rutile", "fer"])
    );

    let response = AxumTestRequest::get("/api/recipes/Ordre")
        .send(common::test_router(&resources))
        .await;
    let text = response.text();
    let silice = text.find("\"silice\"").unwrap();
    let kaolin = text.find("\"kaolin\"").unwrap();
    assert!(silice < kaolin, "base reordered in {text}");

    common::set_stock(db, "silice", MaterialCategory::Base, 1000.0).await;
    common::set_stock(db, "kaolin", MaterialCategory::Base, 1000.0).await;
    let response = AxumTestRequest::post("/api/production/simulate")
        .json(&json!({ "recipe": "Ordre", "mass": 100.0 }))
        .send(common::test_router(&resources))
        .await;
    let body: Value = response.json();
    let materials: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["material"].as_str().unwrap())
        .collect();
    assert_eq!(materials, ["silice", "kaolin", "rutile", "fer"]);
}

#[tokio::test]
async fn test_recipe_with_bad_base_sum_is_rejected() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/recipes")
        .json(&json!({ "name": "Bad", "base": { "kaolin": 70.0 } }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
}

// ============================================================================
// Production
// ============================================================================

#[tokio::test]
async fn test_simulate_endpoint() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    common::create_base_claire(db).await;
    common::set_stock(db, "kaolin", MaterialCategory::Base, 1000.0).await;
    common::set_stock(db, "silice", MaterialCategory::Base, 1000.0).await;

    let response = AxumTestRequest::post("/api/production/simulate")
        .json(&json!({ "recette": "Base Claire", "masse": 500.0 }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["production_possible"], true);
    assert_eq!(body["max_producible"], 1666.67);
    assert_eq!(body["details"][0]["color"], "green");

    let response = AxumTestRequest::post("/api/production/simulate")
        .json(&json!({ "recipe": "Base Claire" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn test_produce_rejection_lists_blocking_materials() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    common::create_base_claire(db).await;
    common::set_stock(db, "kaolin", MaterialCategory::Base, 50.0).await;
    common::set_stock(db, "silice", MaterialCategory::Base, 1000.0).await;

    let response = AxumTestRequest::post("/api/production/produce")
        .json(&json!({ "recipe": "Base Claire", "mass": 500.0, "override": true }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["details"]["details"][0]["material"], "kaolin");
    assert_eq!(body["error"]["details"]["details"][0]["color"], "black");
}

#[tokio::test]
async fn test_produce_override_flow() {
    let resources = common::create_test_resources().await;
    let db = &resources.database;
    common::create_base_claire(db).await;
    common::set_stock(db, "kaolin", MaterialCategory::Base, 550.0).await;
    common::set_stock(db, "silice", MaterialCategory::Base, 1000.0).await;

    let response = AxumTestRequest::post("/api/production/produce")
        .json(&json!({ "recipe": "Base Claire", "mass": 500.0 }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["state"], "awaiting_override");
    assert_eq!(body["details"][0]["color"], "orange");

    let response = AxumTestRequest::post("/api/production/produce")
        .json(&json!({ "recipe": "Base Claire", "mass": 500.0, "override": true }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json();
    assert_eq!(body["state"], "applied");
    assert_eq!(body["stock_after"][0]["new_stock"], 250.0);

    let response = AxumTestRequest::get("/api/stock")
        .send(common::test_router(&resources))
        .await;
    let body: Value = response.json();
    let kaolin = body["bases"]
        .as_array()
        .unwrap()
        .iter()
        .find(|entry| entry["name"] == "kaolin")
        .unwrap();
    assert_eq!(kaolin["quantity"], 250.0);
}

// ============================================================================
// Malformed request bodies
// ============================================================================

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/materials")
        .raw_json(r#"{"name": "kaolin""#)
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_wrongly_typed_field_uses_error_envelope() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/production/simulate")
        .json(&json!({ "recipe": "Base Claire", "mass": "abc" }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");

    let response = AxumTestRequest::post("/api/purchases")
        .json(&json!({ "name": "kaolin", "quantity": [1, 2] }))
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_missing_content_type_uses_error_envelope() {
    let resources = common::create_test_resources().await;

    let response = AxumTestRequest::post("/api/recipes")
        .send(common::test_router(&resources))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "INVALID_INPUT");
}
