//! Service catalog integration tests.

mod common;

use common::TestHarness;
use serde_json::json;

async fn create_service(harness: &TestHarness, name: &str, category: &str) -> String {
    let response = harness
        .server
        .post("/v1/services")
        .add_header("authorization", harness.auth_header())
        .json(&json!({
            "name_et": name,
            "category": category,
            "unit_price_cents": 2500,
            "unit": "tk",
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn create_and_list_services() {
    let harness = TestHarness::new();

    create_service(&harness, "Pistikupesa paigaldus", "paigaldus").await;
    create_service(&harness, "Kaabel 3x2.5", "materjal").await;

    let response = harness
        .server
        .get("/v1/services")
        .add_header("authorization", harness.auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let services = body["data"].as_array().unwrap();
    assert_eq!(services.len(), 2);
    // Ordered by category: materjal before paigaldus.
    assert_eq!(services[0]["category"], "materjal");
    assert_eq!(services[1]["category"], "paigaldus");
    assert_eq!(services[1]["is_active"], true);
}

#[tokio::test]
async fn update_and_delete_service() {
    let harness = TestHarness::new();
    let id = create_service(&harness, "Pistikupesa paigaldus", "paigaldus").await;

    let response = harness
        .server
        .put(&format!("/v1/services/{id}"))
        .add_header("authorization", harness.auth_header())
        .json(&json!({ "unit_price_cents": 3000, "is_active": false }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["unit_price_cents"], 3000);
    assert_eq!(body["data"]["is_active"], false);
    assert_eq!(body["data"]["name_et"], "Pistikupesa paigaldus");

    let response = harness
        .server
        .delete(&format!("/v1/services/{id}"))
        .add_header("authorization", harness.auth_header())
        .await;
    response.assert_status_ok();

    let response = harness
        .server
        .get(&format!("/v1/services/{id}"))
        .add_header("authorization", harness.auth_header())
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn services_require_auth() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/services").await;

    response.assert_status_unauthorized();
}
