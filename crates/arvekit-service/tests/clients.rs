//! Client management integration tests.

mod common;

use arvekit_core::AccountId;
use common::TestHarness;
use serde_json::json;

#[tokio::test]
async fn create_and_list_clients() {
    let harness = TestHarness::new();

    let id = harness.create_client().await;

    let response = harness
        .server
        .get("/v1/clients")
        .add_header("authorization", harness.auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let clients = body["data"].as_array().unwrap();
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0]["id"], id);
    assert_eq!(clients[0]["client_type"], "business");
}

#[tokio::test]
async fn clients_are_listed_by_name() {
    let harness = TestHarness::new();

    for name in ["Zummer OÜ", "Aknad AS", "Mati Kask"] {
        harness
            .server
            .post("/v1/clients")
            .add_header("authorization", harness.auth_header())
            .json(&json!({
                "client_type": "private",
                "name": name,
                "address": "Pikk 1, Tallinn",
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }

    let response = harness
        .server
        .get("/v1/clients")
        .add_header("authorization", harness.auth_header())
        .await;
    let body: serde_json::Value = response.json();
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Aknad AS", "Mati Kask", "Zummer OÜ"]);
}

#[tokio::test]
async fn get_update_delete_client() {
    let harness = TestHarness::new();
    let id = harness.create_client().await;

    // Get
    let response = harness
        .server
        .get(&format!("/v1/clients/{id}"))
        .add_header("authorization", harness.auth_header())
        .await;
    response.assert_status_ok();

    // Update
    let response = harness
        .server
        .put(&format!("/v1/clients/{id}"))
        .add_header("authorization", harness.auth_header())
        .json(&json!({ "phone": "+372 5100 0000", "notes": "maksab hilinemisega" }))
        .await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["phone"], "+372 5100 0000");
    // Untouched fields survive a partial update.
    assert_eq!(body["data"]["name"], "Rakvere Ehitus AS");

    // Delete
    let response = harness
        .server
        .delete(&format!("/v1/clients/{id}"))
        .add_header("authorization", harness.auth_header())
        .await;
    response.assert_status_ok();

    let response = harness
        .server
        .get(&format!("/v1/clients/{id}"))
        .add_header("authorization", harness.auth_header())
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn clients_are_isolated_between_accounts() {
    let harness = TestHarness::new();
    let id = harness.create_client().await;

    let other = AccountId::generate();
    let response = harness
        .server
        .get(&format!("/v1/clients/{id}"))
        .add_header("authorization", harness.auth_header_for(&other))
        .await;
    response.assert_status_not_found();

    let response = harness
        .server
        .delete(&format!("/v1/clients/{id}"))
        .add_header("authorization", harness.auth_header_for(&other))
        .await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn list_clients_without_auth_fails() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/clients").await;

    response.assert_status_unauthorized();
}
