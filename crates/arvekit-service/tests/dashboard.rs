//! Dashboard integration tests.

mod common;

use common::{line_item, TestHarness};
use serde_json::json;

#[tokio::test]
async fn dashboard_aggregates_documents() {
    let harness = TestHarness::new();
    harness.onboard().await;
    let client_id = harness.create_client().await;

    for _ in 0..2 {
        harness
            .server
            .post("/v1/quotes")
            .add_header("authorization", harness.auth_header())
            .json(&json!({
                "client_id": client_id,
                "line_items": [line_item()],
            }))
            .await
            .assert_status(axum::http::StatusCode::CREATED);
    }
    harness
        .server
        .post("/v1/invoices")
        .add_header("authorization", harness.auth_header())
        .json(&json!({
            "client_id": client_id,
            "line_items": [line_item()],
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = harness
        .server
        .get("/v1/dashboard")
        .add_header("authorization", harness.auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["quotes"]["total_count"], 2);
    assert_eq!(body["data"]["quotes"]["total_cents"], 9000);
    assert_eq!(body["data"]["invoices"]["total_count"], 1);
    assert_eq!(body["data"]["invoices"]["total_cents"], 4500);
    assert_eq!(body["data"]["recent_quotes"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["recent_invoices"].as_array().unwrap().len(), 1);

    let by_status = body["data"]["quotes"]["by_status"].as_array().unwrap();
    assert_eq!(by_status.len(), 1);
    assert_eq!(by_status[0]["status"], "draft");
    assert_eq!(by_status[0]["count"], 2);
}

#[tokio::test]
async fn dashboard_is_empty_for_a_fresh_account() {
    let harness = TestHarness::new();

    let response = harness
        .server
        .get("/v1/dashboard")
        .add_header("authorization", harness.auth_header())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["quotes"]["total_count"], 0);
    assert_eq!(body["data"]["invoices"]["total_cents"], 0);
    assert!(body["data"]["recent_quotes"].as_array().unwrap().is_empty());
}
