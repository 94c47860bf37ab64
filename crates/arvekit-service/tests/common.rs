//! Common test utilities for arvekit integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use arvekit_core::AccountId;
use arvekit_service::auth::Claims;
use arvekit_service::{create_router, AppState, ServiceConfig};
use arvekit_store::{MemStore, Store};

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct handle to the backing store, for assertions on counters.
    pub store: Arc<MemStore>,
    /// A test account ID for authenticated requests.
    pub test_account_id: AccountId,
    /// The configuration the server runs with.
    pub config: ServiceConfig,
}

impl TestHarness {
    /// Create a new test harness over a fresh in-memory store.
    pub fn new() -> Self {
        Self::with_registry_url("http://registry.invalid")
    }

    /// Create a harness whose registry proxy points at `registry_url`
    /// (a wiremock server in registry tests).
    pub fn with_registry_url(registry_url: &str) -> Self {
        let store = Arc::new(MemStore::new());

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            database_url: "postgres://unused-in-tests".into(),
            auth_secret: "test-secret".into(),
            auth_audience: "arvekit".into(),
            registry_api_url: registry_url.into(),
            cors_origins: vec!["*".into()],
            max_body_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::clone(&store) as Arc<dyn Store>, config.clone());
        let router: Router = create_router(state);

        let server = TestServer::new(router).expect("Failed to create test server");
        let test_account_id = AccountId::generate();

        Self {
            server,
            store,
            test_account_id,
            config,
        }
    }

    /// Get the authorization header for the harness account.
    pub fn auth_header(&self) -> String {
        self.auth_header_for(&self.test_account_id)
    }

    /// Get an authorization header for an arbitrary account (for testing
    /// isolation).
    pub fn auth_header_for(&self, account_id: &AccountId) -> String {
        let exp = usize::try_from(chrono::Utc::now().timestamp()).unwrap() + 3600;
        let claims = Claims {
            sub: account_id.to_string(),
            aud: self.config.auth_audience.clone(),
            exp,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth_secret.as_bytes()),
        )
        .expect("Failed to encode test token");
        format!("Bearer {token}")
    }

    /// Onboard the harness account with a default business profile
    /// (quote prefix `HP`, invoice prefix `2026`).
    pub async fn onboard(&self) -> serde_json::Value {
        let response = self
            .server
            .post("/v1/profile")
            .add_header("authorization", self.auth_header())
            .json(&default_profile_body())
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json()
    }

    /// Create a client for the harness account and return its id.
    pub async fn create_client(&self) -> String {
        let response = self
            .server
            .post("/v1/clients")
            .add_header("authorization", self.auth_header())
            .json(&json!({
                "client_type": "business",
                "name": "Rakvere Ehitus AS",
                "registry_code": "87654321",
                "address": "Vabaduse 10, Rakvere",
                "email": "ost@rakvereehitus.ee",
                "contact_person": "Mari Maasikas",
            }))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let body: serde_json::Value = response.json();
        body["data"]["id"].as_str().expect("client id").to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// A valid onboarding request body.
pub fn default_profile_body() -> serde_json::Value {
    json!({
        "company_name": "Haljala Elekter OÜ",
        "registry_code": "12345678",
        "address": "Tallinna mnt 1, Haljala",
        "phone": "+372 5555 5555",
        "email": "info@haljalaelekter.ee",
        "trade_type": "electrician",
        "iban": "EE382200221020145685",
        "bank_name": "Swedbank",
    })
}

/// A single priced line item worth 45.00 EUR.
pub fn line_item() -> serde_json::Value {
    json!({
        "description": "Pistikupesa paigaldus",
        "quantity": 3.0,
        "unit": "tk",
        "unit_price_cents": 1500,
        "total_cents": 4500,
        "is_material": false,
    })
}
