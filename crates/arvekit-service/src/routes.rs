//! Router configuration.
//!
//! This module sets up the Axum router with all routes and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{clients, dashboard, health, invoices, profile, quotes, registry, services};
use crate::state::AppState;

/// Maximum concurrent requests for general API endpoints.
const API_MAX_CONCURRENT_REQUESTS: usize = 50;

/// Create the service router with all routes and middleware.
///
/// # Routes
///
/// ## Public
/// - `GET /health` - Health check
///
/// ## Profile (bearer auth)
/// - `GET /v1/profile` - Get the business profile (`data: null` before onboarding)
/// - `POST /v1/profile` - Create the profile and provision the document counter
/// - `PUT /v1/profile` - Update the profile
///
/// ## Clients (bearer auth)
/// - `GET /v1/clients`, `POST /v1/clients`
/// - `GET /v1/clients/{id}`, `PUT /v1/clients/{id}`, `DELETE /v1/clients/{id}`
///
/// ## Catalog (bearer auth)
/// - `GET /v1/services`, `POST /v1/services`
/// - `GET /v1/services/{id}`, `PUT /v1/services/{id}`, `DELETE /v1/services/{id}`
///
/// ## Documents (bearer auth)
/// - `GET /v1/quotes?status=`, `POST /v1/quotes`, `GET /v1/quotes/{id}`
/// - `GET /v1/invoices?status=`, `POST /v1/invoices`, `GET /v1/invoices/{id}`
///
/// ## Misc (bearer auth)
/// - `GET /v1/dashboard` - Aggregates and recent documents
/// - `GET /v1/registry/search?q=` - Business registry autocomplete proxy
pub fn create_router(state: AppState) -> Router {
    // Extract config values before moving state
    let cors_origins = state.config.cors_origins.clone();
    let max_body_bytes = state.config.max_body_bytes;
    let request_timeout_seconds = state.config.request_timeout_seconds;

    // Build CORS layer
    let cors = build_cors_layer(&cors_origins);

    let state = Arc::new(state);

    let api_routes = Router::new()
        // Profile
        .route("/profile", get(profile::get_profile))
        .route("/profile", post(profile::create_profile))
        .route("/profile", put(profile::update_profile))
        // Clients
        .route("/clients", get(clients::list_clients))
        .route("/clients", post(clients::create_client))
        .route("/clients/:id", get(clients::get_client))
        .route("/clients/:id", put(clients::update_client))
        .route("/clients/:id", delete(clients::delete_client))
        // Catalog
        .route("/services", get(services::list_services))
        .route("/services", post(services::create_service))
        .route("/services/:id", get(services::get_service))
        .route("/services/:id", put(services::update_service))
        .route("/services/:id", delete(services::delete_service))
        // Quotes
        .route("/quotes", get(quotes::list_quotes))
        .route("/quotes", post(quotes::create_quote))
        .route("/quotes/:id", get(quotes::get_quote))
        // Invoices
        .route("/invoices", get(invoices::list_invoices))
        .route("/invoices", post(invoices::create_invoice))
        .route("/invoices/:id", get(invoices::get_invoice))
        // Dashboard + registry proxy
        .route("/dashboard", get(dashboard::dashboard))
        .route("/registry/search", get(registry::search))
        .layer(ConcurrencyLimitLayer::new(API_MAX_CONCURRENT_REQUESTS));

    Router::new()
        // Health (public, no rate limit)
        .route("/health", get(health::health))
        // API v1 routes (rate limited)
        .nest("/v1", api_routes)
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TimeoutLayer::new(Duration::from_secs(
            request_timeout_seconds,
        )))
        .with_state(state)
}

/// Build the CORS layer from configured origins.
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    if origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
