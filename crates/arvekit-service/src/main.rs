//! Arvekit Service - HTTP API for quotes, invoices, and document numbering
//!
//! This is the main entry point for the arvekit service.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arvekit_service::{create_router, AppState, ServiceConfig};
use arvekit_store::PgStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,arvekit=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arvekit Service");

    // Load configuration from environment
    let config = ServiceConfig::from_env();

    tracing::info!(
        listen_addr = %config.listen_addr,
        registry_url = %config.registry_api_url,
        "Service configuration loaded"
    );

    // Connect to PostgreSQL and apply migrations
    tracing::info!("Connecting to PostgreSQL");
    let store = PgStore::connect(&config.database_url).await?;
    store.run_migrations().await?;
    tracing::info!("Migrations applied");

    // Build app state
    let state = AppState::new(Arc::new(store), config.clone());

    // Create the router
    let app = create_router(state);
    tracing::info!("Router configured with all API endpoints");

    // Start HTTP server
    tracing::info!(listen_addr = %config.listen_addr, "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
