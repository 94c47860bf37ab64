//! Service catalog handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use arvekit_core::{CatalogService, ServiceId};
use arvekit_store::Store;

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// Create catalog entry request.
#[derive(Debug, Deserialize)]
pub struct CreateServiceRequest {
    /// Estonian name.
    pub name_et: String,
    /// English name.
    pub name_en: Option<String>,
    /// Grouping category.
    pub category: String,
    /// Unit price in cents.
    pub unit_price_cents: i64,
    /// Billing unit.
    pub unit: String,
    /// Longer description.
    pub description: Option<String>,
    /// Material rather than labor.
    pub is_material: Option<bool>,
    /// Estimated duration per unit.
    pub estimated_minutes: Option<i32>,
    /// Manual ordering within the category.
    pub sort_order: Option<i32>,
}

/// Update catalog entry request. Only provided fields change.
#[derive(Debug, Deserialize)]
pub struct UpdateServiceRequest {
    /// Estonian name.
    pub name_et: Option<String>,
    /// English name.
    pub name_en: Option<String>,
    /// Grouping category.
    pub category: Option<String>,
    /// Unit price in cents.
    pub unit_price_cents: Option<i64>,
    /// Billing unit.
    pub unit: Option<String>,
    /// Longer description.
    pub description: Option<String>,
    /// Material rather than labor.
    pub is_material: Option<bool>,
    /// Estimated duration per unit.
    pub estimated_minutes: Option<i32>,
    /// Whether the entry is visible in pickers.
    pub is_active: Option<bool>,
    /// Manual ordering within the category.
    pub sort_order: Option<i32>,
}

/// List the account's catalog, ordered by category and sort order.
pub async fn list_services(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
) -> Result<Json<Data<Vec<CatalogService>>>, ApiError> {
    let services = state.store.list_services(&auth.account_id).await?;
    Ok(Json(Data::new(services)))
}

/// Create a catalog entry.
pub async fn create_service(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Json(body): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Data<CatalogService>>), ApiError> {
    let mut service = CatalogService::new(
        auth.account_id,
        body.name_et,
        body.category,
        body.unit_price_cents,
        body.unit,
    );
    service.name_en = body.name_en;
    service.description = body.description;
    service.is_material = body.is_material.unwrap_or(false);
    service.estimated_minutes = body.estimated_minutes;
    if let Some(order) = body.sort_order {
        service.sort_order = order;
    }

    state.store.insert_service(&service).await?;

    tracing::info!(account_id = %auth.account_id, service_id = %service.id, "Catalog entry created");

    Ok((StatusCode::CREATED, Json(Data::new(service))))
}

/// Get a single catalog entry.
pub async fn get_service(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<CatalogService>>, ApiError> {
    let id = ServiceId::from_uuid(id);
    let service = state
        .store
        .get_service(&auth.account_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("catalog service not found: {id}")))?;

    Ok(Json(Data::new(service)))
}

/// Update a catalog entry.
pub async fn update_service(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateServiceRequest>,
) -> Result<Json<Data<CatalogService>>, ApiError> {
    let id = ServiceId::from_uuid(id);
    let mut service = state
        .store
        .get_service(&auth.account_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("catalog service not found: {id}")))?;

    if let Some(value) = body.name_et {
        service.name_et = value;
    }
    if let Some(value) = body.name_en {
        service.name_en = Some(value);
    }
    if let Some(value) = body.category {
        service.category = value;
    }
    if let Some(value) = body.unit_price_cents {
        service.unit_price_cents = value;
    }
    if let Some(value) = body.unit {
        service.unit = value;
    }
    if let Some(value) = body.description {
        service.description = Some(value);
    }
    if let Some(value) = body.is_material {
        service.is_material = value;
    }
    if let Some(value) = body.estimated_minutes {
        service.estimated_minutes = Some(value);
    }
    if let Some(value) = body.is_active {
        service.is_active = value;
    }
    if let Some(value) = body.sort_order {
        service.sort_order = value;
    }

    state.store.update_service(&service).await?;

    Ok(Json(Data::new(service)))
}

/// Delete a catalog entry.
pub async fn delete_service(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ServiceId::from_uuid(id);
    state.store.delete_service(&auth.account_id, &id).await?;

    tracing::info!(account_id = %auth.account_id, service_id = %id, "Catalog entry deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
