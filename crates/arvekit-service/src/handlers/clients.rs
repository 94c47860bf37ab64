//! Client management handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use arvekit_core::{Client, ClientId, ClientType};
use arvekit_store::Store;

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// Create client request.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Private person or business.
    pub client_type: ClientType,
    /// Client name.
    pub name: String,
    /// Business registry code.
    pub registry_code: Option<String>,
    /// KMKR number.
    pub kmkr_number: Option<String>,
    /// Postal address.
    pub address: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Whether the client receives e-invoices.
    pub is_einvoice_recipient: Option<bool>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Update client request. Only provided fields change.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    /// Private person or business.
    pub client_type: Option<ClientType>,
    /// Client name.
    pub name: Option<String>,
    /// Business registry code.
    pub registry_code: Option<String>,
    /// KMKR number.
    pub kmkr_number: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact person.
    pub contact_person: Option<String>,
    /// Whether the client receives e-invoices.
    pub is_einvoice_recipient: Option<bool>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// List the account's clients, ordered by name.
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
) -> Result<Json<Data<Vec<Client>>>, ApiError> {
    let clients = state.store.list_clients(&auth.account_id).await?;
    Ok(Json(Data::new(clients)))
}

/// Create a client.
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Json(body): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Data<Client>>), ApiError> {
    let now = Utc::now();
    let client = Client {
        id: ClientId::generate(),
        account_id: auth.account_id,
        client_type: body.client_type,
        name: body.name,
        registry_code: body.registry_code,
        kmkr_number: body.kmkr_number,
        address: body.address,
        email: body.email,
        phone: body.phone,
        contact_person: body.contact_person,
        is_einvoice_recipient: body.is_einvoice_recipient.unwrap_or(false),
        notes: body.notes,
        created_at: now,
        updated_at: now,
    };

    state.store.insert_client(&client).await?;

    tracing::info!(account_id = %auth.account_id, client_id = %client.id, "Client created");

    Ok((StatusCode::CREATED, Json(Data::new(client))))
}

/// Get a single client.
pub async fn get_client(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Client>>, ApiError> {
    let id = ClientId::from_uuid(id);
    let client = state
        .store
        .get_client(&auth.account_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("client not found: {id}")))?;

    Ok(Json(Data::new(client)))
}

/// Update a client.
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateClientRequest>,
) -> Result<Json<Data<Client>>, ApiError> {
    let id = ClientId::from_uuid(id);
    let mut client = state
        .store
        .get_client(&auth.account_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("client not found: {id}")))?;

    if let Some(value) = body.client_type {
        client.client_type = value;
    }
    if let Some(value) = body.name {
        client.name = value;
    }
    if let Some(value) = body.registry_code {
        client.registry_code = Some(value);
    }
    if let Some(value) = body.kmkr_number {
        client.kmkr_number = Some(value);
    }
    if let Some(value) = body.address {
        client.address = value;
    }
    if let Some(value) = body.email {
        client.email = Some(value);
    }
    if let Some(value) = body.phone {
        client.phone = Some(value);
    }
    if let Some(value) = body.contact_person {
        client.contact_person = Some(value);
    }
    if let Some(value) = body.is_einvoice_recipient {
        client.is_einvoice_recipient = value;
    }
    if let Some(value) = body.notes {
        client.notes = Some(value);
    }

    state.store.update_client(&client).await?;

    Ok(Json(Data::new(client)))
}

/// Delete a client.
///
/// Documents keep their own client snapshot, so deleting a client never
/// touches issued quotes or invoices.
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ClientId::from_uuid(id);
    state.store.delete_client(&auth.account_id, &id).await?;

    tracing::info!(account_id = %auth.account_id, client_id = %id, "Client deleted");

    Ok(Json(serde_json::json!({ "deleted": true })))
}
