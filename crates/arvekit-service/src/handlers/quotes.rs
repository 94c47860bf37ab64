//! Quote handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use arvekit_core::{
    line_items_subtotal, ClientId, DocumentClass, LineItem, Quote, QuoteId, QuoteStatus,
};
use arvekit_store::{NumberAllocator, Store};

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// Create quote request.
#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    /// The client the quote is issued to.
    pub client_id: ClientId,
    /// Priced lines; at least one is required.
    pub line_items: Vec<LineItem>,
    /// Free-form notes shown on the document.
    pub notes: Option<String>,
    /// Validity window in days; defaults to the profile's setting.
    pub validity_days: Option<i32>,
    /// Document total in cents; defaults to the line-item subtotal.
    pub total_cents: Option<i64>,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuotesParams {
    /// Filter by status; absent or `all` lists everything.
    pub status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<QuoteStatus>, ApiError> {
    match raw {
        None | Some("all") => Ok(None),
        Some(value) => value
            .parse::<QuoteStatus>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

/// List the account's quotes, newest first.
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Query(params): Query<ListQuotesParams>,
) -> Result<Json<Data<Vec<Quote>>>, ApiError> {
    let status = parse_status_filter(params.status.as_deref())?;
    let quotes = state.store.list_quotes(&auth.account_id, status).await?;
    Ok(Json(Data::new(quotes)))
}

/// Create a quote.
///
/// Allocation and persistence are one logical unit: the quote number is
/// allocated first, then the document is inserted carrying that number. If
/// the insert fails the allocated value stays consumed; a retry allocates a
/// fresh number and the sequence shows a legal gap, never a duplicate.
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Json(body): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<Data<Quote>>), ApiError> {
    if body.line_items.is_empty() {
        return Err(ApiError::BadRequest("line items are required".into()));
    }

    let profile = state
        .store
        .get_profile(&auth.account_id)
        .await?
        .ok_or_else(|| ApiError::BadRequest("business profile required".into()))?;

    let client = state
        .store
        .get_client(&auth.account_id, &body.client_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("client not found: {}", body.client_id)))?;

    let number = state
        .store
        .allocate(&auth.account_id, DocumentClass::Quote, &profile.quote_prefix)
        .await?;

    let subtotal_cents = line_items_subtotal(&body.line_items);
    let total_cents = body.total_cents.unwrap_or(subtotal_cents);
    let validity_days = body.validity_days.unwrap_or(profile.default_validity_days);

    let now = Utc::now();
    let quote = Quote {
        id: QuoteId::generate(),
        account_id: auth.account_id,
        client_id: client.id,
        quote_number: number.to_string(),
        status: QuoteStatus::default(),
        client_snapshot: client.snapshot(),
        business_snapshot: profile.snapshot(),
        line_items: body.line_items,
        notes: body.notes,
        subtotal_cents,
        total_cents,
        validity_days,
        valid_until: now + Duration::days(i64::from(validity_days)),
        issued_at: now,
        created_at: now,
        updated_at: now,
    };

    state.store.insert_quote(&quote).await?;

    tracing::info!(
        account_id = %auth.account_id,
        quote_number = %quote.quote_number,
        "Quote created"
    );

    Ok((StatusCode::CREATED, Json(Data::new(quote))))
}

/// Get a single quote.
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Quote>>, ApiError> {
    let id = QuoteId::from_uuid(id);
    let quote = state
        .store
        .get_quote(&auth.account_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("quote not found: {id}")))?;

    Ok(Json(Data::new(quote)))
}
