//! Invoice handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use uuid::Uuid;

use arvekit_core::{
    line_items_subtotal, ClientId, DocumentClass, Invoice, InvoiceId, InvoiceStatus, LineItem,
    QuoteId,
};
use arvekit_store::{NumberAllocator, Store};

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// Create invoice request (standalone or from a quote).
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// The client the invoice is issued to.
    pub client_id: ClientId,
    /// The quote this invoice was created from, if any.
    pub quote_id: Option<QuoteId>,
    /// Priced lines; at least one is required.
    pub line_items: Vec<LineItem>,
    /// Free-form notes shown on the document.
    pub notes: Option<String>,
    /// Payment term in days; defaults to the profile's setting.
    pub payment_terms_days: Option<i32>,
    /// When the billed work was performed.
    pub service_date: Option<DateTime<Utc>>,
    /// Document total in cents; defaults to the line-item subtotal.
    pub total_cents: Option<i64>,
}

/// List query parameters.
#[derive(Debug, Deserialize)]
pub struct ListInvoicesParams {
    /// Filter by status; absent or `all` lists everything.
    pub status: Option<String>,
}

fn parse_status_filter(raw: Option<&str>) -> Result<Option<InvoiceStatus>, ApiError> {
    match raw {
        None | Some("all") => Ok(None),
        Some(value) => value
            .parse::<InvoiceStatus>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

/// List the account's invoices, newest first.
pub async fn list_invoices(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Query(params): Query<ListInvoicesParams>,
) -> Result<Json<Data<Vec<Invoice>>>, ApiError> {
    let status = parse_status_filter(params.status.as_deref())?;
    let invoices = state.store.list_invoices(&auth.account_id, status).await?;
    Ok(Json(Data::new(invoices)))
}

/// Create an invoice.
///
/// Same allocate-then-insert unit as quote creation: a failed insert burns
/// the allocated number, a retry takes the next one. The handler never
/// re-requests a number for the same attempt and never computes one locally.
pub async fn create_invoice(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<Data<Invoice>>), ApiError> {
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

    // When invoicing a quote, the quote must belong to this account.
    if let Some(quote_id) = &body.quote_id {
        state
            .store
            .get_quote(&auth.account_id, quote_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("quote not found: {quote_id}")))?;
    }

    let number = state
        .store
        .allocate(
            &auth.account_id,
            DocumentClass::Invoice,
            &profile.invoice_prefix,
        )
        .await?;

    let subtotal_cents = line_items_subtotal(&body.line_items);
    let total_cents = body.total_cents.unwrap_or(subtotal_cents);
    let payment_terms_days = body
        .payment_terms_days
        .unwrap_or(profile.default_payment_days);

    let now = Utc::now();
    let invoice = Invoice {
        id: InvoiceId::generate(),
        account_id: auth.account_id,
        client_id: client.id,
        quote_id: body.quote_id,
        invoice_number: number.to_string(),
        status: InvoiceStatus::default(),
        client_snapshot: client.snapshot(),
        business_snapshot: profile.snapshot(),
        line_items: body.line_items,
        notes: body.notes,
        subtotal_cents,
        total_cents,
        invoice_date: now,
        service_date: body.service_date,
        due_date: now + Duration::days(i64::from(payment_terms_days)),
        payment_terms_days,
        created_at: now,
        updated_at: now,
    };

    state.store.insert_invoice(&invoice).await?;

    tracing::info!(
        account_id = %auth.account_id,
        invoice_number = %invoice.invoice_number,
        "Invoice created"
    );

    Ok((StatusCode::CREATED, Json(Data::new(invoice))))
}

/// Get a single invoice.
pub async fn get_invoice(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Invoice>>, ApiError> {
    let id = InvoiceId::from_uuid(id);
    let invoice = state
        .store
        .get_invoice(&auth.account_id, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("invoice not found: {id}")))?;

    Ok(Json(Data::new(invoice)))
}
