//! Dashboard handler: per-status aggregates and recent documents.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use arvekit_core::{Invoice, Quote};
use arvekit_store::{StatusStat, Store};

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// How many recent documents of each kind the dashboard shows.
const RECENT_LIMIT: usize = 5;

/// Aggregates for one document kind.
#[derive(Debug, Serialize)]
pub struct DocumentSummary {
    /// Total number of documents.
    pub total_count: i64,
    /// Sum of all document totals in cents.
    pub total_cents: i64,
    /// Per-status breakdown.
    pub by_status: Vec<StatusStat>,
}

impl DocumentSummary {
    fn from_stats(by_status: Vec<StatusStat>) -> Self {
        let total_count = by_status.iter().map(|s| s.count).sum();
        let total_cents = by_status.iter().map(|s| s.total_cents).sum();
        Self {
            total_count,
            total_cents,
            by_status,
        }
    }
}

/// A recent-document row.
#[derive(Debug, Serialize)]
pub struct RecentDocument {
    /// Document id.
    pub id: String,
    /// Allocated document number.
    pub number: String,
    /// Current status.
    pub status: String,
    /// Client name from the frozen snapshot.
    pub client_name: String,
    /// Document total in cents.
    pub total_cents: i64,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

impl From<&Quote> for RecentDocument {
    fn from(quote: &Quote) -> Self {
        Self {
            id: quote.id.to_string(),
            number: quote.quote_number.clone(),
            status: quote.status.to_string(),
            client_name: quote.client_snapshot.name.clone(),
            total_cents: quote.total_cents,
            created_at: quote.created_at,
        }
    }
}

impl From<&Invoice> for RecentDocument {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            number: invoice.invoice_number.clone(),
            status: invoice.status.to_string(),
            client_name: invoice.client_snapshot.name.clone(),
            total_cents: invoice.total_cents,
            created_at: invoice.created_at,
        }
    }
}

/// Dashboard response.
#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    /// Quote aggregates.
    pub quotes: DocumentSummary,
    /// Invoice aggregates.
    pub invoices: DocumentSummary,
    /// The five newest quotes.
    pub recent_quotes: Vec<RecentDocument>,
    /// The five newest invoices.
    pub recent_invoices: Vec<RecentDocument>,
}

/// Aggregate stats and recent documents for the account.
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
) -> Result<Json<Data<DashboardResponse>>, ApiError> {
    let account_id = auth.account_id;
    let (quote_stats, invoice_stats, quotes, invoices) = tokio::try_join!(
        state.store.quote_stats(&account_id),
        state.store.invoice_stats(&account_id),
        state.store.list_quotes(&account_id, None),
        state.store.list_invoices(&account_id, None),
    )?;

    let response = DashboardResponse {
        quotes: DocumentSummary::from_stats(quote_stats),
        invoices: DocumentSummary::from_stats(invoice_stats),
        recent_quotes: quotes.iter().take(RECENT_LIMIT).map(Into::into).collect(),
        recent_invoices: invoices.iter().take(RECENT_LIMIT).map(Into::into).collect(),
    };

    Ok(Json(Data::new(response)))
}
