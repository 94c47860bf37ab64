//! Quote and invoice document types.
//!
//! Documents are immutable snapshots: the client and business details, the
//! line items, and the allocated document number are frozen at creation time.
//! Status fields are plain stored data; the service exposes no transition
//! workflow around them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AccountId, BusinessSnapshot, ClientId, ClientSnapshot, InvoiceId, QuoteId, ServiceId};

/// One priced line on a quote or invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// What the line covers.
    pub description: String,

    /// Quantity in `unit`s. Fractional quantities are normal (2.5 h).
    pub quantity: f64,

    /// Billing unit (e.g. "h", "tk", "m2").
    pub unit: String,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Line total in cents, as priced by the caller.
    pub total_cents: i64,

    /// Whether the line is a material rather than labor.
    pub is_material: bool,

    /// Originating catalog entry, when picked from the catalog.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_service_id: Option<ServiceId>,
}

/// Sum of line totals in cents.
#[must_use]
pub fn line_items_subtotal(items: &[LineItem]) -> i64 {
    items.iter().map(|item| item.total_cents).sum()
}

/// Lifecycle state of a quote. Stored data only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// Not yet sent to the client.
    #[default]
    Draft,
    /// Sent to the client.
    Sent,
    /// Accepted by the client.
    Accepted,
    /// Declined by the client.
    Declined,
    /// Validity window passed.
    Expired,
    /// An invoice was created from this quote.
    Invoiced,
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
            Self::Expired => "expired",
            Self::Invoiced => "invoiced",
        };
        write!(f, "{s}")
    }
}

impl FromStr for QuoteStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "sent" => Ok(Self::Sent),
            "accepted" => Ok(Self::Accepted),
            "declined" => Ok(Self::Declined),
            "expired" => Ok(Self::Expired),
            "invoiced" => Ok(Self::Invoiced),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Lifecycle state of an invoice. Stored data only; invoices are never
/// deleted (7-year retention), cancellation is a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    /// Issued but not yet sent.
    #[default]
    Issued,
    /// Sent to the client.
    Sent,
    /// Paid in full.
    Paid,
    /// Past due date without payment.
    Overdue,
    /// Cancelled. The invoice number stays consumed.
    Cancelled,
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Issued => "issued",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
            Self::Cancelled => "cancelled",
        };
        write!(f, "{s}")
    }
}

impl FromStr for InvoiceStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(Self::Issued),
            "sent" => Ok(Self::Sent),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown document status string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct ParseStatusError(pub String);

/// A quote document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    /// Unique identifier.
    pub id: QuoteId,

    /// The issuing account.
    pub account_id: AccountId,

    /// The client the quote was issued to.
    pub client_id: ClientId,

    /// Allocated document number, e.g. `HP-007`. Immutable once set.
    pub quote_number: String,

    /// Lifecycle state.
    pub status: QuoteStatus,

    /// Client details frozen at issue time.
    pub client_snapshot: ClientSnapshot,

    /// Business details frozen at issue time.
    pub business_snapshot: BusinessSnapshot,

    /// Priced lines.
    pub line_items: Vec<LineItem>,

    /// Free-form notes shown on the document.
    pub notes: Option<String>,

    /// Sum of line totals in cents.
    pub subtotal_cents: i64,

    /// Document total in cents.
    pub total_cents: i64,

    /// Validity window in days.
    pub validity_days: i32,

    /// Last day the quote can be accepted.
    pub valid_until: DateTime<Utc>,

    /// When the quote was issued.
    pub issued_at: DateTime<Utc>,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An invoice document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,

    /// The issuing account.
    pub account_id: AccountId,

    /// The client the invoice was issued to.
    pub client_id: ClientId,

    /// The quote this invoice was created from, if any.
    pub quote_id: Option<QuoteId>,

    /// Allocated document number, e.g. `2026-014`. Immutable once set.
    pub invoice_number: String,

    /// Lifecycle state.
    pub status: InvoiceStatus,

    /// Client details frozen at issue time.
    pub client_snapshot: ClientSnapshot,

    /// Business details frozen at issue time.
    pub business_snapshot: BusinessSnapshot,

    /// Priced lines.
    pub line_items: Vec<LineItem>,

    /// Free-form notes shown on the document.
    pub notes: Option<String>,

    /// Sum of line totals in cents.
    pub subtotal_cents: i64,

    /// Document total in cents.
    pub total_cents: i64,

    /// Invoice date.
    pub invoice_date: DateTime<Utc>,

    /// When the billed work was performed.
    pub service_date: Option<DateTime<Utc>>,

    /// Payment due date.
    pub due_date: DateTime<Utc>,

    /// Payment term in days.
    pub payment_terms_days: i32,

    /// When the record was created.
    pub created_at: DateTime<Utc>,

    /// When the record was last updated.
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(total_cents: i64) -> LineItem {
        LineItem {
            description: "Kaabli vedu".into(),
            quantity: 1.0,
            unit: "h".into(),
            unit_price_cents: total_cents,
            total_cents,
            is_material: false,
            catalog_service_id: None,
        }
    }

    #[test]
    fn subtotal_sums_line_totals() {
        assert_eq!(line_items_subtotal(&[]), 0);
        assert_eq!(line_items_subtotal(&[item(4500), item(1250)]), 5750);
    }

    #[test]
    fn quote_status_roundtrip() {
        for status in [
            QuoteStatus::Draft,
            QuoteStatus::Sent,
            QuoteStatus::Accepted,
            QuoteStatus::Declined,
            QuoteStatus::Expired,
            QuoteStatus::Invoiced,
        ] {
            assert_eq!(status.to_string().parse::<QuoteStatus>(), Ok(status));
        }
        assert!("approved".parse::<QuoteStatus>().is_err());
    }

    #[test]
    fn invoice_status_roundtrip() {
        for status in [
            InvoiceStatus::Issued,
            InvoiceStatus::Sent,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
            InvoiceStatus::Cancelled,
        ] {
            assert_eq!(status.to_string().parse::<InvoiceStatus>(), Ok(status));
        }
        assert!("void".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn line_item_serde_omits_absent_catalog_link() {
        let json = serde_json::to_value(item(100)).unwrap();
        assert!(json.get("catalog_service_id").is_none());

        let parsed: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.total_cents, 100);
    }
}
