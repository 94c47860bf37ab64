//! Business profile types.
//!
//! The profile holds the issuing business's registry data, bank details, and
//! per-account document configuration (number prefixes, default terms). The
//! subset that legally belongs on an issued document is captured as a
//! `BusinessSnapshot` at creation time, so later profile edits never rewrite
//! history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::AccountId;

// ============================================================================
// Constants
// ============================================================================

/// Default payment term for invoices, in days.
pub const DEFAULT_PAYMENT_DAYS: i32 = 14;

/// Default validity window for quotes, in days.
pub const DEFAULT_VALIDITY_DAYS: i32 = 14;

/// Default invoice number prefix for new profiles.
pub const DEFAULT_INVOICE_PREFIX: &str = "2026";

/// Default quote number prefix for new profiles.
pub const DEFAULT_QUOTE_PREFIX: &str = "HP";

/// Default document language (Estonian).
pub const DEFAULT_DOCUMENT_LANGUAGE: &str = "et";

/// Default accent color for rendered documents.
pub const DEFAULT_ACCENT_COLOR: &str = "#2563EB";

/// The business profile of an account.
///
/// One profile per account. Created during onboarding, before any document
/// can be issued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessProfile {
    /// The owning account.
    pub account_id: AccountId,

    /// Legal company name.
    pub company_name: String,

    /// Estonian business registry code.
    pub registry_code: String,

    /// Business address.
    pub address: String,

    /// Contact phone.
    pub phone: String,

    /// Contact email.
    pub email: String,

    /// Whether the business is VAT registered.
    pub is_vat_registered: bool,

    /// KMKR (VAT) number, present only for VAT-registered businesses.
    pub kmkr_number: Option<String>,

    /// Trade type (e.g. "electrician", "plumber").
    pub trade_type: String,

    /// Bank account IBAN printed on invoices.
    pub iban: String,

    /// Bank name printed on invoices.
    pub bank_name: String,

    /// URL of the uploaded logo, if any.
    pub logo_url: Option<String>,

    /// Default payment term in days for new invoices.
    pub default_payment_days: i32,

    /// Default validity window in days for new quotes.
    pub default_validity_days: i32,

    /// Prefix for invoice numbers, captured per allocation.
    pub invoice_prefix: String,

    /// Prefix for quote numbers, captured per allocation.
    pub quote_prefix: String,

    /// Document language code.
    pub document_language: String,

    /// Accent color for rendered documents.
    pub accent_color: String,

    /// When the profile was created.
    pub created_at: DateTime<Utc>,

    /// When the profile was last updated.
    pub updated_at: DateTime<Utc>,
}

impl BusinessProfile {
    /// Create a new profile with default terms and prefixes.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        account_id: AccountId,
        company_name: String,
        registry_code: String,
        address: String,
        phone: String,
        email: String,
        trade_type: String,
        iban: String,
        bank_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            account_id,
            company_name,
            registry_code,
            address,
            phone,
            email,
            is_vat_registered: false,
            kmkr_number: None,
            trade_type,
            iban,
            bank_name,
            logo_url: None,
            default_payment_days: DEFAULT_PAYMENT_DAYS,
            default_validity_days: DEFAULT_VALIDITY_DAYS,
            invoice_prefix: DEFAULT_INVOICE_PREFIX.to_string(),
            quote_prefix: DEFAULT_QUOTE_PREFIX.to_string(),
            document_language: DEFAULT_DOCUMENT_LANGUAGE.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Capture the immutable business snapshot embedded into documents.
    #[must_use]
    pub fn snapshot(&self) -> BusinessSnapshot {
        BusinessSnapshot {
            company_name: self.company_name.clone(),
            registry_code: self.registry_code.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            is_vat_registered: self.is_vat_registered,
            kmkr_number: self.kmkr_number.clone(),
            trade_type: self.trade_type.clone(),
            iban: self.iban.clone(),
            bank_name: self.bank_name.clone(),
            logo_url: self.logo_url.clone(),
        }
    }
}

/// The business details frozen into a document at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessSnapshot {
    /// Legal company name.
    pub company_name: String,
    /// Estonian business registry code.
    pub registry_code: String,
    /// Business address.
    pub address: String,
    /// Contact phone.
    pub phone: String,
    /// Contact email.
    pub email: String,
    /// Whether the business was VAT registered at issue time.
    pub is_vat_registered: bool,
    /// KMKR (VAT) number at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kmkr_number: Option<String>,
    /// Trade type.
    pub trade_type: String,
    /// Bank account IBAN.
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Logo URL at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}
