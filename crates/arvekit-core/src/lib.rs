//! Core types and utilities for arvekit.
//!
//! This crate provides the foundational types used throughout the arvekit
//! platform:
//!
//! - **Identifiers**: `AccountId`, `ClientId`, `ServiceId`, `QuoteId`, `InvoiceId`
//! - **Numbering**: `DocumentClass`, `DocumentNumber`, `DocumentCounter`
//! - **Profiles**: `BusinessProfile`, `BusinessSnapshot`
//! - **Clients**: `Client`, `ClientType`, `ClientSnapshot`
//! - **Catalog**: `CatalogService`
//! - **Documents**: `Quote`, `Invoice`, `LineItem`
//!
//! # Money
//!
//! **All monetary amounts are integer cents (`i64`)** to avoid floating point
//! precision issues. A line priced at 45.00 EUR is stored as `4500`.
//!
//! # Document numbers
//!
//! Quote and invoice numbers are allocated once, embedded into the document
//! as a plain string, and never change afterwards — Estonian accounting
//! retention rules require issued numbers to stay unique and unrevoked even
//! when a document is later cancelled.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod client;
pub mod document;
pub mod ids;
pub mod number;
pub mod profile;

pub use catalog::CatalogService;
pub use client::{Client, ClientSnapshot, ClientType};
pub use document::{line_items_subtotal, Invoice, InvoiceStatus, LineItem, Quote, QuoteStatus};
pub use ids::{AccountId, ClientId, IdError, InvoiceId, QuoteId, ServiceId};
pub use number::{DocumentClass, DocumentCounter, DocumentNumber, ParseDocumentClassError};
pub use profile::{
    BusinessProfile, BusinessSnapshot, DEFAULT_ACCENT_COLOR, DEFAULT_DOCUMENT_LANGUAGE,
    DEFAULT_INVOICE_PREFIX, DEFAULT_PAYMENT_DAYS, DEFAULT_QUOTE_PREFIX, DEFAULT_VALIDITY_DAYS,
};
