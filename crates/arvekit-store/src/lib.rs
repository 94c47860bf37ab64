//! Storage layer for arvekit.
//!
//! This crate provides persistent storage for business profiles, clients,
//! catalog services, quotes, invoices, and the per-account document counters
//! behind sequential number allocation.
//!
//! # Backends
//!
//! - [`PgStore`]: PostgreSQL via `sqlx`, the production backend. Document
//!   number allocation is a single `UPDATE ... RETURNING` round trip, so the
//!   database serializes concurrent allocators on the counter row.
//! - [`MemStore`]: an in-memory backend for tests. The whole allocator
//!   read-modify-write runs under one mutex guard.
//!
//! # The numbering contract
//!
//! [`NumberAllocator::allocate`] is the only code path that touches a counter
//! value. Nothing in this crate (or its callers) reads a counter and writes a
//! computed successor in two steps, and counter values are never cached in
//! memory — either would reintroduce the duplicate-number race the atomic
//! primitive exists to prevent.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod mem;
pub mod pg;

pub use error::{AllocationError, Result, StoreError};
pub use mem::MemStore;
pub use pg::PgStore;

use async_trait::async_trait;
use serde::Serialize;

use arvekit_core::{
    AccountId, BusinessProfile, CatalogService, Client, ClientId, DocumentClass, DocumentCounter,
    DocumentNumber, Invoice, InvoiceId, InvoiceStatus, Quote, QuoteId, QuoteStatus, ServiceId,
};

/// Allocator for sequential document numbers.
///
/// One method, so the storage backend is swappable without touching callers.
/// Implementations must guarantee that, for a given `(account, class)` pair,
/// concurrent calls return strictly increasing sequence values with no gaps
/// between successful allocations and no duplicates ever — the allocated
/// number ends up on a financial document and is legally immutable.
#[async_trait]
pub trait NumberAllocator: Send + Sync {
    /// Atomically increment the account's sequence for `class` and return the
    /// post-increment value formatted with `prefix`.
    ///
    /// The counter row must already exist (it is provisioned together with
    /// the business profile); `allocate` never creates it.
    ///
    /// # Errors
    ///
    /// - [`AllocationError::InvalidArgument`] if `prefix` is empty.
    /// - [`AllocationError::AccountNotProvisioned`] if the account has no
    ///   counter record.
    /// - [`AllocationError::Failed`] on storage failure; the counter value is
    ///   left unchanged and the caller must not persist a document.
    async fn allocate(
        &self,
        account_id: &AccountId,
        class: DocumentClass,
        prefix: &str,
    ) -> std::result::Result<DocumentNumber, AllocationError>;
}

/// Per-status aggregate used by the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StatusStat {
    /// The status value.
    pub status: String,
    /// Number of documents in this status.
    pub count: i64,
    /// Sum of document totals in cents.
    pub total_cents: i64,
}

/// The storage trait defining all database operations.
///
/// This trait abstracts the storage layer, allowing for different
/// implementations (PostgreSQL in production, in-memory for testing).
/// Every operation is scoped by the owning account.
#[async_trait]
pub trait Store: NumberAllocator {
    // =========================================================================
    // Business Profiles
    // =========================================================================

    /// Insert a new business profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the account already has a profile.
    async fn insert_profile(&self, profile: &BusinessProfile) -> Result<()>;

    /// Get an account's business profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_profile(&self, account_id: &AccountId) -> Result<Option<BusinessProfile>>;

    /// Update an existing business profile.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account has no profile.
    async fn update_profile(&self, profile: &BusinessProfile) -> Result<()>;

    // =========================================================================
    // Document Counters
    // =========================================================================

    /// Create the account's counter record if it does not exist yet.
    ///
    /// Implemented as a conflict-safe upsert: two concurrent first-time
    /// callers end up with exactly one record, both sequences at zero.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn provision_counter(&self, account_id: &AccountId) -> Result<()>;

    /// Read the account's counter record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_counter(&self, account_id: &AccountId) -> Result<Option<DocumentCounter>>;

    // =========================================================================
    // Clients
    // =========================================================================

    /// Insert a client record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_client(&self, client: &Client) -> Result<()>;

    /// Get a client by id, scoped to the owning account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_client(&self, account_id: &AccountId, id: &ClientId) -> Result<Option<Client>>;

    /// List an account's clients, ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_clients(&self, account_id: &AccountId) -> Result<Vec<Client>>;

    /// Update a client record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the client does not exist for this
    /// account.
    async fn update_client(&self, client: &Client) -> Result<()>;

    /// Delete a client record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the client does not exist for this
    /// account.
    async fn delete_client(&self, account_id: &AccountId, id: &ClientId) -> Result<()>;

    // =========================================================================
    // Catalog Services
    // =========================================================================

    /// Insert a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn insert_service(&self, service: &CatalogService) -> Result<()>;

    /// Get a catalog entry by id, scoped to the owning account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_service(
        &self,
        account_id: &AccountId,
        id: &ServiceId,
    ) -> Result<Option<CatalogService>>;

    /// List an account's catalog, ordered by category then sort order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_services(&self, account_id: &AccountId) -> Result<Vec<CatalogService>>;

    /// Update a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entry does not exist for this
    /// account.
    async fn update_service(&self, service: &CatalogService) -> Result<()>;

    /// Delete a catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the entry does not exist for this
    /// account.
    async fn delete_service(&self, account_id: &AccountId, id: &ServiceId) -> Result<()>;

    // =========================================================================
    // Quotes
    // =========================================================================

    /// Insert a quote. The quote number must already be allocated.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the number is already taken for this
    /// account (which indicates an allocator bug, not a user error).
    async fn insert_quote(&self, quote: &Quote) -> Result<()>;

    /// Get a quote by id, scoped to the owning account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_quote(&self, account_id: &AccountId, id: &QuoteId) -> Result<Option<Quote>>;

    /// List an account's quotes, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_quotes(
        &self,
        account_id: &AccountId,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>>;

    /// Per-status quote counts and totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn quote_stats(&self, account_id: &AccountId) -> Result<Vec<StatusStat>>;

    // =========================================================================
    // Invoices
    // =========================================================================

    /// Insert an invoice. The invoice number must already be allocated.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the number is already taken for this
    /// account.
    async fn insert_invoice(&self, invoice: &Invoice) -> Result<()>;

    /// Get an invoice by id, scoped to the owning account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn get_invoice(&self, account_id: &AccountId, id: &InvoiceId)
        -> Result<Option<Invoice>>;

    /// List an account's invoices, newest first, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn list_invoices(
        &self,
        account_id: &AccountId,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>>;

    /// Per-status invoice counts and totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    async fn invoice_stats(&self, account_id: &AccountId) -> Result<Vec<StatusStat>>;
}

/// Shared prefix validation for allocator implementations.
pub(crate) fn validate_prefix(prefix: &str) -> std::result::Result<(), AllocationError> {
    if prefix.is_empty() {
        return Err(AllocationError::InvalidArgument(
            "prefix must not be empty".into(),
        ));
    }
    Ok(())
}
