//! In-memory storage implementation.
//!
//! `MemStore` backs unit and service tests. All tables live behind a single
//! mutex; the allocator's read-modify-write runs entirely under one guard, so
//! it honors the same serialization contract the PostgreSQL backend gets from
//! row locking.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use arvekit_core::{
    AccountId, BusinessProfile, CatalogService, Client, ClientId, DocumentClass, DocumentCounter,
    DocumentNumber, Invoice, InvoiceId, InvoiceStatus, Quote, QuoteId, QuoteStatus, ServiceId,
};
use async_trait::async_trait;

use crate::error::{AllocationError, Result, StoreError};
use crate::{validate_prefix, NumberAllocator, StatusStat, Store};

/// In-memory storage implementation for tests.
#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
    fail_allocations: AtomicBool,
}

#[derive(Default)]
struct Inner {
    profiles: HashMap<AccountId, BusinessProfile>,
    counters: HashMap<AccountId, DocumentCounter>,
    clients: HashMap<ClientId, Client>,
    services: HashMap<ServiceId, CatalogService>,
    quotes: HashMap<QuoteId, Quote>,
    invoices: HashMap<InvoiceId, Invoice>,
}

impl MemStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `allocate` calls fail with `AllocationError::Failed`
    /// without touching any counter, to simulate a storage outage.
    pub fn fail_allocations(&self, fail: bool) {
        self.fail_allocations.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("store lock poisoned".into()))
    }
}

fn stats_of<I>(rows: I) -> Vec<StatusStat>
where
    I: Iterator<Item = (String, i64)>,
{
    let mut grouped: HashMap<String, (i64, i64)> = HashMap::new();
    for (status, total_cents) in rows {
        let entry = grouped.entry(status).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += total_cents;
    }
    grouped
        .into_iter()
        .map(|(status, (count, total_cents))| StatusStat {
            status,
            count,
            total_cents,
        })
        .collect()
}

#[async_trait]
impl NumberAllocator for MemStore {
    async fn allocate(
        &self,
        account_id: &AccountId,
        class: DocumentClass,
        prefix: &str,
    ) -> std::result::Result<DocumentNumber, AllocationError> {
        validate_prefix(prefix)?;

        // The guard spans the whole read-modify-write; nothing observes an
        // intermediate state.
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AllocationError::Failed("store lock poisoned".into()))?;

        if self.fail_allocations.load(Ordering::SeqCst) {
            return Err(AllocationError::Failed("injected storage failure".into()));
        }

        let counter = inner.counters.get_mut(account_id).ok_or_else(|| {
            AllocationError::AccountNotProvisioned(account_id.to_string())
        })?;

        let sequence = match class {
            DocumentClass::Quote => {
                counter.current_quote_number += 1;
                counter.current_quote_number
            }
            DocumentClass::Invoice => {
                counter.current_invoice_number += 1;
                counter.current_invoice_number
            }
        };
        counter.updated_at = Utc::now();

        Ok(DocumentNumber::new(prefix, sequence))
    }
}

#[async_trait]
impl Store for MemStore {
    // =========================================================================
    // Business Profiles
    // =========================================================================

    async fn insert_profile(&self, profile: &BusinessProfile) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.profiles.contains_key(&profile.account_id) {
            return Err(StoreError::Conflict("business profile already exists".into()));
        }
        inner.profiles.insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn get_profile(&self, account_id: &AccountId) -> Result<Option<BusinessProfile>> {
        Ok(self.lock()?.profiles.get(account_id).cloned())
    }

    async fn update_profile(&self, profile: &BusinessProfile) -> Result<()> {
        let mut inner = self.lock()?;
        if !inner.profiles.contains_key(&profile.account_id) {
            return Err(StoreError::NotFound {
                entity: "business profile",
                id: profile.account_id.to_string(),
            });
        }
        let mut updated = profile.clone();
        updated.updated_at = Utc::now();
        inner.profiles.insert(profile.account_id, updated);
        Ok(())
    }

    // =========================================================================
    // Document Counters
    // =========================================================================

    async fn provision_counter(&self, account_id: &AccountId) -> Result<()> {
        let mut inner = self.lock()?;
        inner
            .counters
            .entry(*account_id)
            .or_insert_with(|| DocumentCounter::new(*account_id));
        Ok(())
    }

    async fn get_counter(&self, account_id: &AccountId) -> Result<Option<DocumentCounter>> {
        Ok(self.lock()?.counters.get(account_id).cloned())
    }

    // =========================================================================
    // Clients
    // =========================================================================

    async fn insert_client(&self, client: &Client) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.clients.contains_key(&client.id) {
            return Err(StoreError::Conflict("client already exists".into()));
        }
        inner.clients.insert(client.id, client.clone());
        Ok(())
    }

    async fn get_client(&self, account_id: &AccountId, id: &ClientId) -> Result<Option<Client>> {
        Ok(self
            .lock()?
            .clients
            .get(id)
            .filter(|client| client.account_id == *account_id)
            .cloned())
    }

    async fn list_clients(&self, account_id: &AccountId) -> Result<Vec<Client>> {
        let inner = self.lock()?;
        let mut clients: Vec<Client> = inner
            .clients
            .values()
            .filter(|client| client.account_id == *account_id)
            .cloned()
            .collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }

    async fn update_client(&self, client: &Client) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.clients.get(&client.id) {
            Some(existing) if existing.account_id == client.account_id => {
                let mut updated = client.clone();
                updated.updated_at = Utc::now();
                inner.clients.insert(client.id, updated);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "client",
                id: client.id.to_string(),
            }),
        }
    }

    async fn delete_client(&self, account_id: &AccountId, id: &ClientId) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.clients.get(id) {
            Some(existing) if existing.account_id == *account_id => {
                inner.clients.remove(id);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "client",
                id: id.to_string(),
            }),
        }
    }

    // =========================================================================
    // Catalog Services
    // =========================================================================

    async fn insert_service(&self, service: &CatalogService) -> Result<()> {
        let mut inner = self.lock()?;
        if inner.services.contains_key(&service.id) {
            return Err(StoreError::Conflict("catalog service already exists".into()));
        }
        inner.services.insert(service.id, service.clone());
        Ok(())
    }

    async fn get_service(
        &self,
        account_id: &AccountId,
        id: &ServiceId,
    ) -> Result<Option<CatalogService>> {
        Ok(self
            .lock()?
            .services
            .get(id)
            .filter(|service| service.account_id == *account_id)
            .cloned())
    }

    async fn list_services(&self, account_id: &AccountId) -> Result<Vec<CatalogService>> {
        let inner = self.lock()?;
        let mut services: Vec<CatalogService> = inner
            .services
            .values()
            .filter(|service| service.account_id == *account_id)
            .cloned()
            .collect();
        services.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then(a.sort_order.cmp(&b.sort_order))
        });
        Ok(services)
    }

    async fn update_service(&self, service: &CatalogService) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.services.get(&service.id) {
            Some(existing) if existing.account_id == service.account_id => {
                let mut updated = service.clone();
                updated.updated_at = Utc::now();
                inner.services.insert(service.id, updated);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "catalog service",
                id: service.id.to_string(),
            }),
        }
    }

    async fn delete_service(&self, account_id: &AccountId, id: &ServiceId) -> Result<()> {
        let mut inner = self.lock()?;
        match inner.services.get(id) {
            Some(existing) if existing.account_id == *account_id => {
                inner.services.remove(id);
                Ok(())
            }
            _ => Err(StoreError::NotFound {
                entity: "catalog service",
                id: id.to_string(),
            }),
        }
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    async fn insert_quote(&self, quote: &Quote) -> Result<()> {
        let mut inner = self.lock()?;
        let taken = inner.quotes.values().any(|existing| {
            existing.account_id == quote.account_id && existing.quote_number == quote.quote_number
        });
        if taken || inner.quotes.contains_key(&quote.id) {
            return Err(StoreError::Conflict("quote number already exists".into()));
        }
        inner.quotes.insert(quote.id, quote.clone());
        Ok(())
    }

    async fn get_quote(&self, account_id: &AccountId, id: &QuoteId) -> Result<Option<Quote>> {
        Ok(self
            .lock()?
            .quotes
            .get(id)
            .filter(|quote| quote.account_id == *account_id)
            .cloned())
    }

    async fn list_quotes(
        &self,
        account_id: &AccountId,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>> {
        let inner = self.lock()?;
        let mut quotes: Vec<Quote> = inner
            .quotes
            .values()
            .filter(|quote| quote.account_id == *account_id)
            .filter(|quote| status.map_or(true, |s| quote.status == s))
            .cloned()
            .collect();
        quotes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(quotes)
    }

    async fn quote_stats(&self, account_id: &AccountId) -> Result<Vec<StatusStat>> {
        let inner = self.lock()?;
        Ok(stats_of(
            inner
                .quotes
                .values()
                .filter(|quote| quote.account_id == *account_id)
                .map(|quote| (quote.status.to_string(), quote.total_cents)),
        ))
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<()> {
        let mut inner = self.lock()?;
        let taken = inner.invoices.values().any(|existing| {
            existing.account_id == invoice.account_id
                && existing.invoice_number == invoice.invoice_number
        });
        if taken || inner.invoices.contains_key(&invoice.id) {
            return Err(StoreError::Conflict("invoice number already exists".into()));
        }
        inner.invoices.insert(invoice.id, invoice.clone());
        Ok(())
    }

    async fn get_invoice(
        &self,
        account_id: &AccountId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>> {
        Ok(self
            .lock()?
            .invoices
            .get(id)
            .filter(|invoice| invoice.account_id == *account_id)
            .cloned())
    }

    async fn list_invoices(
        &self,
        account_id: &AccountId,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>> {
        let inner = self.lock()?;
        let mut invoices: Vec<Invoice> = inner
            .invoices
            .values()
            .filter(|invoice| invoice.account_id == *account_id)
            .filter(|invoice| status.map_or(true, |s| invoice.status == s))
            .cloned()
            .collect();
        invoices.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invoices)
    }

    async fn invoice_stats(&self, account_id: &AccountId) -> Result<Vec<StatusStat>> {
        let inner = self.lock()?;
        Ok(stats_of(
            inner
                .invoices
                .values()
                .filter(|invoice| invoice.account_id == *account_id)
                .map(|invoice| (invoice.status.to_string(), invoice.total_cents)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(account_id: AccountId) -> BusinessProfile {
        BusinessProfile::new(
            account_id,
            "Haljala Elekter OÜ".into(),
            "12345678".into(),
            "Tallinna mnt 1, Haljala".into(),
            "+372 5555 5555".into(),
            "info@haljalaelekter.ee".into(),
            "electrician".into(),
            "EE382200221020145685".into(),
            "Swedbank".into(),
        )
    }

    #[tokio::test]
    async fn profile_crud() {
        let store = MemStore::new();
        let account = AccountId::generate();

        assert!(store.get_profile(&account).await.unwrap().is_none());

        store.insert_profile(&profile(account)).await.unwrap();
        let stored = store.get_profile(&account).await.unwrap().unwrap();
        assert_eq!(stored.quote_prefix, "HP");

        // Duplicate insert conflicts.
        let err = store.insert_profile(&profile(account)).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));

        let mut updated = stored.clone();
        updated.invoice_prefix = "2027".into();
        store.update_profile(&updated).await.unwrap();
        let stored = store.get_profile(&account).await.unwrap().unwrap();
        assert_eq!(stored.invoice_prefix, "2027");
    }

    #[tokio::test]
    async fn update_missing_profile_fails() {
        let store = MemStore::new();
        let err = store
            .update_profile(&profile(AccountId::generate()))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn provision_counter_is_idempotent() {
        let store = MemStore::new();
        let account = AccountId::generate();

        store.provision_counter(&account).await.unwrap();
        let number = store
            .allocate(&account, DocumentClass::Quote, "HP")
            .await
            .unwrap();
        assert_eq!(number.to_string(), "HP-001");

        // Re-provisioning must not reset the sequence.
        store.provision_counter(&account).await.unwrap();
        let counter = store.get_counter(&account).await.unwrap().unwrap();
        assert_eq!(counter.current_quote_number, 1);
    }

    #[tokio::test]
    async fn duplicate_quote_number_conflicts() {
        let store = MemStore::new();
        let account = AccountId::generate();
        store.provision_counter(&account).await.unwrap();

        let base = profile(account);
        let client = Client {
            id: ClientId::generate(),
            account_id: account,
            client_type: arvekit_core::ClientType::Private,
            name: "Mati Kask".into(),
            registry_code: None,
            kmkr_number: None,
            address: "Pikk 1, Tallinn".into(),
            email: None,
            phone: None,
            contact_person: None,
            is_einvoice_recipient: false,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let make_quote = |number: &str| Quote {
            id: QuoteId::generate(),
            account_id: account,
            client_id: client.id,
            quote_number: number.into(),
            status: QuoteStatus::Draft,
            client_snapshot: client.snapshot(),
            business_snapshot: base.snapshot(),
            line_items: vec![],
            notes: None,
            subtotal_cents: 0,
            total_cents: 0,
            validity_days: 14,
            valid_until: Utc::now(),
            issued_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        store.insert_quote(&make_quote("HP-001")).await.unwrap();
        let err = store.insert_quote(&make_quote("HP-001")).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }
}
