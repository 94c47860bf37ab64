//! PostgreSQL storage implementation.
//!
//! This module provides the `PgStore` implementation of the `Store` trait.
//!
//! Every statement binds its parameters; the account-identifier predicate in
//! particular is always `$n`-bound, never interpolated into SQL text. The
//! counter increment is a single `UPDATE ... RETURNING` round trip, which is
//! what makes concurrent allocation safe: PostgreSQL row-locks the counter
//! row for the duration of the update, so two racing allocators are
//! serialized and each observes the other's increment.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use arvekit_core::{
    AccountId, BusinessProfile, BusinessSnapshot, CatalogService, Client, ClientId,
    ClientSnapshot, DocumentClass, DocumentCounter, DocumentNumber, Invoice, InvoiceId,
    InvoiceStatus, LineItem, Quote, QuoteId, QuoteStatus, ServiceId,
};
use async_trait::async_trait;

use crate::error::{AllocationError, Result, StoreError};
use crate::{validate_prefix, NumberAllocator, StatusStat, Store};

/// PostgreSQL-backed storage implementation.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database at `database_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .map_err(db_err)?;
        Ok(Self { pool })
    }

    /// Run pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns an error if a migration fails.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(e.to_string()))
    }

    /// The underlying pool, for callers that need raw access in tests.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

fn insert_err(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Conflict(format!("{what} already exists"))
        }
        _ => StoreError::Database(e.to_string()),
    }
}

fn json_err(e: serde_json::Error) -> StoreError {
    StoreError::Serialization(e.to_string())
}

fn parse_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Serialization(e.to_string())
}

// ============================================================================
// Row types
// ============================================================================

#[derive(FromRow)]
struct ProfileRow {
    account_id: Uuid,
    company_name: String,
    registry_code: String,
    address: String,
    phone: String,
    email: String,
    is_vat_registered: bool,
    kmkr_number: Option<String>,
    trade_type: String,
    iban: String,
    bank_name: String,
    logo_url: Option<String>,
    default_payment_days: i32,
    default_validity_days: i32,
    invoice_prefix: String,
    quote_prefix: String,
    document_language: String,
    accent_color: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProfileRow> for BusinessProfile {
    fn from(row: ProfileRow) -> Self {
        Self {
            account_id: AccountId::from_uuid(row.account_id),
            company_name: row.company_name,
            registry_code: row.registry_code,
            address: row.address,
            phone: row.phone,
            email: row.email,
            is_vat_registered: row.is_vat_registered,
            kmkr_number: row.kmkr_number,
            trade_type: row.trade_type,
            iban: row.iban,
            bank_name: row.bank_name,
            logo_url: row.logo_url,
            default_payment_days: row.default_payment_days,
            default_validity_days: row.default_validity_days,
            invoice_prefix: row.invoice_prefix,
            quote_prefix: row.quote_prefix,
            document_language: row.document_language,
            accent_color: row.accent_color,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct CounterRow {
    account_id: Uuid,
    current_invoice_number: i64,
    current_quote_number: i64,
    updated_at: DateTime<Utc>,
}

impl From<CounterRow> for DocumentCounter {
    fn from(row: CounterRow) -> Self {
        Self {
            account_id: AccountId::from_uuid(row.account_id),
            current_invoice_number: row.current_invoice_number,
            current_quote_number: row.current_quote_number,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ClientRow {
    id: Uuid,
    account_id: Uuid,
    client_type: String,
    name: String,
    registry_code: Option<String>,
    kmkr_number: Option<String>,
    address: String,
    email: Option<String>,
    phone: Option<String>,
    contact_person: Option<String>,
    is_einvoice_recipient: bool,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ClientRow> for Client {
    type Error = StoreError;

    fn try_from(row: ClientRow) -> Result<Self> {
        Ok(Self {
            id: ClientId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            client_type: row.client_type.parse().map_err(parse_err)?,
            name: row.name,
            registry_code: row.registry_code,
            kmkr_number: row.kmkr_number,
            address: row.address,
            email: row.email,
            phone: row.phone,
            contact_person: row.contact_person,
            is_einvoice_recipient: row.is_einvoice_recipient,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ServiceRow {
    id: Uuid,
    account_id: Uuid,
    name_et: String,
    name_en: Option<String>,
    category: String,
    unit_price_cents: i64,
    unit: String,
    description: Option<String>,
    is_material: bool,
    estimated_minutes: Option<i32>,
    is_active: bool,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for CatalogService {
    fn from(row: ServiceRow) -> Self {
        Self {
            id: ServiceId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            name_et: row.name_et,
            name_en: row.name_en,
            category: row.category,
            unit_price_cents: row.unit_price_cents,
            unit: row.unit,
            description: row.description,
            is_material: row.is_material,
            estimated_minutes: row.estimated_minutes,
            is_active: row.is_active,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct QuoteRow {
    id: Uuid,
    account_id: Uuid,
    client_id: Uuid,
    quote_number: String,
    status: String,
    client_snapshot: serde_json::Value,
    business_snapshot: serde_json::Value,
    line_items: serde_json::Value,
    notes: Option<String>,
    subtotal_cents: i64,
    total_cents: i64,
    validity_days: i32,
    valid_until: DateTime<Utc>,
    issued_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<QuoteRow> for Quote {
    type Error = StoreError;

    fn try_from(row: QuoteRow) -> Result<Self> {
        let client_snapshot: ClientSnapshot =
            serde_json::from_value(row.client_snapshot).map_err(json_err)?;
        let business_snapshot: BusinessSnapshot =
            serde_json::from_value(row.business_snapshot).map_err(json_err)?;
        let line_items: Vec<LineItem> =
            serde_json::from_value(row.line_items).map_err(json_err)?;
        Ok(Self {
            id: QuoteId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            client_id: ClientId::from_uuid(row.client_id),
            quote_number: row.quote_number,
            status: row.status.parse().map_err(parse_err)?,
            client_snapshot,
            business_snapshot,
            line_items,
            notes: row.notes,
            subtotal_cents: row.subtotal_cents,
            total_cents: row.total_cents,
            validity_days: row.validity_days,
            valid_until: row.valid_until,
            issued_at: row.issued_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct InvoiceRow {
    id: Uuid,
    account_id: Uuid,
    client_id: Uuid,
    quote_id: Option<Uuid>,
    invoice_number: String,
    status: String,
    client_snapshot: serde_json::Value,
    business_snapshot: serde_json::Value,
    line_items: serde_json::Value,
    notes: Option<String>,
    subtotal_cents: i64,
    total_cents: i64,
    invoice_date: DateTime<Utc>,
    service_date: Option<DateTime<Utc>>,
    due_date: DateTime<Utc>,
    payment_terms_days: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> Result<Self> {
        let client_snapshot: ClientSnapshot =
            serde_json::from_value(row.client_snapshot).map_err(json_err)?;
        let business_snapshot: BusinessSnapshot =
            serde_json::from_value(row.business_snapshot).map_err(json_err)?;
        let line_items: Vec<LineItem> =
            serde_json::from_value(row.line_items).map_err(json_err)?;
        Ok(Self {
            id: InvoiceId::from_uuid(row.id),
            account_id: AccountId::from_uuid(row.account_id),
            client_id: ClientId::from_uuid(row.client_id),
            quote_id: row.quote_id.map(QuoteId::from_uuid),
            invoice_number: row.invoice_number,
            status: row.status.parse().map_err(parse_err)?,
            client_snapshot,
            business_snapshot,
            line_items,
            notes: row.notes,
            subtotal_cents: row.subtotal_cents,
            total_cents: row.total_cents,
            invoice_date: row.invoice_date,
            service_date: row.service_date,
            due_date: row.due_date,
            payment_terms_days: row.payment_terms_days,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(FromRow)]
struct StatRow {
    status: String,
    count: i64,
    total_cents: i64,
}

// ============================================================================
// Allocation
// ============================================================================

// The increment and the read of the post-increment value happen in one
// statement. Splitting them into SELECT-then-UPDATE would let two callers
// read the same value and issue the same number.
const ALLOCATE_QUOTE_SQL: &str = "UPDATE document_counters \
     SET current_quote_number = current_quote_number + 1, updated_at = NOW() \
     WHERE account_id = $1 \
     RETURNING current_quote_number";

const ALLOCATE_INVOICE_SQL: &str = "UPDATE document_counters \
     SET current_invoice_number = current_invoice_number + 1, updated_at = NOW() \
     WHERE account_id = $1 \
     RETURNING current_invoice_number";

#[async_trait]
impl NumberAllocator for PgStore {
    async fn allocate(
        &self,
        account_id: &AccountId,
        class: DocumentClass,
        prefix: &str,
    ) -> std::result::Result<DocumentNumber, AllocationError> {
        validate_prefix(prefix)?;

        let sql = match class {
            DocumentClass::Quote => ALLOCATE_QUOTE_SQL,
            DocumentClass::Invoice => ALLOCATE_INVOICE_SQL,
        };

        let sequence: Option<i64> = sqlx::query_scalar(sql)
            .bind(account_id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AllocationError::Failed(e.to_string()))?;

        match sequence {
            Some(sequence) => {
                tracing::debug!(
                    account_id = %account_id,
                    class = %class,
                    sequence,
                    "document number allocated"
                );
                Ok(DocumentNumber::new(prefix, sequence))
            }
            None => Err(AllocationError::AccountNotProvisioned(
                account_id.to_string(),
            )),
        }
    }
}

// ============================================================================
// Store
// ============================================================================

#[async_trait]
impl Store for PgStore {
    // =========================================================================
    // Business Profiles
    // =========================================================================

    async fn insert_profile(&self, profile: &BusinessProfile) -> Result<()> {
        sqlx::query(
            "INSERT INTO business_profiles (\
                 account_id, company_name, registry_code, address, phone, email, \
                 is_vat_registered, kmkr_number, trade_type, iban, bank_name, logo_url, \
                 default_payment_days, default_validity_days, invoice_prefix, quote_prefix, \
                 document_language, accent_color, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                 $17, $18, $19, $20)",
        )
        .bind(profile.account_id.as_uuid())
        .bind(&profile.company_name)
        .bind(&profile.registry_code)
        .bind(&profile.address)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(profile.is_vat_registered)
        .bind(&profile.kmkr_number)
        .bind(&profile.trade_type)
        .bind(&profile.iban)
        .bind(&profile.bank_name)
        .bind(&profile.logo_url)
        .bind(profile.default_payment_days)
        .bind(profile.default_validity_days)
        .bind(&profile.invoice_prefix)
        .bind(&profile.quote_prefix)
        .bind(&profile.document_language)
        .bind(&profile.accent_color)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_err(e, "business profile"))?;

        Ok(())
    }

    async fn get_profile(&self, account_id: &AccountId) -> Result<Option<BusinessProfile>> {
        sqlx::query_as::<_, ProfileRow>(
            "SELECT account_id, company_name, registry_code, address, phone, email, \
                 is_vat_registered, kmkr_number, trade_type, iban, bank_name, logo_url, \
                 default_payment_days, default_validity_days, invoice_prefix, quote_prefix, \
                 document_language, accent_color, created_at, updated_at \
             FROM business_profiles WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)
        .map(|row| row.map(BusinessProfile::from))
    }

    async fn update_profile(&self, profile: &BusinessProfile) -> Result<()> {
        let result = sqlx::query(
            "UPDATE business_profiles SET \
                 company_name = $2, registry_code = $3, address = $4, phone = $5, email = $6, \
                 is_vat_registered = $7, kmkr_number = $8, trade_type = $9, iban = $10, \
                 bank_name = $11, logo_url = $12, default_payment_days = $13, \
                 default_validity_days = $14, invoice_prefix = $15, quote_prefix = $16, \
                 document_language = $17, accent_color = $18, updated_at = NOW() \
             WHERE account_id = $1",
        )
        .bind(profile.account_id.as_uuid())
        .bind(&profile.company_name)
        .bind(&profile.registry_code)
        .bind(&profile.address)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(profile.is_vat_registered)
        .bind(&profile.kmkr_number)
        .bind(&profile.trade_type)
        .bind(&profile.iban)
        .bind(&profile.bank_name)
        .bind(&profile.logo_url)
        .bind(profile.default_payment_days)
        .bind(profile.default_validity_days)
        .bind(&profile.invoice_prefix)
        .bind(&profile.quote_prefix)
        .bind(&profile.document_language)
        .bind(&profile.accent_color)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "business profile",
                id: profile.account_id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Document Counters
    // =========================================================================

    async fn provision_counter(&self, account_id: &AccountId) -> Result<()> {
        // Conflict-safe first use: two racing provisioners insert once.
        sqlx::query(
            "INSERT INTO document_counters \
                 (account_id, current_invoice_number, current_quote_number, updated_at) \
             VALUES ($1, 0, 0, NOW()) \
             ON CONFLICT (account_id) DO NOTHING",
        )
        .bind(account_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn get_counter(&self, account_id: &AccountId) -> Result<Option<DocumentCounter>> {
        sqlx::query_as::<_, CounterRow>(
            "SELECT account_id, current_invoice_number, current_quote_number, updated_at \
             FROM document_counters WHERE account_id = $1",
        )
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)
        .map(|row| row.map(DocumentCounter::from))
    }

    // =========================================================================
    // Clients
    // =========================================================================

    async fn insert_client(&self, client: &Client) -> Result<()> {
        sqlx::query(
            "INSERT INTO clients (\
                 id, account_id, client_type, name, registry_code, kmkr_number, address, \
                 email, phone, contact_person, is_einvoice_recipient, notes, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(client.id.as_uuid())
        .bind(client.account_id.as_uuid())
        .bind(client.client_type.to_string())
        .bind(&client.name)
        .bind(&client.registry_code)
        .bind(&client.kmkr_number)
        .bind(&client.address)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.contact_person)
        .bind(client.is_einvoice_recipient)
        .bind(&client.notes)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_err(e, "client"))?;

        Ok(())
    }

    async fn get_client(&self, account_id: &AccountId, id: &ClientId) -> Result<Option<Client>> {
        sqlx::query_as::<_, ClientRow>(
            "SELECT id, account_id, client_type, name, registry_code, kmkr_number, address, \
                 email, phone, contact_person, is_einvoice_recipient, notes, \
                 created_at, updated_at \
             FROM clients WHERE id = $1 AND account_id = $2",
        )
        .bind(id.as_uuid())
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(Client::try_from)
        .transpose()
    }

    async fn list_clients(&self, account_id: &AccountId) -> Result<Vec<Client>> {
        sqlx::query_as::<_, ClientRow>(
            "SELECT id, account_id, client_type, name, registry_code, kmkr_number, address, \
                 email, phone, contact_person, is_einvoice_recipient, notes, \
                 created_at, updated_at \
             FROM clients WHERE account_id = $1 ORDER BY name ASC",
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?
        .into_iter()
        .map(Client::try_from)
        .collect()
    }

    async fn update_client(&self, client: &Client) -> Result<()> {
        let result = sqlx::query(
            "UPDATE clients SET \
                 client_type = $3, name = $4, registry_code = $5, kmkr_number = $6, \
                 address = $7, email = $8, phone = $9, contact_person = $10, \
                 is_einvoice_recipient = $11, notes = $12, updated_at = NOW() \
             WHERE id = $1 AND account_id = $2",
        )
        .bind(client.id.as_uuid())
        .bind(client.account_id.as_uuid())
        .bind(client.client_type.to_string())
        .bind(&client.name)
        .bind(&client.registry_code)
        .bind(&client.kmkr_number)
        .bind(&client.address)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.contact_person)
        .bind(client.is_einvoice_recipient)
        .bind(&client.notes)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "client",
                id: client.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_client(&self, account_id: &AccountId, id: &ClientId) -> Result<()> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND account_id = $2")
            .bind(id.as_uuid())
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "client",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Catalog Services
    // =========================================================================

    async fn insert_service(&self, service: &CatalogService) -> Result<()> {
        sqlx::query(
            "INSERT INTO catalog_services (\
                 id, account_id, name_et, name_en, category, unit_price_cents, unit, \
                 description, is_material, estimated_minutes, is_active, sort_order, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(service.id.as_uuid())
        .bind(service.account_id.as_uuid())
        .bind(&service.name_et)
        .bind(&service.name_en)
        .bind(&service.category)
        .bind(service.unit_price_cents)
        .bind(&service.unit)
        .bind(&service.description)
        .bind(service.is_material)
        .bind(service.estimated_minutes)
        .bind(service.is_active)
        .bind(service.sort_order)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_err(e, "catalog service"))?;

        Ok(())
    }

    async fn get_service(
        &self,
        account_id: &AccountId,
        id: &ServiceId,
    ) -> Result<Option<CatalogService>> {
        sqlx::query_as::<_, ServiceRow>(
            "SELECT id, account_id, name_et, name_en, category, unit_price_cents, unit, \
                 description, is_material, estimated_minutes, is_active, sort_order, \
                 created_at, updated_at \
             FROM catalog_services WHERE id = $1 AND account_id = $2",
        )
        .bind(id.as_uuid())
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)
        .map(|row| row.map(CatalogService::from))
    }

    async fn list_services(&self, account_id: &AccountId) -> Result<Vec<CatalogService>> {
        sqlx::query_as::<_, ServiceRow>(
            "SELECT id, account_id, name_et, name_en, category, unit_price_cents, unit, \
                 description, is_material, estimated_minutes, is_active, sort_order, \
                 created_at, updated_at \
             FROM catalog_services WHERE account_id = $1 \
             ORDER BY category ASC, sort_order ASC",
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
        .map(|rows| rows.into_iter().map(CatalogService::from).collect())
    }

    async fn update_service(&self, service: &CatalogService) -> Result<()> {
        let result = sqlx::query(
            "UPDATE catalog_services SET \
                 name_et = $3, name_en = $4, category = $5, unit_price_cents = $6, unit = $7, \
                 description = $8, is_material = $9, estimated_minutes = $10, is_active = $11, \
                 sort_order = $12, updated_at = NOW() \
             WHERE id = $1 AND account_id = $2",
        )
        .bind(service.id.as_uuid())
        .bind(service.account_id.as_uuid())
        .bind(&service.name_et)
        .bind(&service.name_en)
        .bind(&service.category)
        .bind(service.unit_price_cents)
        .bind(&service.unit)
        .bind(&service.description)
        .bind(service.is_material)
        .bind(service.estimated_minutes)
        .bind(service.is_active)
        .bind(service.sort_order)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "catalog service",
                id: service.id.to_string(),
            });
        }
        Ok(())
    }

    async fn delete_service(&self, account_id: &AccountId, id: &ServiceId) -> Result<()> {
        let result = sqlx::query("DELETE FROM catalog_services WHERE id = $1 AND account_id = $2")
            .bind(id.as_uuid())
            .bind(account_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                entity: "catalog service",
                id: id.to_string(),
            });
        }
        Ok(())
    }

    // =========================================================================
    // Quotes
    // =========================================================================

    async fn insert_quote(&self, quote: &Quote) -> Result<()> {
        let client_snapshot = serde_json::to_value(&quote.client_snapshot).map_err(json_err)?;
        let business_snapshot =
            serde_json::to_value(&quote.business_snapshot).map_err(json_err)?;
        let line_items = serde_json::to_value(&quote.line_items).map_err(json_err)?;

        sqlx::query(
            "INSERT INTO quotes (\
                 id, account_id, client_id, quote_number, status, client_snapshot, \
                 business_snapshot, line_items, notes, subtotal_cents, total_cents, \
                 validity_days, valid_until, issued_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(quote.id.as_uuid())
        .bind(quote.account_id.as_uuid())
        .bind(quote.client_id.as_uuid())
        .bind(&quote.quote_number)
        .bind(quote.status.to_string())
        .bind(client_snapshot)
        .bind(business_snapshot)
        .bind(line_items)
        .bind(&quote.notes)
        .bind(quote.subtotal_cents)
        .bind(quote.total_cents)
        .bind(quote.validity_days)
        .bind(quote.valid_until)
        .bind(quote.issued_at)
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_err(e, "quote number"))?;

        Ok(())
    }

    async fn get_quote(&self, account_id: &AccountId, id: &QuoteId) -> Result<Option<Quote>> {
        sqlx::query_as::<_, QuoteRow>(
            "SELECT id, account_id, client_id, quote_number, status, client_snapshot, \
                 business_snapshot, line_items, notes, subtotal_cents, total_cents, \
                 validity_days, valid_until, issued_at, created_at, updated_at \
             FROM quotes WHERE id = $1 AND account_id = $2",
        )
        .bind(id.as_uuid())
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(Quote::try_from)
        .transpose()
    }

    async fn list_quotes(
        &self,
        account_id: &AccountId,
        status: Option<QuoteStatus>,
    ) -> Result<Vec<Quote>> {
        const BASE: &str = "SELECT id, account_id, client_id, quote_number, status, \
                 client_snapshot, business_snapshot, line_items, notes, subtotal_cents, \
                 total_cents, validity_days, valid_until, issued_at, created_at, updated_at \
             FROM quotes WHERE account_id = $1";

        let rows = if let Some(status) = status {
            sqlx::query_as::<_, QuoteRow>(&format!(
                "{BASE} AND status = $2 ORDER BY created_at DESC"
            ))
            .bind(account_id.as_uuid())
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, QuoteRow>(&format!("{BASE} ORDER BY created_at DESC"))
                .bind(account_id.as_uuid())
                .fetch_all(&self.pool)
                .await
        }
        .map_err(db_err)?;

        rows.into_iter().map(Quote::try_from).collect()
    }

    async fn quote_stats(&self, account_id: &AccountId) -> Result<Vec<StatusStat>> {
        let rows = sqlx::query_as::<_, StatRow>(
            "SELECT status, COUNT(*) AS count, \
                 COALESCE(SUM(total_cents), 0)::BIGINT AS total_cents \
             FROM quotes WHERE account_id = $1 GROUP BY status",
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| StatusStat {
                status: row.status,
                count: row.count,
                total_cents: row.total_cents,
            })
            .collect())
    }

    // =========================================================================
    // Invoices
    // =========================================================================

    async fn insert_invoice(&self, invoice: &Invoice) -> Result<()> {
        let client_snapshot =
            serde_json::to_value(&invoice.client_snapshot).map_err(json_err)?;
        let business_snapshot =
            serde_json::to_value(&invoice.business_snapshot).map_err(json_err)?;
        let line_items = serde_json::to_value(&invoice.line_items).map_err(json_err)?;

        sqlx::query(
            "INSERT INTO invoices (\
                 id, account_id, client_id, quote_id, invoice_number, status, \
                 client_snapshot, business_snapshot, line_items, notes, subtotal_cents, \
                 total_cents, invoice_date, service_date, due_date, payment_terms_days, \
                 created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, \
                 $17, $18)",
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.account_id.as_uuid())
        .bind(invoice.client_id.as_uuid())
        .bind(invoice.quote_id.as_ref().map(QuoteId::as_uuid))
        .bind(&invoice.invoice_number)
        .bind(invoice.status.to_string())
        .bind(client_snapshot)
        .bind(business_snapshot)
        .bind(line_items)
        .bind(&invoice.notes)
        .bind(invoice.subtotal_cents)
        .bind(invoice.total_cents)
        .bind(invoice.invoice_date)
        .bind(invoice.service_date)
        .bind(invoice.due_date)
        .bind(invoice.payment_terms_days)
        .bind(invoice.created_at)
        .bind(invoice.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_err(e, "invoice number"))?;

        Ok(())
    }

    async fn get_invoice(
        &self,
        account_id: &AccountId,
        id: &InvoiceId,
    ) -> Result<Option<Invoice>> {
        sqlx::query_as::<_, InvoiceRow>(
            "SELECT id, account_id, client_id, quote_id, invoice_number, status, \
                 client_snapshot, business_snapshot, line_items, notes, subtotal_cents, \
                 total_cents, invoice_date, service_date, due_date, payment_terms_days, \
                 created_at, updated_at \
             FROM invoices WHERE id = $1 AND account_id = $2",
        )
        .bind(id.as_uuid())
        .bind(account_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .map(Invoice::try_from)
        .transpose()
    }

    async fn list_invoices(
        &self,
        account_id: &AccountId,
        status: Option<InvoiceStatus>,
    ) -> Result<Vec<Invoice>> {
        const BASE: &str = "SELECT id, account_id, client_id, quote_id, invoice_number, \
                 status, client_snapshot, business_snapshot, line_items, notes, \
                 subtotal_cents, total_cents, invoice_date, service_date, due_date, \
                 payment_terms_days, created_at, updated_at \
             FROM invoices WHERE account_id = $1";

        let rows = if let Some(status) = status {
            sqlx::query_as::<_, InvoiceRow>(&format!(
                "{BASE} AND status = $2 ORDER BY created_at DESC"
            ))
            .bind(account_id.as_uuid())
            .bind(status.to_string())
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_as::<_, InvoiceRow>(&format!("{BASE} ORDER BY created_at DESC"))
                .bind(account_id.as_uuid())
                .fetch_all(&self.pool)
                .await
        }
        .map_err(db_err)?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn invoice_stats(&self, account_id: &AccountId) -> Result<Vec<StatusStat>> {
        let rows = sqlx::query_as::<_, StatRow>(
            "SELECT status, COUNT(*) AS count, \
                 COALESCE(SUM(total_cents), 0)::BIGINT AS total_cents \
             FROM invoices WHERE account_id = $1 GROUP BY status",
        )
        .bind(account_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|row| StatusStat {
                status: row.status,
                count: row.count,
                total_cents: row.total_cents,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn quote_row_conversion() {
        let account = AccountId::generate();
        let row = QuoteRow {
            id: *QuoteId::generate().as_uuid(),
            account_id: *account.as_uuid(),
            client_id: *ClientId::generate().as_uuid(),
            quote_number: "HP-001".into(),
            status: "draft".into(),
            client_snapshot: serde_json::json!({
                "client_type": "private",
                "name": "Mati Kask",
                "address": "Pikk 1, Tallinn",
            }),
            business_snapshot: serde_json::json!({
                "company_name": "Haljala Elekter OÜ",
                "registry_code": "12345678",
                "address": "Tallinna mnt 1",
                "phone": "+372 5555 5555",
                "email": "info@haljalaelekter.ee",
                "is_vat_registered": false,
                "trade_type": "electrician",
                "iban": "EE382200221020145685",
                "bank_name": "Swedbank",
            }),
            line_items: serde_json::json!([]),
            notes: None,
            subtotal_cents: 4500,
            total_cents: 4500,
            validity_days: 14,
            valid_until: Utc::now(),
            issued_at: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let quote = Quote::try_from(row).unwrap();
        assert_eq!(quote.account_id, account);
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.client_snapshot.name, "Mati Kask");
    }

    #[test]
    fn unknown_status_is_a_serialization_error() {
        let row = StatRow {
            status: "draft".into(),
            count: 2,
            total_cents: 9000,
        };
        // StatRow passes status through untouched; the typed parse happens on
        // document rows.
        assert_eq!(row.status, "draft");

        let err = "approved".parse::<QuoteStatus>().map_err(parse_err);
        assert!(matches!(err, Err(StoreError::Serialization(_))));
    }
}
