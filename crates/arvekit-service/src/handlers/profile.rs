//! Business profile handlers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use arvekit_core::BusinessProfile;
use arvekit_store::Store;

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// Create profile request (onboarding).
#[derive(Debug, Deserialize)]
pub struct CreateProfileRequest {
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
    pub is_vat_registered: Option<bool>,
    /// KMKR number, required when VAT registered.
    pub kmkr_number: Option<String>,
    /// Trade type.
    pub trade_type: String,
    /// Bank account IBAN.
    pub iban: String,
    /// Bank name.
    pub bank_name: String,
    /// Default payment term in days.
    pub default_payment_days: Option<i32>,
    /// Default quote validity in days.
    pub default_validity_days: Option<i32>,
    /// Invoice number prefix.
    pub invoice_prefix: Option<String>,
    /// Quote number prefix.
    pub quote_prefix: Option<String>,
    /// Document language code.
    pub document_language: Option<String>,
    /// Accent color for rendered documents.
    pub accent_color: Option<String>,
}

/// Update profile request. Only provided fields change.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    /// Legal company name.
    pub company_name: Option<String>,
    /// Estonian business registry code.
    pub registry_code: Option<String>,
    /// Business address.
    pub address: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Whether the business is VAT registered.
    pub is_vat_registered: Option<bool>,
    /// KMKR number.
    pub kmkr_number: Option<String>,
    /// Trade type.
    pub trade_type: Option<String>,
    /// Bank account IBAN.
    pub iban: Option<String>,
    /// Bank name.
    pub bank_name: Option<String>,
    /// Default payment term in days.
    pub default_payment_days: Option<i32>,
    /// Default quote validity in days.
    pub default_validity_days: Option<i32>,
    /// Invoice number prefix. Changing it only affects future allocations;
    /// previously issued numbers keep the prefix they were issued with.
    pub invoice_prefix: Option<String>,
    /// Quote number prefix.
    pub quote_prefix: Option<String>,
    /// Document language code.
    pub document_language: Option<String>,
    /// Accent color.
    pub accent_color: Option<String>,
}

/// Get the current account's business profile.
///
/// Returns `data: null` when the account has not onboarded yet; the frontend
/// uses that to route into onboarding.
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
) -> Result<Json<Data<Option<BusinessProfile>>>, ApiError> {
    let profile = state.store.get_profile(&auth.account_id).await?;
    Ok(Json(Data::new(profile)))
}

/// Create the business profile (onboarding) and provision the account's
/// document counter.
pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Json(body): Json<CreateProfileRequest>,
) -> Result<(StatusCode, Json<Data<BusinessProfile>>), ApiError> {
    let mut profile = BusinessProfile::new(
        auth.account_id,
        body.company_name,
        body.registry_code,
        body.address,
        body.phone,
        body.email,
        body.trade_type,
        body.iban,
        body.bank_name,
    );

    profile.is_vat_registered = body.is_vat_registered.unwrap_or(false);
    // A KMKR number only makes sense for VAT-registered businesses.
    profile.kmkr_number = if profile.is_vat_registered {
        body.kmkr_number
    } else {
        None
    };
    if let Some(days) = body.default_payment_days {
        profile.default_payment_days = days;
    }
    if let Some(days) = body.default_validity_days {
        profile.default_validity_days = days;
    }
    if let Some(prefix) = body.invoice_prefix {
        profile.invoice_prefix = prefix;
    }
    if let Some(prefix) = body.quote_prefix {
        profile.quote_prefix = prefix;
    }
    if let Some(language) = body.document_language {
        profile.document_language = language;
    }
    if let Some(color) = body.accent_color {
        profile.accent_color = color;
    }

    state.store.insert_profile(&profile).await?;

    // Conflict-safe upsert: a concurrent onboarding attempt cannot create a
    // second counter, and an existing counter is never reset.
    state.store.provision_counter(&auth.account_id).await?;

    tracing::info!(account_id = %auth.account_id, "Business profile created");

    Ok((StatusCode::CREATED, Json(Data::new(profile))))
}

/// Update the business profile.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    auth: AuthAccount,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Data<BusinessProfile>>, ApiError> {
    let mut profile = state
        .store
        .get_profile(&auth.account_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("business profile not found".into()))?;

    if let Some(value) = body.company_name {
        profile.company_name = value;
    }
    if let Some(value) = body.registry_code {
        profile.registry_code = value;
    }
    if let Some(value) = body.address {
        profile.address = value;
    }
    if let Some(value) = body.phone {
        profile.phone = value;
    }
    if let Some(value) = body.email {
        profile.email = value;
    }
    if let Some(value) = body.is_vat_registered {
        profile.is_vat_registered = value;
    }
    if let Some(value) = body.kmkr_number {
        profile.kmkr_number = Some(value);
    }
    if !profile.is_vat_registered {
        profile.kmkr_number = None;
    }
    if let Some(value) = body.trade_type {
        profile.trade_type = value;
    }
    if let Some(value) = body.iban {
        profile.iban = value;
    }
    if let Some(value) = body.bank_name {
        profile.bank_name = value;
    }
    if let Some(value) = body.default_payment_days {
        profile.default_payment_days = value;
    }
    if let Some(value) = body.default_validity_days {
        profile.default_validity_days = value;
    }
    if let Some(value) = body.invoice_prefix {
        profile.invoice_prefix = value;
    }
    if let Some(value) = body.quote_prefix {
        profile.quote_prefix = value;
    }
    if let Some(value) = body.document_language {
        profile.document_language = value;
    }
    if let Some(value) = body.accent_color {
        profile.accent_color = value;
    }

    state.store.update_profile(&profile).await?;

    tracing::info!(account_id = %auth.account_id, "Business profile updated");

    Ok(Json(Data::new(profile)))
}
