//! Business registry autocomplete proxy handler.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::auth::AuthAccount;
use crate::error::ApiError;
use crate::handlers::Data;
use crate::state::AppState;

/// Minimum query length before the upstream registry is consulted.
const MIN_QUERY_LEN: usize = 2;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Company name fragment.
    pub q: Option<String>,
}

/// Proxy a company-name autocomplete query to the business registry.
///
/// Degrades to an empty result list when the registry is unreachable: a
/// failed lookup must never block client entry, the user just types the
/// details by hand.
pub async fn search(
    State(state): State<Arc<AppState>>,
    _auth: AuthAccount,
    Query(params): Query<SearchParams>,
) -> Result<Json<Data<serde_json::Value>>, ApiError> {
    let query = params.q.unwrap_or_default();
    if query.chars().count() < MIN_QUERY_LEN {
        return Ok(Json(Data::new(serde_json::Value::Array(vec![]))));
    }

    match state.registry.autocomplete(&query).await {
        Ok(payload) => Ok(Json(Data::new(payload))),
        Err(e) => {
            tracing::warn!(error = %e, "Registry lookup failed");
            Ok(Json(Data::new(serde_json::Value::Array(vec![]))))
        }
    }
}
