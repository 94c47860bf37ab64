//! Authentication extractor.
//!
//! Every `/v1` request carries a Bearer HS256 JWT. The `sub` claim is the
//! calling account id; the audience is checked against configuration.
//! Identity provisioning itself (issuing these tokens) lives outside this
//! service.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use arvekit_core::AccountId;

use crate::error::ApiError;
use crate::state::AppState;

/// JWT claims accepted by the service.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// The account id.
    pub sub: String,
    /// The intended audience.
    pub aud: String,
    /// Expiry as a Unix timestamp.
    pub exp: usize,
}

/// An authenticated account extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthAccount {
    /// The account id.
    pub account_id: AccountId,
    /// The raw subject claim from the JWT.
    pub subject: String,
}

#[axum::async_trait]
impl FromRequestParts<Arc<AppState>> for AuthAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        // Extract the Authorization header
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        // Extract the Bearer token
        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[state.config.auth_audience.clone()]);

        let key = DecodingKey::from_secret(state.config.auth_secret.as_bytes());
        let data =
            decode::<Claims>(token, &key, &validation).map_err(|_| ApiError::Unauthorized)?;

        let account_id = data
            .claims
            .sub
            .parse::<AccountId>()
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthAccount {
            account_id,
            subject: data.claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    #[test]
    fn claims_roundtrip_through_jwt() {
        let account = AccountId::generate();
        let claims = Claims {
            sub: account.to_string(),
            aud: "arvekit".into(),
            exp: usize::try_from(chrono::Utc::now().timestamp()).unwrap() + 3600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["arvekit"]);
        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"dev-secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(decoded.claims.sub, account.to_string());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let claims = Claims {
            sub: AccountId::generate().to_string(),
            aud: "someone-else".into(),
            exp: usize::try_from(chrono::Utc::now().timestamp()).unwrap() + 3600,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&["arvekit"]);
        assert!(decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"dev-secret"),
            &validation,
        )
        .is_err());
    }
}
