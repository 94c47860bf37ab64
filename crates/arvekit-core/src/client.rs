//! Client (customer) types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AccountId, ClientId};

/// Whether a client is a private person or a registered business.
///
/// The distinction matters downstream: B2C documents carry consumer-law
/// notices that B2B documents do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientType {
    /// A private person.
    Private,
    /// A registered business.
    Business,
}

impl fmt::Display for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private => write!(f, "private"),
            Self::Business => write!(f, "business"),
        }
    }
}

impl FromStr for ClientType {
    type Err = ParseClientTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "business" => Ok(Self::Business),
            other => Err(ParseClientTypeError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown client type string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown client type: {0}")]
pub struct ParseClientTypeError(pub String);

/// A customer record belonging to one account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Unique identifier.
    pub id: ClientId,

    /// The owning account.
    pub account_id: AccountId,

    /// Private person or business.
    pub client_type: ClientType,

    /// Client name (person or company).
    pub name: String,

    /// Business registry code, for business clients.
    pub registry_code: Option<String>,

    /// KMKR (VAT) number, for VAT-registered business clients.
    pub kmkr_number: Option<String>,

    /// Postal address.
    pub address: String,

    /// Contact email.
    pub email: Option<String>,

    /// Contact phone.
    pub phone: Option<String>,

    /// Contact person, for business clients.
    pub contact_person: Option<String>,

    /// Whether the client receives e-invoices.
    pub is_einvoice_recipient: bool,

    /// Free-form notes.
    pub notes: Option<String>,

    /// When the client was created.
    pub created_at: DateTime<Utc>,

    /// When the client was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Client {
    /// Capture the immutable client snapshot embedded into documents.
    #[must_use]
    pub fn snapshot(&self) -> ClientSnapshot {
        ClientSnapshot {
            client_type: self.client_type,
            name: self.name.clone(),
            registry_code: self.registry_code.clone(),
            kmkr_number: self.kmkr_number.clone(),
            address: self.address.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            contact_person: self.contact_person.clone(),
        }
    }
}

/// The client details frozen into a document at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSnapshot {
    /// Private person or business.
    pub client_type: ClientType,
    /// Client name at issue time.
    pub name: String,
    /// Registry code at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry_code: Option<String>,
    /// KMKR number at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kmkr_number: Option<String>,
    /// Address at issue time.
    pub address: String,
    /// Email at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Contact person at issue time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_type_roundtrip() {
        assert_eq!("private".parse::<ClientType>(), Ok(ClientType::Private));
        assert_eq!("business".parse::<ClientType>(), Ok(ClientType::Business));
        assert!("ngo".parse::<ClientType>().is_err());
    }

    #[test]
    fn snapshot_is_detached_from_client() {
        let mut client = Client {
            id: ClientId::generate(),
            account_id: AccountId::generate(),
            client_type: ClientType::Business,
            name: "Rakvere Ehitus AS".into(),
            registry_code: Some("87654321".into()),
            kmkr_number: None,
            address: "Vabaduse 10, Rakvere".into(),
            email: Some("ost@rakvereehitus.ee".into()),
            phone: None,
            contact_person: Some("Mari Maasikas".into()),
            is_einvoice_recipient: false,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let snapshot = client.snapshot();
        client.name = "Renamed AS".into();
        assert_eq!(snapshot.name, "Rakvere Ehitus AS");
        assert_eq!(snapshot.client_type, ClientType::Business);
    }
}
