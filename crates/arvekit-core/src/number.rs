//! Document numbering types.
//!
//! Every account carries two independent sequences, one per document class.
//! The allocated sequence value is rendered into a `DocumentNumber` string
//! (`HP-007`, `2026-014`) that is embedded immutably in the owning document.
//! Allocation itself lives in the storage layer; this module only defines the
//! value types and the canonical formatting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AccountId;

/// The class of a numbered financial document.
///
/// Each class has its own per-account sequence: allocating an invoice number
/// never perturbs the quote sequence and vice versa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentClass {
    /// A quote (hinnapakkumine).
    Quote,
    /// An invoice (arve).
    Invoice,
}

impl fmt::Display for DocumentClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quote => write!(f, "quote"),
            Self::Invoice => write!(f, "invoice"),
        }
    }
}

impl FromStr for DocumentClass {
    type Err = ParseDocumentClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quote" => Ok(Self::Quote),
            "invoice" => Ok(Self::Invoice),
            other => Err(ParseDocumentClassError(other.to_string())),
        }
    }
}

/// Error returned when parsing an unknown document class string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown document class: {0}")]
pub struct ParseDocumentClassError(pub String);

/// A formatted document number: `{prefix}-{sequence}`.
///
/// The sequence component is zero-padded to at least three digits; values of
/// 1000 and above render at their natural width (`HP-007`, `2026-1500`).
/// The prefix is captured from the account's configuration at allocation time
/// and is treated as opaque text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentNumber {
    prefix: String,
    sequence: i64,
}

impl DocumentNumber {
    /// Create a document number from an allocated sequence value.
    #[must_use]
    pub fn new(prefix: impl Into<String>, sequence: i64) -> Self {
        Self {
            prefix: prefix.into(),
            sequence,
        }
    }

    /// The prefix captured at allocation time.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The allocated sequence value.
    #[must_use]
    pub const fn sequence(&self) -> i64 {
        self.sequence
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:03}", self.prefix, self.sequence)
    }
}

impl FromStr for DocumentNumber {
    type Err = ParseDocumentNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // The prefix is free text and may itself contain dashes; the sequence
        // is everything after the last dash.
        let (prefix, seq) = s
            .rsplit_once('-')
            .ok_or_else(|| ParseDocumentNumberError(s.to_string()))?;
        if prefix.is_empty() {
            return Err(ParseDocumentNumberError(s.to_string()));
        }
        let sequence: i64 = seq
            .parse()
            .map_err(|_| ParseDocumentNumberError(s.to_string()))?;
        Ok(Self::new(prefix, sequence))
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = ParseDocumentNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DocumentNumber> for String {
    fn from(number: DocumentNumber) -> Self {
        number.to_string()
    }
}

/// Error returned when parsing a malformed document number string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed document number: {0}")]
pub struct ParseDocumentNumberError(pub String);

/// The per-account counter record backing document number allocation.
///
/// Exactly one record exists per account once its first document (or its
/// business profile) has been created. Both sequence fields only ever move
/// forward, by exactly one per successful allocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentCounter {
    /// The owning account.
    pub account_id: AccountId,
    /// Last issued invoice sequence value.
    pub current_invoice_number: i64,
    /// Last issued quote sequence value.
    pub current_quote_number: i64,
    /// When a sequence was last incremented.
    pub updated_at: DateTime<Utc>,
}

impl DocumentCounter {
    /// Create a fresh counter record with both sequences at zero.
    #[must_use]
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            current_invoice_number: 0,
            current_quote_number: 0,
            updated_at: Utc::now(),
        }
    }

    /// The current sequence value for the given document class.
    #[must_use]
    pub const fn value_for(&self, class: DocumentClass) -> i64 {
        match class {
            DocumentClass::Quote => self.current_quote_number,
            DocumentClass::Invoice => self.current_invoice_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_below_one_thousand() {
        assert_eq!(DocumentNumber::new("HP", 7).to_string(), "HP-007");
        assert_eq!(DocumentNumber::new("HP", 42).to_string(), "HP-042");
        assert_eq!(DocumentNumber::new("2026", 999).to_string(), "2026-999");
    }

    #[test]
    fn no_truncation_above_padding_width() {
        assert_eq!(DocumentNumber::new("2026", 1500).to_string(), "2026-1500");
        assert_eq!(DocumentNumber::new("HP", 1000).to_string(), "HP-1000");
    }

    #[test]
    fn parse_roundtrip() {
        let number: DocumentNumber = "HP-007".parse().unwrap();
        assert_eq!(number.prefix(), "HP");
        assert_eq!(number.sequence(), 7);
        assert_eq!(number.to_string(), "HP-007");
    }

    #[test]
    fn parse_keeps_dashed_prefix() {
        let number: DocumentNumber = "OÜ-2026-014".parse().unwrap();
        assert_eq!(number.prefix(), "OÜ-2026");
        assert_eq!(number.sequence(), 14);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!("HP007".parse::<DocumentNumber>().is_err());
        assert!("-007".parse::<DocumentNumber>().is_err());
        assert!("HP-abc".parse::<DocumentNumber>().is_err());
    }

    #[test]
    fn document_class_roundtrip() {
        assert_eq!("quote".parse::<DocumentClass>(), Ok(DocumentClass::Quote));
        assert_eq!(
            "invoice".parse::<DocumentClass>(),
            Ok(DocumentClass::Invoice)
        );
        assert!("receipt".parse::<DocumentClass>().is_err());
        assert_eq!(DocumentClass::Invoice.to_string(), "invoice");
    }

    #[test]
    fn fresh_counter_is_zeroed() {
        let counter = DocumentCounter::new(AccountId::generate());
        assert_eq!(counter.value_for(DocumentClass::Quote), 0);
        assert_eq!(counter.value_for(DocumentClass::Invoice), 0);
    }
}
