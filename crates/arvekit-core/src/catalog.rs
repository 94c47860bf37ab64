//! Service catalog types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{AccountId, ServiceId};

/// A reusable line-item template in an account's service catalog.
///
/// Catalog entries carry an Estonian name (the document language) and an
/// optional English one. Prices are unit prices in integer cents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogService {
    /// Unique identifier.
    pub id: ServiceId,

    /// The owning account.
    pub account_id: AccountId,

    /// Estonian name.
    pub name_et: String,

    /// English name, if translated.
    pub name_en: Option<String>,

    /// Grouping category (e.g. "paigaldus", "materjal").
    pub category: String,

    /// Unit price in cents.
    pub unit_price_cents: i64,

    /// Billing unit (e.g. "h", "tk", "m2").
    pub unit: String,

    /// Longer description.
    pub description: Option<String>,

    /// Whether this entry is a material rather than labor.
    pub is_material: bool,

    /// Estimated duration per unit, for labor entries.
    pub estimated_minutes: Option<i32>,

    /// Inactive entries stay for history but are hidden from pickers.
    pub is_active: bool,

    /// Manual ordering within a category.
    pub sort_order: i32,

    /// When the entry was created.
    pub created_at: DateTime<Utc>,

    /// When the entry was last updated.
    pub updated_at: DateTime<Utc>,
}

impl CatalogService {
    /// Create a new active catalog entry.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        name_et: String,
        category: String,
        unit_price_cents: i64,
        unit: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ServiceId::generate(),
            account_id,
            name_et,
            name_en: None,
            category,
            unit_price_cents,
            unit,
            description: None,
            is_material: false,
            estimated_minutes: None,
            is_active: true,
            sort_order: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_entry_is_active_labor() {
        let entry = CatalogService::new(
            AccountId::generate(),
            "Pistikupesa paigaldus".into(),
            "paigaldus".into(),
            2500,
            "tk".into(),
        );
        assert!(entry.is_active);
        assert!(!entry.is_material);
        assert_eq!(entry.unit_price_cents, 2500);
        assert_eq!(entry.sort_order, 0);
    }
}
