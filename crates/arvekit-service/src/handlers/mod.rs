//! Request handlers.

pub mod clients;
pub mod dashboard;
pub mod health;
pub mod invoices;
pub mod profile;
pub mod quotes;
pub mod registry;
pub mod services;

use serde::Serialize;

/// Response envelope: every successful payload sits under `data`.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    /// The payload.
    pub data: T,
}

impl<T> Data<T> {
    /// Wrap a payload.
    pub const fn new(data: T) -> Self {
        Self { data }
    }
}
