//! Error types for arvekit storage.

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur in storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database operation failed.
    #[error("database error: {0}")]
    Database(String),

    /// Serialization/deserialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record that was looked up.
        entity: &'static str,
        /// The identifier that missed.
        id: String,
    },

    /// Uniqueness or state conflict.
    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by document number allocation.
///
/// These are deliberately distinct from [`StoreError`]: callers must be able
/// to tell a retryable storage hiccup from a caller bug, and must never
/// respond to either by computing a number locally.
#[derive(Debug, thiserror::Error)]
pub enum AllocationError {
    /// Transient storage or transaction failure. The counter is unchanged;
    /// retrying the whole allocate-then-create sequence is safe (the retry
    /// simply consumes the next value, which may leave a legal gap).
    #[error("allocation failed: {0}")]
    Failed(String),

    /// The account has no counter record and no lazy-creation path ran.
    /// A setup/ordering bug in the caller; not retryable as-is.
    #[error("account not provisioned: {0}")]
    AccountNotProvisioned(String),

    /// Malformed document class or empty prefix. A caller bug.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}
