//! Ledger error model.

use thiserror::Error;

/// Result type used across the ledger.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Ledger-level error.
///
/// Keep this focused on deterministic, user-correctable failures (validation,
/// missing records, malformed payloads). Storage failures cross into this
/// taxonomy only at the engine boundary, already reduced to a message.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LedgerError {
    /// A field failed validation; the message names the offending field.
    #[error("validation failed: {0}")]
    Validation(String),

    /// An issue request asked for more than the stock has left.
    #[error("insufficient stock: only {available:.2} remaining")]
    InsufficientStock { available: f64 },

    /// A referenced id is absent from its collection.
    #[error("not found")]
    NotFound,

    /// An import payload is not shape-conformant.
    #[error("malformed snapshot: {0}")]
    Format(String),

    /// A save or load against the persistence adapter failed.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl LedgerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_stock(available: f64) -> Self {
        Self::InsufficientStock { available }
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }
}
