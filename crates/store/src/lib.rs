//! Persistence adapter for the fabric ledger.
//!
//! Loads and saves the two record collections as a unit. Load never fails:
//! missing or corrupt data yields empty collections so the engine can always
//! start. Save reports failure to the caller and leaves recovery policy to it.

pub mod json_file;
pub mod memory;

use std::sync::Arc;

use thiserror::Error;

use loomledger_records::{OutboundRecord, StockRecord};

/// Persistence operation error.
///
/// Infrastructure failures only (IO, encoding); domain failures never
/// originate here.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io failure: {0}")]
    Io(String),

    #[error("encoding failure: {0}")]
    Encode(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err.to_string())
    }
}

/// Durable home of the two ledger collections.
///
/// Implementations must:
/// - return empty collections (never fail) when data is missing or corrupt
/// - backfill a missing `remainingLength` with the total length at load time
///   and re-persist the upgraded shape once
/// - persist both collections in `save_all`, or report failure without
///   claiming a partial commit
pub trait LedgerStore: Send + Sync {
    /// Load both collections. Infallible by contract.
    fn load_all(&self) -> (Vec<StockRecord>, Vec<OutboundRecord>);

    /// Persist both collections as a unit.
    fn save_all(
        &self,
        stock: &[StockRecord],
        outbound: &[OutboundRecord],
    ) -> Result<(), StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn load_all(&self) -> (Vec<StockRecord>, Vec<OutboundRecord>) {
        (**self).load_all()
    }

    fn save_all(
        &self,
        stock: &[StockRecord],
        outbound: &[OutboundRecord],
    ) -> Result<(), StoreError> {
        (**self).save_all(stock, outbound)
    }
}

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
