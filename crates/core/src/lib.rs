//! `loomledger-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the ledger error taxonomy and strongly-typed record identifiers.

pub mod error;
pub mod id;

pub use error::{LedgerError, LedgerResult};
pub use id::{OutboundId, StockId};
