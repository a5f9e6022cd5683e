//! Fabric ledger record models.
//!
//! This crate contains the two entity shapes and their validation rules,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod outbound;
pub mod stock;

pub use outbound::{OutboundRecord, OutboundRequest};
pub use stock::{RecordSource, StockInput, StockRecord, StockSnapshot};
