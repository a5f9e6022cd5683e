//! Import/export codec for the fabric ledger.
//!
//! CSV document producers for both collections, plus the JSON snapshot format
//! that the import surface accepts. Export operates on the engine's current
//! collections; import replaces them through the engine's mutator.

pub mod csv;
pub mod snapshot;

pub use csv::{
    export_outbound_csv, export_stock_csv, outbound_export_filename, stock_export_filename,
};
pub use snapshot::{export_snapshot, import_snapshot, parse_snapshot};
