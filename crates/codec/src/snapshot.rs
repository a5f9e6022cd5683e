//! JSON snapshot format for the stock collection.
//!
//! The import surface accepts exactly what `export_snapshot` produces: a JSON
//! array of stock records with no schema version field. Imported records are
//! trusted as-is; the only check is shape conformance.

use loomledger_core::{LedgerError, LedgerResult};
use loomledger_engine::LedgerEngine;
use loomledger_records::{StockRecord, StockSnapshot};
use loomledger_store::LedgerStore;

/// Serialize the stock collection to its snapshot document.
pub fn export_snapshot(stock: &[StockRecord]) -> LedgerResult<String> {
    serde_json::to_string_pretty(stock).map_err(|e| LedgerError::format(e.to_string()))
}

/// Parse a snapshot document back into stock records.
///
/// Fails with `Format` when the top level is not an array or an element does
/// not decode. Records missing `remainingLength` are backfilled silently, the
/// same rule the persistence adapter applies.
pub fn parse_snapshot(raw: &str) -> LedgerResult<Vec<StockRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| LedgerError::format(e.to_string()))?;
    if !value.is_array() {
        return Err(LedgerError::format("top level is not an array of records"));
    }
    let snapshots: Vec<StockSnapshot> =
        serde_json::from_value(value).map_err(|e| LedgerError::format(e.to_string()))?;
    Ok(snapshots
        .into_iter()
        .map(|snapshot| snapshot.into_record().0)
        .collect())
}

/// Parse a snapshot document and wholesale-replace the engine's stock
/// collection with it.
///
/// A `Format` failure leaves the engine untouched; on success the outbound
/// collection is unaffected and the new stock record count is returned.
/// Destructive by design; confirmation is the call site's concern.
pub fn import_snapshot<S: LedgerStore>(
    engine: &mut LedgerEngine<S>,
    raw: &str,
) -> LedgerResult<usize> {
    let records = parse_snapshot(raw)?;
    Ok(engine.replace_stock(records))
}
