//! Tracing/logging setup shared by every binary embedding the ledger.

use tracing_subscriber::EnvFilter;

/// Initialize process-wide tracing/logging.
///
/// JSON lines with flattened event fields, filterable via `RUST_LOG`
/// (default `info`). Safe to call multiple times; subsequent calls become
/// no-ops.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .with_target(false)
        .try_init();
}
