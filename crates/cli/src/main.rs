//! Ledger report entry point.
//!
//! Opens the engine over the file store and prints the derived statistics.

use loomledger_engine::LedgerEngine;
use loomledger_stats as stats;
use loomledger_store::JsonFileStore;

fn main() {
    loomledger_observability::init();

    let data_dir = std::env::var("LOOMLEDGER_DATA").unwrap_or_else(|_| "data".to_string());
    let engine = LedgerEngine::open(JsonFileStore::new(&data_dir));

    tracing::info!(
        dir = %data_dir,
        stock = engine.stock().len(),
        outbound = engine.outbound().len(),
        "ledger loaded"
    );

    let inventory = stats::inventory_summary(engine.stock());
    println!(
        "Inventory: {} lots | {:.2} m | value {:.2} | {} categories",
        inventory.records, inventory.total_length, inventory.total_value, inventory.categories
    );
    for group in stats::category_breakdown(engine.stock()) {
        println!(
            "  {}: {} lots | {:.2} m | {:.2}",
            group.category, group.records, group.length, group.value
        );
    }

    let outbound = stats::outbound_summary(engine.outbound());
    println!(
        "Outbound: {} draws | {:.2} m | value {:.2} | {} today",
        outbound.records, outbound.total_quantity, outbound.total_value, outbound.issued_today
    );
    for group in stats::purpose_breakdown(engine.outbound()) {
        println!(
            "  {}: {} draws | {:.2} m | {:.2}",
            group.purpose, group.records, group.quantity, group.value
        );
    }
}
