//! Statistics aggregator for the fabric ledger.
//!
//! Pure functions over the current collections, recomputed on every query.
//! No incremental caching, so no staleness is possible; safe to call at any
//! frequency.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};

use loomledger_records::{OutboundRecord, StockRecord};

/// Inventory-wide totals.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySummary {
    pub records: usize,
    pub total_length: f64,
    /// Sum of total length × unit price over all lots.
    pub total_value: f64,
    pub categories: usize,
}

/// Per-category rollup of the stock collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    pub category: String,
    pub records: usize,
    pub length: f64,
    pub value: f64,
}

/// Outbound-wide totals.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundSummary {
    pub records: usize,
    pub total_quantity: f64,
    pub total_value: f64,
    /// Records issued on the given calendar day (local date comparison, not
    /// an elapsed-24h window).
    pub issued_today: usize,
}

/// Per-purpose rollup of the outbound collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PurposeStats {
    pub purpose: String,
    pub records: usize,
    pub quantity: f64,
    pub value: f64,
}

pub fn inventory_summary(stock: &[StockRecord]) -> InventorySummary {
    let mut categories: Vec<&str> = stock.iter().map(|r| r.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    InventorySummary {
        records: stock.len(),
        total_length: stock.iter().map(|r| r.total_length).sum(),
        total_value: stock.iter().map(|r| r.total_value()).sum(),
        categories: categories.len(),
    }
}

/// Group stock records by category, sorted by category name.
pub fn category_breakdown(stock: &[StockRecord]) -> Vec<CategoryStats> {
    let mut groups: BTreeMap<&str, CategoryStats> = BTreeMap::new();
    for record in stock {
        let entry = groups
            .entry(record.category.as_str())
            .or_insert_with(|| CategoryStats {
                category: record.category.clone(),
                records: 0,
                length: 0.0,
                value: 0.0,
            });
        entry.records += 1;
        entry.length += record.total_length;
        entry.value += record.total_value();
    }
    groups.into_values().collect()
}

/// Outbound totals with "today" taken from the local clock.
pub fn outbound_summary(outbound: &[OutboundRecord]) -> OutboundSummary {
    outbound_summary_on(outbound, Local::now().date_naive())
}

/// Outbound totals with an explicit calendar day, for deterministic callers.
pub fn outbound_summary_on(outbound: &[OutboundRecord], day: NaiveDate) -> OutboundSummary {
    OutboundSummary {
        records: outbound.len(),
        total_quantity: outbound.iter().map(|r| r.quantity).sum(),
        total_value: outbound.iter().map(|r| r.total_value).sum(),
        issued_today: outbound
            .iter()
            .filter(|r| r.issued_at.with_timezone(&Local).date_naive() == day)
            .count(),
    }
}

/// Group outbound records by purpose, sorted by purpose.
pub fn purpose_breakdown(outbound: &[OutboundRecord]) -> Vec<PurposeStats> {
    let mut groups: BTreeMap<&str, PurposeStats> = BTreeMap::new();
    for record in outbound {
        let entry = groups
            .entry(record.purpose.as_str())
            .or_insert_with(|| PurposeStats {
                purpose: record.purpose.clone(),
                records: 0,
                quantity: 0.0,
                value: 0.0,
            });
        entry.records += 1;
        entry.quantity += record.quantity;
        entry.value += record.total_value;
    }
    groups.into_values().collect()
}
