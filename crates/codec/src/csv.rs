//! CSV document producers.
//!
//! Fixed header row, one row per record, numeric fields to two decimal
//! places, text fields quoted to escape embedded delimiters. Deterministic
//! given identical input collections; only the suggested filename carries the
//! current date.

use chrono::NaiveDate;

use loomledger_records::{OutboundRecord, StockRecord};

const STOCK_HEADERS: [&str; 10] = [
    "Name",
    "Category",
    "Color",
    "Width (cm)",
    "Total Length (m)",
    "Unit Price",
    "Total Value",
    "Supplier",
    "Notes",
    "Created At",
];

const OUTBOUND_HEADERS: [&str; 10] = [
    "Issued At",
    "Fabric",
    "Category",
    "Color",
    "Quantity (m)",
    "Unit Price",
    "Total Value",
    "Purpose",
    "Operator",
    "Notes",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn num(value: f64) -> String {
    format!("{value:.2}")
}

pub fn export_stock_csv(stock: &[StockRecord]) -> String {
    let mut lines = vec![STOCK_HEADERS.join(",")];
    for record in stock {
        let row = [
            quote(&record.name),
            quote(&record.category),
            quote(&record.color),
            num(record.width),
            num(record.total_length),
            num(record.unit_price),
            num(record.total_value()),
            quote(&record.supplier),
            quote(&record.notes),
            quote(&record.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

pub fn export_outbound_csv(outbound: &[OutboundRecord]) -> String {
    let mut lines = vec![OUTBOUND_HEADERS.join(",")];
    for record in outbound {
        let row = [
            quote(&record.issued_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            quote(&record.stock_name),
            quote(&record.stock_category),
            quote(&record.stock_color),
            num(record.quantity),
            num(record.unit_price),
            num(record.total_value),
            quote(&record.purpose),
            quote(&record.operator),
            quote(&record.notes),
        ];
        lines.push(row.join(","));
    }
    lines.join("\n")
}

/// Suggested download name for the stock export.
pub fn stock_export_filename(date: NaiveDate) -> String {
    format!("fabric-stock_{date}.csv")
}

/// Suggested download name for the outbound export.
pub fn outbound_export_filename(date: NaiveDate) -> String {
    format!("outbound-records_{date}.csv")
}
