use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loomledger_core::{LedgerError, LedgerResult, OutboundId, StockId};

use crate::stock::StockRecord;

/// A request to draw length from a stock record.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundRequest {
    pub stock_id: StockId,
    pub quantity: f64,
    pub purpose: String,
    pub operator: String,
    pub notes: String,
}

impl OutboundRequest {
    /// Presence and positivity checks. The sufficiency check against the
    /// stock's remainder belongs to the engine, which owns the collections.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.purpose.trim().is_empty() {
            return Err(LedgerError::validation("purpose is required"));
        }
        if self.operator.trim().is_empty() {
            return Err(LedgerError::validation("operator is required"));
        }
        if !self.quantity.is_finite() {
            return Err(LedgerError::validation("quantity is required"));
        }
        if self.quantity <= 0.0 {
            return Err(LedgerError::validation(
                "quantity must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// One historical event of drawing length from a stock record.
///
/// `stock_id` is a weak reference: the stock record may be deleted later and
/// resolution is allowed to fail. The denormalized `stock_*` fields and the
/// frozen `total_value` keep the history readable regardless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRecord {
    pub id: OutboundId,
    pub stock_id: StockId,
    pub stock_name: String,
    pub stock_category: String,
    pub stock_color: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub total_value: f64,
    pub purpose: String,
    pub operator: String,
    #[serde(default)]
    pub notes: String,
    pub issued_at: DateTime<Utc>,
}

impl OutboundRecord {
    /// Capture the issue-time snapshot of `stock` for a validated request.
    pub fn issue(stock: &StockRecord, request: &OutboundRequest) -> Self {
        Self {
            id: OutboundId::new(),
            stock_id: stock.id,
            stock_name: stock.name.clone(),
            stock_category: stock.category.clone(),
            stock_color: stock.color.clone(),
            unit_price: stock.unit_price,
            quantity: request.quantity,
            total_value: request.quantity * stock.unit_price,
            purpose: request.purpose.clone(),
            operator: request.operator.clone(),
            notes: request.notes.clone(),
            issued_at: Utc::now(),
        }
    }
}
