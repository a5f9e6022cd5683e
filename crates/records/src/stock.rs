use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use loomledger_core::{LedgerError, LedgerResult, StockId};

/// Provenance of a stock record: how its data entered the system.
///
/// Informational only; recognition-derived input is validated identically to
/// manual entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    #[default]
    Manual,
    Recognition,
}

/// Candidate data for creating or editing a stock record.
///
/// The recognition collaborator supplies exactly this shape (tagged
/// `RecordSource::Recognition`); there is no special-cased leniency for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockInput {
    pub name: String,
    pub category: String,
    pub color: String,
    pub width: f64,
    pub total_length: f64,
    pub unit_price: f64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub source: RecordSource,
}

impl StockInput {
    /// Field-level validation, same check order as the entry form.
    ///
    /// Reports the first failing field only.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.name.trim().is_empty() {
            return Err(LedgerError::validation("name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(LedgerError::validation("category must be selected"));
        }
        if self.color.trim().is_empty() {
            return Err(LedgerError::validation("color cannot be empty"));
        }
        if !(self.width > 0.0) {
            return Err(LedgerError::validation("width must be greater than zero"));
        }
        if !(self.total_length > 0.0) {
            return Err(LedgerError::validation("length must be greater than zero"));
        }
        if !(self.unit_price > 0.0) {
            return Err(LedgerError::validation("price must be greater than zero"));
        }
        Ok(())
    }
}

/// One inventory lot of fabric with a fixed total length and a depleting
/// remaining length.
///
/// `remaining_length` is ledger-derived: only outbound issue and bulk
/// reversal move it, never an edit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRecord {
    pub id: StockId,
    pub name: String,
    pub category: String,
    pub color: String,
    pub width: f64,
    pub total_length: f64,
    pub remaining_length: f64,
    pub unit_price: f64,
    pub supplier: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    pub source: RecordSource,
}

impl StockRecord {
    /// Validate `input` and materialize a fresh record with a full remainder.
    pub fn create(input: StockInput) -> LedgerResult<Self> {
        input.validate()?;
        Ok(Self {
            id: StockId::new(),
            remaining_length: input.total_length,
            name: input.name,
            category: input.category,
            color: input.color,
            width: input.width,
            total_length: input.total_length,
            unit_price: input.unit_price,
            supplier: input.supplier,
            notes: input.notes,
            created_at: Utc::now(),
            updated_at: None,
            source: input.source,
        })
    }

    /// Apply an edit to the descriptive fields.
    ///
    /// `created_at`, `remaining_length`, and `source` are preserved: editing
    /// the total length after issuance does not retroactively change the
    /// remaining stock.
    pub fn apply_update(&mut self, input: StockInput) -> LedgerResult<()> {
        input.validate()?;
        self.name = input.name;
        self.category = input.category;
        self.color = input.color;
        self.width = input.width;
        self.total_length = input.total_length;
        self.unit_price = input.unit_price;
        self.supplier = input.supplier;
        self.notes = input.notes;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Derived valuation of the whole lot (total length × unit price).
    pub fn total_value(&self) -> f64 {
        self.total_length * self.unit_price
    }
}

/// Wire shape for a stock record.
///
/// Older persisted payloads predate `remainingLength`; the field is optional
/// here and backfilled with the total length on conversion.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSnapshot {
    pub id: StockId,
    pub name: String,
    pub category: String,
    pub color: String,
    pub width: f64,
    pub total_length: f64,
    #[serde(default)]
    pub remaining_length: Option<f64>,
    pub unit_price: f64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub source: RecordSource,
}

impl StockSnapshot {
    /// Convert into a record, backfilling a missing remainder.
    ///
    /// Returns `true` when the backfill happened, so the caller can decide to
    /// re-persist the upgraded shape once.
    pub fn into_record(self) -> (StockRecord, bool) {
        let backfilled = self.remaining_length.is_none();
        let record = StockRecord {
            id: self.id,
            remaining_length: self.remaining_length.unwrap_or(self.total_length),
            name: self.name,
            category: self.category,
            color: self.color,
            width: self.width,
            total_length: self.total_length,
            unit_price: self.unit_price,
            supplier: self.supplier,
            notes: self.notes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            source: self.source,
        };
        (record, backfilled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_input() -> StockInput {
        StockInput {
            name: "Cotton A".to_string(),
            category: "Cotton".to_string(),
            color: "White".to_string(),
            width: 150.0,
            total_length: 100.0,
            unit_price: 20.0,
            supplier: String::new(),
            notes: String::new(),
            source: RecordSource::Manual,
        }
    }

    #[test]
    fn create_sets_full_remainder() {
        let record = StockRecord::create(valid_input()).unwrap();
        assert_eq!(record.remaining_length, 100.0);
        assert_eq!(record.total_length, 100.0);
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn validation_reports_first_failing_field() {
        let mut input = valid_input();
        input.name = "  ".to_string();
        input.width = -1.0;
        let err = input.validate().unwrap_err();
        match err {
            LedgerError::Validation(msg) => assert!(msg.contains("name")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn validation_checks_in_form_order() {
        let cases: Vec<(Box<dyn Fn(&mut StockInput)>, &str)> = vec![
            (Box::new(|i| i.name.clear()), "name"),
            (Box::new(|i| i.category.clear()), "category"),
            (Box::new(|i| i.color.clear()), "color"),
            (Box::new(|i| i.width = 0.0), "width"),
            (Box::new(|i| i.total_length = 0.0), "length"),
            (Box::new(|i| i.unit_price = -3.0), "price"),
        ];
        for (mutate, field) in cases {
            let mut input = valid_input();
            mutate(&mut input);
            let err = input.validate().unwrap_err();
            match err {
                LedgerError::Validation(msg) => {
                    assert!(msg.contains(field), "expected {field} in {msg:?}");
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn update_preserves_ledger_derived_fields() {
        let mut record = StockRecord::create(valid_input()).unwrap();
        record.remaining_length = 40.0;
        let created = record.created_at;

        let mut edit = valid_input();
        edit.total_length = 500.0;
        edit.unit_price = 25.0;
        record.apply_update(edit).unwrap();

        assert_eq!(record.remaining_length, 40.0);
        assert_eq!(record.total_length, 500.0);
        assert_eq!(record.created_at, created);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn snapshot_backfills_missing_remainder() {
        let raw = r#"{
            "id": "018f3a5e-0000-7000-8000-000000000001",
            "name": "Linen",
            "category": "Linen",
            "color": "Beige",
            "width": 140.0,
            "totalLength": 80.0,
            "unitPrice": 12.5,
            "createdAt": "2024-05-01T08:00:00Z"
        }"#;
        let snapshot: StockSnapshot = serde_json::from_str(raw).unwrap();
        let (record, backfilled) = snapshot.into_record();
        assert!(backfilled);
        assert_eq!(record.remaining_length, 80.0);
        assert_eq!(record.source, RecordSource::Manual);
    }

    #[test]
    fn snapshot_keeps_present_remainder() {
        let record = StockRecord::create(valid_input()).unwrap();
        let json = serde_json::to_string(&record).unwrap();
        let snapshot: StockSnapshot = serde_json::from_str(&json).unwrap();
        let (restored, backfilled) = snapshot.into_record();
        assert!(!backfilled);
        assert_eq!(restored, record);
    }
}
