use tracing::warn;

use loomledger_core::{LedgerError, LedgerResult, StockId};
use loomledger_records::{OutboundRecord, OutboundRequest, StockInput, StockRecord};
use loomledger_store::LedgerStore;

/// The ledger engine: single owner of the stock and outbound collections.
///
/// Every operation runs to completion before the next is accepted, so the
/// conservation invariant (`remaining = total − Σ active outbound draws`)
/// holds at every observable point without locking.
///
/// Persistence is best-effort: a failed save is logged and flagged, never
/// rolled back. In-memory state stays authoritative until the next
/// successful save or an explicit [`LedgerEngine::flush`].
#[derive(Debug)]
pub struct LedgerEngine<S: LedgerStore> {
    store: S,
    stock: Vec<StockRecord>,
    outbound: Vec<OutboundRecord>,
    dirty: bool,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Construct the engine from whatever the store currently holds.
    ///
    /// Legacy-shape backfill and corrupt-data recovery happen inside the
    /// store; by the time the collections arrive here they are well-formed.
    pub fn open(store: S) -> Self {
        let (stock, outbound) = store.load_all();
        Self {
            store,
            stock,
            outbound,
            dirty: false,
        }
    }

    pub fn stock(&self) -> &[StockRecord] {
        &self.stock
    }

    pub fn outbound(&self) -> &[OutboundRecord] {
        &self.outbound
    }

    pub fn find_stock(&self, id: StockId) -> Option<&StockRecord> {
        self.stock.iter().find(|r| r.id == id)
    }

    /// Stock records that still have length to draw from.
    pub fn available_stock(&self) -> Vec<&StockRecord> {
        self.stock
            .iter()
            .filter(|r| r.remaining_length > 0.0)
            .collect()
    }

    /// Whether the last save attempt failed, leaving disk behind memory.
    pub fn dirty(&self) -> bool {
        self.dirty
    }

    /// Validate `input` and append a fresh stock record with a full remainder.
    pub fn create_stock(&mut self, input: StockInput) -> LedgerResult<StockRecord> {
        let record = StockRecord::create(input)?;
        self.stock.push(record.clone());
        self.persist();
        Ok(record)
    }

    /// Edit the descriptive fields of an existing record.
    ///
    /// `created_at` and `remaining_length` are preserved: the remainder is
    /// ledger-derived and only moves through issue and reversal.
    pub fn update_stock(&mut self, id: StockId, input: StockInput) -> LedgerResult<StockRecord> {
        let record = self
            .stock
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(LedgerError::NotFound)?;
        record.apply_update(input)?;
        let updated = record.clone();
        self.persist();
        Ok(updated)
    }

    /// Remove a stock record unconditionally.
    ///
    /// Outbound history referencing it is kept, not cascaded; it becomes an
    /// audit log whose stock reference no longer resolves.
    pub fn delete_stock(&mut self, id: StockId) -> LedgerResult<()> {
        let index = self
            .stock
            .iter()
            .position(|r| r.id == id)
            .ok_or(LedgerError::NotFound)?;
        let removed = self.stock.remove(index);

        let orphaned = self.outbound.iter().filter(|o| o.stock_id == id).count();
        if orphaned > 0 {
            warn!(
                stock = %removed.name,
                records = orphaned,
                "deleted stock still referenced by outbound history; those draws can no longer be reversed"
            );
        }

        self.persist();
        Ok(())
    }

    /// Issue an outbound draw against a stock record.
    ///
    /// Preconditions, in order: the stock exists, purpose and operator are
    /// present, the quantity is positive, and the quantity fits the
    /// remainder. A rejected request leaves both collections untouched.
    pub fn issue_outbound(&mut self, request: OutboundRequest) -> LedgerResult<OutboundRecord> {
        let stock = self
            .stock
            .iter_mut()
            .find(|r| r.id == request.stock_id)
            .ok_or(LedgerError::NotFound)?;
        request.validate()?;
        if request.quantity > stock.remaining_length {
            return Err(LedgerError::insufficient_stock(stock.remaining_length));
        }

        let record = OutboundRecord::issue(stock, &request);
        stock.remaining_length -= request.quantity;
        self.outbound.push(record.clone());
        self.persist();
        Ok(record)
    }

    /// Reverse every outbound draw and clear the history.
    ///
    /// Quantities flow back to stock records that still exist; draws whose
    /// stock was deleted are skipped, since there is no target to restore to.
    /// Returns the number of records cleared.
    pub fn reverse_all_outbound(&mut self) -> usize {
        for record in &self.outbound {
            if let Some(stock) = self.stock.iter_mut().find(|r| r.id == record.stock_id) {
                stock.remaining_length += record.quantity;
            }
        }
        let cleared = self.outbound.len();
        self.outbound.clear();
        self.persist();
        cleared
    }

    /// Wipe the stock collection. Outbound history is untouched, the same
    /// no-cascade rule as single deletion. Returns the removed count.
    pub fn clear_stock(&mut self) -> usize {
        let removed = self.stock.len();
        self.stock.clear();
        self.persist();
        removed
    }

    /// Wholesale-replace the stock collection.
    ///
    /// No merge and no per-record invariant validation: the records are
    /// trusted as-is. Destructive by design; parsing the import payload and
    /// confirming the replacement are the call site's concern. Returns the
    /// new record count.
    pub fn replace_stock(&mut self, records: Vec<StockRecord>) -> usize {
        self.stock = records;
        self.persist();
        self.stock.len()
    }

    /// Explicit save, for shutdown or after a flagged best-effort failure.
    pub fn flush(&mut self) -> LedgerResult<()> {
        self.store
            .save_all(&self.stock, &self.outbound)
            .map_err(|e| LedgerError::persistence(e.to_string()))?;
        self.dirty = false;
        Ok(())
    }

    /// Terminal step of every mutator: save both collections as a unit.
    ///
    /// Failure is surfaced as a warning and a dirty flag, never a rollback.
    fn persist(&mut self) {
        match self.store.save_all(&self.stock, &self.outbound) {
            Ok(()) => self.dirty = false,
            Err(err) => {
                self.dirty = true;
                warn!(error = %err, "save failed; in-memory state remains authoritative");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomledger_records::RecordSource;
    use loomledger_store::{InMemoryStore, StoreError};
    use proptest::prelude::*;

    fn input(name: &str, length: f64, price: f64) -> StockInput {
        StockInput {
            name: name.to_string(),
            category: "Cotton".to_string(),
            color: "White".to_string(),
            width: 150.0,
            total_length: length,
            unit_price: price,
            supplier: String::new(),
            notes: String::new(),
            source: RecordSource::Manual,
        }
    }

    fn request(stock_id: StockId, quantity: f64) -> OutboundRequest {
        OutboundRequest {
            stock_id,
            quantity,
            purpose: "Garment order".to_string(),
            operator: "Li".to_string(),
            notes: String::new(),
        }
    }

    fn engine() -> LedgerEngine<InMemoryStore> {
        LedgerEngine::open(InMemoryStore::new())
    }

    /// Store double whose saves always fail.
    struct BrokenStore;

    impl LedgerStore for BrokenStore {
        fn load_all(&self) -> (Vec<StockRecord>, Vec<OutboundRecord>) {
            (vec![], vec![])
        }

        fn save_all(
            &self,
            _stock: &[StockRecord],
            _outbound: &[OutboundRecord],
        ) -> Result<(), StoreError> {
            Err(StoreError::Io("disk full".to_string()))
        }
    }

    #[test]
    fn create_stock_starts_with_full_remainder() {
        let mut engine = engine();
        let record = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        assert_eq!(record.remaining_length, 100.0);
        assert_eq!(engine.stock().len(), 1);
    }

    #[test]
    fn issue_decrements_remainder_and_freezes_value() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();

        let record = engine.issue_outbound(request(stock.id, 30.0)).unwrap();
        assert_eq!(record.total_value, 600.0);
        assert_eq!(engine.find_stock(stock.id).unwrap().remaining_length, 70.0);
    }

    #[test]
    fn over_issue_names_the_available_amount_and_mutates_nothing() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        engine.issue_outbound(request(stock.id, 30.0)).unwrap();

        let before_stock = engine.stock().to_vec();
        let before_outbound = engine.outbound().to_vec();

        let err = engine.issue_outbound(request(stock.id, 80.0)).unwrap_err();
        assert_eq!(err, LedgerError::InsufficientStock { available: 70.0 });
        assert_eq!(engine.stock(), before_stock.as_slice());
        assert_eq!(engine.outbound(), before_outbound.as_slice());
    }

    #[test]
    fn exact_remainder_drains_to_zero_then_rejects() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        engine.issue_outbound(request(stock.id, 30.0)).unwrap();

        engine.issue_outbound(request(stock.id, 70.0)).unwrap();
        assert_eq!(engine.find_stock(stock.id).unwrap().remaining_length, 0.0);
        assert!(engine.available_stock().is_empty());

        let err = engine.issue_outbound(request(stock.id, 0.5)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
    }

    #[test]
    fn reverse_all_restores_remainder_and_clears_history() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        engine.issue_outbound(request(stock.id, 30.0)).unwrap();

        let cleared = engine.reverse_all_outbound();
        assert_eq!(cleared, 1);
        assert_eq!(engine.find_stock(stock.id).unwrap().remaining_length, 100.0);
        assert!(engine.outbound().is_empty());
    }

    #[test]
    fn reverse_all_skips_deleted_stock() {
        let mut engine = engine();
        let kept = engine.create_stock(input("Cotton A", 100.0, 20.0)).unwrap();
        let gone = engine.create_stock(input("Silk B", 50.0, 40.0)).unwrap();
        engine.issue_outbound(request(kept.id, 10.0)).unwrap();
        engine.issue_outbound(request(gone.id, 20.0)).unwrap();
        engine.delete_stock(gone.id).unwrap();

        let cleared = engine.reverse_all_outbound();
        assert_eq!(cleared, 2);
        assert_eq!(engine.find_stock(kept.id).unwrap().remaining_length, 100.0);
        assert!(engine.find_stock(gone.id).is_none());
    }

    #[test]
    fn missing_operator_rejects_without_mutation() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();

        let mut bad = request(stock.id, 10.0);
        bad.operator = String::new();
        let err = engine.issue_outbound(bad).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(engine.outbound().is_empty());
        assert_eq!(engine.find_stock(stock.id).unwrap().remaining_length, 100.0);
    }

    #[test]
    fn issue_against_unknown_stock_is_not_found() {
        let mut engine = engine();
        let err = engine
            .issue_outbound(request(StockId::new(), 5.0))
            .unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[test]
    fn update_preserves_remainder_and_created_at() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        engine.issue_outbound(request(stock.id, 40.0)).unwrap();

        let mut edit = input("Cotton A+", 500.0, 25.0);
        edit.notes = "restocked label".to_string();
        let updated = engine.update_stock(stock.id, edit).unwrap();

        assert_eq!(updated.remaining_length, 60.0);
        assert_eq!(updated.total_length, 500.0);
        assert_eq!(updated.created_at, stock.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[test]
    fn update_unknown_stock_is_not_found() {
        let mut engine = engine();
        let err = engine
            .update_stock(StockId::new(), input("X", 1.0, 1.0))
            .unwrap_err();
        assert_eq!(err, LedgerError::NotFound);
    }

    #[test]
    fn delete_keeps_outbound_history() {
        let mut engine = engine();
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        engine.issue_outbound(request(stock.id, 25.0)).unwrap();

        engine.delete_stock(stock.id).unwrap();
        assert!(engine.stock().is_empty());
        assert_eq!(engine.outbound().len(), 1);
        assert_eq!(engine.outbound()[0].stock_name, "Cotton A");
    }

    #[test]
    fn replace_stock_swaps_the_collection_wholesale() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let mut engine = LedgerEngine::open(store.clone());
        engine.create_stock(input("Old A", 10.0, 5.0)).unwrap();
        engine.create_stock(input("Old B", 20.0, 5.0)).unwrap();

        let replacement = vec![
            StockRecord::create(input("New A", 30.0, 8.0)).unwrap(),
            StockRecord::create(input("New B", 40.0, 9.0)).unwrap(),
            StockRecord::create(input("New C", 50.0, 10.0)).unwrap(),
        ];

        let count = engine.replace_stock(replacement.clone());
        assert_eq!(count, 3);
        assert_eq!(engine.stock(), replacement.as_slice());

        // The replacement is what got persisted, not a merge.
        let reopened = LedgerEngine::open(store);
        assert_eq!(reopened.stock(), replacement.as_slice());
    }

    #[test]
    fn clear_stock_reports_removed_count() {
        let mut engine = engine();
        engine.create_stock(input("A", 10.0, 5.0)).unwrap();
        engine.create_stock(input("B", 20.0, 5.0)).unwrap();
        assert_eq!(engine.clear_stock(), 2);
        assert!(engine.stock().is_empty());
    }

    #[test]
    fn state_survives_reopen_through_the_store() {
        let store = std::sync::Arc::new(InMemoryStore::new());
        let mut engine = LedgerEngine::open(store.clone());
        let stock = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();
        engine.issue_outbound(request(stock.id, 30.0)).unwrap();

        let reopened = LedgerEngine::open(store);
        assert_eq!(reopened.stock().len(), 1);
        assert_eq!(reopened.outbound().len(), 1);
        assert_eq!(
            reopened.find_stock(stock.id).unwrap().remaining_length,
            70.0
        );
    }

    #[test]
    fn save_failure_keeps_memory_authoritative() {
        let mut engine = LedgerEngine::open(BrokenStore);
        let record = engine
            .create_stock(input("Cotton A", 100.0, 20.0))
            .unwrap();

        // The mutation succeeded even though the save did not.
        assert!(engine.dirty());
        assert_eq!(engine.stock().len(), 1);
        assert_eq!(engine.find_stock(record.id).unwrap().name, "Cotton A");

        let err = engine.flush().unwrap_err();
        assert!(matches!(err, LedgerError::Persistence(_)));
    }

    #[test]
    fn flush_clears_the_dirty_flag_on_success() {
        let mut engine = engine();
        engine.create_stock(input("Cotton A", 100.0, 20.0)).unwrap();
        assert!(!engine.dirty());
        engine.flush().unwrap();
        assert!(!engine.dirty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of accepted issues, the remainder
        /// equals the total minus the sum of active draws; a full reversal
        /// restores the original remainder.
        #[test]
        fn conservation_holds_under_issue_and_reverse(
            quantities in prop::collection::vec(0.01f64..50.0, 1..20)
        ) {
            let mut engine = LedgerEngine::open(InMemoryStore::new());
            let stock = engine
                .create_stock(input("Cotton A", 500.0, 20.0))
                .unwrap();

            let mut drawn = 0.0f64;
            for quantity in quantities {
                match engine.issue_outbound(request(stock.id, quantity)) {
                    Ok(_) => drawn += quantity,
                    Err(LedgerError::InsufficientStock { .. }) => {}
                    Err(other) => panic!("unexpected error: {other:?}"),
                }
            }

            let remaining = engine.find_stock(stock.id).unwrap().remaining_length;
            prop_assert!((remaining - (500.0 - drawn)).abs() < 1e-9);
            prop_assert!(remaining >= -1e-9);
            prop_assert!(remaining <= 500.0 + 1e-9);

            engine.reverse_all_outbound();
            let restored = engine.find_stock(stock.id).unwrap().remaining_length;
            prop_assert!((restored - 500.0).abs() < 1e-9);
            prop_assert!(engine.outbound().is_empty());
        }
    }
}
