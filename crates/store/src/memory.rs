use std::sync::RwLock;

use loomledger_records::{OutboundRecord, StockRecord};

use crate::{LedgerStore, StoreError};

/// In-memory store.
///
/// Intended for tests/dev. Holds plain clones of the collections; the legacy
/// backfill path only applies to serialized payloads and is covered by
/// [`crate::JsonFileStore`].
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<(Vec<StockRecord>, Vec<OutboundRecord>)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing collections.
    pub fn seeded(stock: Vec<StockRecord>, outbound: Vec<OutboundRecord>) -> Self {
        Self {
            inner: RwLock::new((stock, outbound)),
        }
    }
}

impl LedgerStore for InMemoryStore {
    fn load_all(&self) -> (Vec<StockRecord>, Vec<OutboundRecord>) {
        match self.inner.read() {
            Ok(guard) => guard.clone(),
            Err(_) => (vec![], vec![]),
        }
    }

    fn save_all(
        &self,
        stock: &[StockRecord],
        outbound: &[OutboundRecord],
    ) -> Result<(), StoreError> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| StoreError::Io("lock poisoned".to_string()))?;
        *guard = (stock.to_vec(), outbound.to_vec());
        Ok(())
    }
}
