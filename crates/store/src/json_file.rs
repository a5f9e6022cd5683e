use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use loomledger_records::{OutboundRecord, StockRecord, StockSnapshot};

use crate::{LedgerStore, StoreError};

const STOCK_FILE: &str = "stock.json";
const OUTBOUND_FILE: &str = "outbound.json";

/// File-backed store: one JSON document per collection under a data
/// directory, written via temp file + rename so a save either lands whole or
/// reports failure.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn stock_path(&self) -> PathBuf {
        self.dir.join(STOCK_FILE)
    }

    fn outbound_path(&self) -> PathBuf {
        self.dir.join(OUTBOUND_FILE)
    }

    fn write_document(&self, path: &Path, json: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Read one collection document; missing or corrupt data yields empty.
    fn read_collection<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Vec<T> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return vec![],
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read collection; starting empty");
                return vec![];
            }
        };
        match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "corrupt collection document; starting empty");
                vec![]
            }
        }
    }
}

impl LedgerStore for JsonFileStore {
    fn load_all(&self) -> (Vec<StockRecord>, Vec<OutboundRecord>) {
        let snapshots: Vec<StockSnapshot> = self.read_collection(&self.stock_path());
        let outbound: Vec<OutboundRecord> = self.read_collection(&self.outbound_path());

        let mut backfilled = 0usize;
        let stock: Vec<StockRecord> = snapshots
            .into_iter()
            .map(|snapshot| {
                let (record, was_backfilled) = snapshot.into_record();
                if was_backfilled {
                    backfilled += 1;
                }
                record
            })
            .collect();

        // Upgrade legacy payloads on disk once, at load time.
        if backfilled > 0 {
            info!(records = backfilled, "backfilled missing remaining length; re-persisting");
            if let Err(err) = self.save_all(&stock, &outbound) {
                warn!(error = %err, "failed to re-persist backfilled records");
            }
        }

        (stock, outbound)
    }

    fn save_all(
        &self,
        stock: &[StockRecord],
        outbound: &[OutboundRecord],
    ) -> Result<(), StoreError> {
        let stock_json = serde_json::to_string_pretty(stock)?;
        let outbound_json = serde_json::to_string_pretty(outbound)?;
        self.write_document(&self.stock_path(), &stock_json)?;
        self.write_document(&self.outbound_path(), &outbound_json)?;
        Ok(())
    }
}
