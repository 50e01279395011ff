//! On-disk inventory: a JSON snapshot of the whole state plus an append-only journal
//! of sales committed since that snapshot.
//!
//! A sale costs one journal line. Catalog administration rewrites the snapshot, which
//! also empties the journal.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use crate::domain::SaleRecord;
use super::catalog::StockWriter;
use super::ledger::LedgerWriter;
use super::unit_of_work::InventoryState;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("snapshot encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("journal line {line} cannot be replayed: {reason}")]
    Replay { line: usize, reason: String },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum JournalEntry {
    Sale(SaleRecord),
}

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
    journal: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let journal = sibling(&path, ".journal");
        Self { path, journal }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal
    }

    /// Reads the snapshot and replays the journal over it; `None` if neither exists yet.
    pub fn load(&self) -> Result<Option<InventoryState>, SnapshotError> {
        let snapshot = read_if_exists(&self.path)?;
        let journal = read_if_exists(&self.journal)?;
        if snapshot.is_none() && journal.is_none() {
            debug!(path = %self.path.display(), "No inventory snapshot");
            return Ok(None);
        }

        let mut state: InventoryState = match snapshot {
            Some(bytes) => serde_json::from_slice(&bytes)?,
            None => InventoryState::default(),
        };
        let replayed = match journal {
            Some(bytes) => replay(&mut state, &bytes)?,
            None => 0,
        };
        info!(
            path = %self.path.display(),
            products = state.catalog.len(),
            sales = state.ledger.len(),
            replayed,
            "Inventory snapshot loaded"
        );
        Ok(Some(state))
    }

    /// Writes the whole state through a sibling temp file renamed over the snapshot,
    /// then empties the journal it now contains.
    pub fn save(&self, state: &InventoryState) -> Result<(), SnapshotError> {
        let bytes = serde_json::to_vec_pretty(state)?;
        let tmp = sibling(&self.path, ".tmp");
        fs::write(&tmp, bytes).map_err(|source| io_error(&tmp, source))?;
        fs::rename(&tmp, &self.path).map_err(|source| io_error(&self.path, source))?;

        match fs::remove_file(&self.journal) {
            Ok(()) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            // Replay skips sales the snapshot already holds.
            Err(err) => warn!(path = %self.journal.display(), error = %err, "Journal not cleared"),
        }
        debug!(path = %self.path.display(), "Inventory snapshot written");
        Ok(())
    }

    /// Appends one committed sale and syncs it to disk.
    pub fn append_sale(&self, record: &SaleRecord) -> Result<(), SnapshotError> {
        let mut line = serde_json::to_vec(&JournalEntry::Sale(record.clone()))?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.journal)
            .map_err(|source| io_error(&self.journal, source))?;
        file.write_all(&line).map_err(|source| io_error(&self.journal, source))?;
        file.sync_data().map_err(|source| io_error(&self.journal, source))?;
        debug!(sale_id = %record.transaction.id, "Sale journaled");
        Ok(())
    }
}

/// `path` with `suffix` appended to its full file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, SnapshotError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(io_error(path, source)),
    }
}

fn io_error(path: &Path, source: io::Error) -> SnapshotError {
    SnapshotError::Io { path: path.to_path_buf(), source }
}

/// Applies journaled sales missing from `state`. An unterminated last line is a torn
/// append and is dropped.
fn replay(state: &mut InventoryState, bytes: &[u8]) -> Result<usize, SnapshotError> {
    let mut known: HashSet<String> = state.ledger.transactions().iter().map(|t| t.id.clone()).collect();
    let complete = match bytes.iter().rposition(|&b| b == b'\n') {
        Some(end) => &bytes[..=end],
        None => &[][..],
    };
    if complete.len() < bytes.len() {
        warn!("Dropping torn journal line");
    }

    let mut replayed = 0;
    for (index, line) in complete.split(|&b| b == b'\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let entry: JournalEntry = serde_json::from_slice(line)?;
        let JournalEntry::Sale(record) = entry;
        if !known.insert(record.transaction.id.clone()) {
            continue;
        }
        for item in &record.items {
            state
                .catalog
                .decrement_stock(&item.product_id, item.quantity)
                .map_err(|e| SnapshotError::Replay { line: index + 1, reason: e.to_string() })?;
        }
        state.ledger.append(record);
        replayed += 1;
    }
    Ok(replayed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use crate::domain::{SalesTransaction, SalesTransactionItem};
    use crate::inventory::catalog::tests::product_params;

    fn paracetamol() -> InventoryState {
        let mut state = InventoryState::default();
        state.catalog.insert_new(product_params("Paracetamol", 100, 1000)).unwrap();
        state
    }

    fn sale(id: &str, quantity: u32) -> SaleRecord {
        SaleRecord {
            transaction: SalesTransaction {
                id: id.into(),
                actor_id: "user_3".into(),
                patient_id: None,
                total_amount: Decimal::new(1000 * i64::from(quantity), 0),
                transaction_date: Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap(),
            },
            items: vec![SalesTransactionItem {
                sales_transaction_id: id.into(),
                product_id: "product_1".into(),
                quantity,
                unit_price: Decimal::new(1000, 0),
                total_price: Decimal::new(1000 * i64::from(quantity), 0),
            }],
        }
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn saved_state_loads_back_with_id_counters() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));

        let state = paracetamol();
        store.save(&state).unwrap();

        let mut loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
        let next = loaded.catalog.insert_new(product_params("Aspirin", 60, 1200)).unwrap();
        assert_eq!(next.id, "product_2");
        assert!(!dir.path().join("inventory.json.tmp").exists());
    }

    #[test]
    fn temp_file_never_aliases_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.tmp");
        let store = SnapshotStore::new(path.clone());

        store.save(&paracetamol()).unwrap();
        assert!(path.exists());
        assert!(!dir.path().join("inventory.tmp.tmp").exists());
        assert_eq!(store.load().unwrap().unwrap(), paracetamol());
    }

    #[test]
    fn journaled_sales_replay_over_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));
        store.save(&paracetamol()).unwrap();

        store.append_sale(&sale("sale_1", 5)).unwrap();
        store.append_sale(&sale("sale_2", 3)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.catalog.get("product_1").unwrap().stock, 92);
        assert_eq!(loaded.ledger.len(), 2);
        assert_eq!(loaded.ledger.next_sale_id(), "sale_3");
    }

    #[test]
    fn replay_skips_sales_already_in_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));

        let mut state = paracetamol();
        state.catalog.decrement_stock("product_1", 5).unwrap();
        state.ledger.append(sale("sale_1", 5));
        store.save(&state).unwrap();
        // A journal left behind by a save that could not clear it.
        store.append_sale(&sale("sale_1", 5)).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, state);
    }

    #[test]
    fn torn_last_line_is_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));
        store.save(&paracetamol()).unwrap();
        store.append_sale(&sale("sale_1", 5)).unwrap();

        let mut file = OpenOptions::new().append(true).open(store.journal_path()).unwrap();
        file.write_all(br#"{"kind":"sale","transac"#).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.ledger.len(), 1);
        assert_eq!(loaded.catalog.get("product_1").unwrap().stock, 95);
    }

    #[test]
    fn saving_clears_the_journal() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));
        store.append_sale(&sale("sale_1", 5)).unwrap();
        assert!(store.journal_path().exists());

        store.save(&paracetamol()).unwrap();
        assert!(!store.journal_path().exists());
    }

    #[test]
    fn unwritable_location_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("missing").join("inventory.json"));
        assert!(matches!(store.save(&InventoryState::default()), Err(SnapshotError::Io { .. })));
        assert!(matches!(store.append_sale(&sale("sale_1", 1)), Err(SnapshotError::Io { .. })));
    }

    #[test]
    fn corrupt_file_is_an_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        fs::write(&path, b"{not json").unwrap();
        let err = SnapshotStore::new(path).load().unwrap_err();
        assert!(matches!(err, SnapshotError::Encoding(_)));
    }
}
