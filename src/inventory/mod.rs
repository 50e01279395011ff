//! Product stock and the sales ledger, owned by a single service actor.

mod catalog;
mod engine;
mod error;
mod ledger;
mod reports;
mod roster;
mod snapshot;
mod store;
mod unit_of_work;

pub use catalog::{Catalog, CatalogView, StockWriter};
pub use engine::TransactionEngine;
pub use error::*;
pub use ledger::{Ledger, LedgerWriter};
pub use reports::{sales_report, top_products, SalesReport, SalesSummary, TopProduct, TOP_PRODUCT_LIMIT};
pub use roster::{PatientDirectory, PatientRoster};
pub use snapshot::{SnapshotError, SnapshotStore};
pub use store::{Clock, InventoryService};
pub use unit_of_work::{Changeset, InventoryState, UnitOfWork};

use std::path::PathBuf;
use tracing::info;
use crate::clients::InventoryClient;

/// Creates the inventory service and its client, restoring the snapshot at
/// `snapshot_path` when one exists.
pub fn new(
    buffer_size: usize,
    snapshot_path: Option<PathBuf>,
) -> Result<(InventoryService, InventoryClient), SnapshotError> {
    let snapshot = snapshot_path.map(SnapshotStore::new);
    let state = match &snapshot {
        Some(store) => store.load()?.unwrap_or_default(),
        None => {
            info!("Inventory snapshot disabled; state is kept in memory");
            InventoryState::default()
        }
    };
    Ok(InventoryService::new(buffer_size, state, snapshot))
}
