//! Transaction scope over the inventory state.
//!
//! A [`UnitOfWork`] reads through to the committed [`InventoryState`] and stages every
//! write. Nothing reaches the state until the scope is turned into a [`Changeset`] and
//! applied; dropping the scope discards the staged writes.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::domain::{Product, ProductId, SaleId, SaleRecord};
use super::catalog::{Catalog, CatalogView, StockWriter};
use super::ledger::{Ledger, LedgerWriter};
use super::roster::{PatientDirectory, PatientRoster};
use super::CatalogError;

/// Everything the inventory store owns: the catalog, the ledger and the patient roster.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryState {
    pub catalog: Catalog,
    pub ledger: Ledger,
    /// Rebuilt from patient registrations on start, like the patient actor itself.
    #[serde(skip)]
    pub patients: PatientRoster,
}

pub struct UnitOfWork<'a> {
    base: &'a InventoryState,
    stock: HashMap<ProductId, u32>,
    records: Vec<SaleRecord>,
}

impl<'a> UnitOfWork<'a> {
    pub fn begin(base: &'a InventoryState) -> Self {
        Self { base, stock: HashMap::new(), records: Vec::new() }
    }

    pub fn into_changeset(self) -> Changeset {
        Changeset { stock: self.stock, records: self.records }
    }
}

impl CatalogView for UnitOfWork<'_> {
    fn product(&self, id: &str) -> Result<Product, CatalogError> {
        let mut product = self.base.catalog.product(id)?;
        if let Some(&staged) = self.stock.get(id) {
            product.stock = staged;
        }
        Ok(product)
    }
}

impl PatientDirectory for UnitOfWork<'_> {
    fn has_patient(&self, id: &str) -> bool {
        self.base.patients.has_patient(id)
    }
}

impl StockWriter for UnitOfWork<'_> {
    fn decrement_stock(&mut self, id: &str, amount: u32) -> Result<(), CatalogError> {
        let current = self.product(id)?.stock;
        if current < amount {
            return Err(CatalogError::InsufficientStock {
                product_id: id.to_string(),
                requested: amount,
                available: current,
            });
        }
        self.stock.insert(id.to_string(), current - amount);
        Ok(())
    }
}

impl LedgerWriter for UnitOfWork<'_> {
    fn next_sale_id(&self) -> SaleId {
        self.base.ledger.sale_id_at(self.records.len())
    }

    fn append(&mut self, record: SaleRecord) {
        self.records.push(record);
    }
}

/// Staged writes of a finished [`UnitOfWork`].
#[derive(Debug, Default)]
pub struct Changeset {
    stock: HashMap<ProductId, u32>,
    records: Vec<SaleRecord>,
}

impl Changeset {
    pub fn is_empty(&self) -> bool {
        self.stock.is_empty() && self.records.is_empty()
    }

    pub fn apply_to(self, state: &mut InventoryState) {
        apply_stock(&mut state.catalog, self.stock);
        apply_records(&mut state.ledger, self.records);
    }
}

fn apply_stock(catalog: &mut Catalog, stock: HashMap<ProductId, u32>) {
    for (id, remaining) in stock {
        catalog.set_stock(&id, remaining);
    }
}

fn apply_records(ledger: &mut Ledger, records: Vec<SaleRecord>) {
    for record in records {
        ledger.append(record);
    }
}
