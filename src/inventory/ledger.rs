//! Append-only history of committed sales.

use serde::{Deserialize, Serialize};
use crate::domain::{SaleId, SaleRecord, SalesTransaction, SalesTransactionItem};

/// Write side of the ledger. There is no update or delete.
pub trait LedgerWriter {
    /// Reserves the id the next appended transaction will carry.
    fn next_sale_id(&self) -> SaleId;
    fn append(&mut self, record: SaleRecord);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    transactions: Vec<SalesTransaction>,
    items: Vec<SalesTransactionItem>,
    next_seq: u64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self { transactions: Vec::new(), items: Vec::new(), next_seq: 1 }
    }
}

impl Ledger {
    pub fn transactions(&self) -> &[SalesTransaction] {
        &self.transactions
    }

    pub fn items(&self) -> &[SalesTransactionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// `sale_N` id for the transaction `offset` positions after the next one.
    pub(crate) fn sale_id_at(&self, offset: usize) -> SaleId {
        format!("sale_{}", self.next_seq + offset as u64)
    }

    /// A transaction expanded with its items.
    pub fn get(&self, id: &str) -> Option<SaleRecord> {
        let transaction = self.transactions.iter().find(|t| t.id == id)?.clone();
        let items = self
            .items
            .iter()
            .filter(|item| item.sales_transaction_id == id)
            .cloned()
            .collect();
        Some(SaleRecord { transaction, items })
    }

    /// Transactions ordered newest first; ties keep the later commit first.
    pub fn newest_first(&self) -> Vec<SalesTransaction> {
        let mut transactions: Vec<SalesTransaction> = self.transactions.iter().rev().cloned().collect();
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        transactions
    }

    pub fn references_product(&self, product_id: &str) -> bool {
        self.items.iter().any(|item| item.product_id == product_id)
    }
}

impl LedgerWriter for Ledger {
    fn next_sale_id(&self) -> SaleId {
        self.sale_id_at(0)
    }

    fn append(&mut self, record: SaleRecord) {
        self.next_seq += 1;
        self.transactions.push(record.transaction);
        self.items.extend(record.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    fn record(id: &str, product_id: &str, hour: u32) -> SaleRecord {
        SaleRecord {
            transaction: SalesTransaction {
                id: id.into(),
                actor_id: "user_3".into(),
                patient_id: None,
                total_amount: Decimal::new(2000, 0),
                transaction_date: Utc.with_ymd_and_hms(2024, 6, 3, hour, 0, 0).unwrap(),
            },
            items: vec![SalesTransactionItem {
                sales_transaction_id: id.into(),
                product_id: product_id.into(),
                quantity: 2,
                unit_price: Decimal::new(1000, 0),
                total_price: Decimal::new(2000, 0),
            }],
        }
    }

    #[test]
    fn append_advances_ids_and_expands_records() {
        let mut ledger = Ledger::default();
        assert_eq!(ledger.next_sale_id(), "sale_1");
        ledger.append(record("sale_1", "product_1", 9));
        assert_eq!(ledger.next_sale_id(), "sale_2");

        let expanded = ledger.get("sale_1").unwrap();
        assert_eq!(expanded.items.len(), 1);
        assert!(expanded.is_balanced());
        assert!(ledger.get("sale_2").is_none());
        assert!(ledger.references_product("product_1"));
        assert!(!ledger.references_product("product_2"));
    }

    #[test]
    fn newest_first_orders_by_date_then_commit_order() {
        let mut ledger = Ledger::default();
        ledger.append(record("sale_1", "product_1", 9));
        ledger.append(record("sale_2", "product_1", 11));
        ledger.append(record("sale_3", "product_1", 11));
        let ids: Vec<String> = ledger.newest_first().into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["sale_3", "sale_2", "sale_1"]);
    }
}
