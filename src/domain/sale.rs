use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::{Money, PatientId, ProductId, SaleId, UserId};

/// One requested line of a basket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketLine {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl BasketLine {
    pub fn new(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self { product_id: product_id.into(), quantity }
    }
}

/// A basket submitted for sale by a staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRequest {
    pub actor_id: UserId,
    pub patient_id: Option<PatientId>,
    pub basket: Vec<BasketLine>,
}

impl SaleRequest {
    pub fn new(actor_id: impl Into<UserId>, patient_id: Option<PatientId>, basket: Vec<BasketLine>) -> Self {
        Self { actor_id: actor_id.into(), patient_id, basket }
    }

    /// Shape checks that need no catalog access.
    pub fn validate(&self) -> Result<(), String> {
        if self.basket.is_empty() {
            return Err("Basket must contain at least one item.".to_string());
        }
        if let Some(line) = self.basket.iter().find(|line| line.quantity < 1) {
            return Err(format!("Quantity for {} must be at least 1.", line.product_id));
        }
        Ok(())
    }
}

/// Ledger header row. Never mutated after commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTransaction {
    pub id: SaleId,
    pub actor_id: UserId,
    pub patient_id: Option<PatientId>,
    pub total_amount: Money,
    pub transaction_date: DateTime<Utc>,
}

/// Ledger line. `unit_price` is the selling price copied at commit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTransactionItem {
    pub sales_transaction_id: SaleId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
}

/// A transaction expanded with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub transaction: SalesTransaction,
    pub items: Vec<SalesTransactionItem>,
}

impl SaleRecord {
    /// True when the header total equals the sum of its lines.
    pub fn is_balanced(&self) -> bool {
        let sum: Money = self.items.iter().map(|item| item.total_price).sum();
        sum == self.transaction.total_amount
    }
}

/// One page of a newest-first listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
}

impl<T> Page<T> {
    /// Slices `items` into page `page` (1-based).
    pub fn paginate(items: Vec<T>, page: usize, per_page: usize) -> Self {
        let total = items.len();
        let page = page.max(1);
        let per_page = per_page.max(1);
        let data = items.into_iter().skip((page - 1) * per_page).take(per_page).collect();
        Self { data, total, page, per_page }
    }

    pub fn last_page(&self) -> usize {
        self.total.div_ceil(self.per_page).max(1)
    }
}
