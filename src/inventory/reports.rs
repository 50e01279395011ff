//! Sales figures derived from the ledger.

use std::collections::{HashMap, HashSet};
use chrono::{DateTime, Datelike, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::domain::{Money, ProductId};
use super::unit_of_work::InventoryState;

pub const TOP_PRODUCT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesSummary {
    pub today: Money,
    pub this_week: Money,
    pub this_month: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub product_id: ProductId,
    pub name: String,
    pub total_sold: u64,
    pub total_revenue: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub product_count: usize,
    pub low_stock_count: usize,
    pub summary: SalesSummary,
    pub top_products: Vec<TopProduct>,
}

/// Builds the report as of `now`. Weeks start on Monday; all periods are UTC.
pub fn sales_report(state: &InventoryState, now: DateTime<Utc>, low_stock_threshold: u32) -> SalesReport {
    SalesReport {
        product_count: state.catalog.len(),
        low_stock_count: state.catalog.list_low_stock(low_stock_threshold).len(),
        summary: summary(state, now),
        top_products: top_products(state, now, TOP_PRODUCT_LIMIT),
    }
}

fn summary(state: &InventoryState, now: DateTime<Utc>) -> SalesSummary {
    let today = now.date_naive();
    let week_start = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let week_end = week_start + Duration::days(7);

    let mut figures = SalesSummary { today: Decimal::ZERO, this_week: Decimal::ZERO, this_month: Decimal::ZERO };
    for transaction in state.ledger.transactions() {
        let date = transaction.transaction_date.date_naive();
        if date == today {
            figures.today += transaction.total_amount;
        }
        if date >= week_start && date < week_end {
            figures.this_week += transaction.total_amount;
        }
        if same_month(transaction.transaction_date, now) {
            figures.this_month += transaction.total_amount;
        }
    }
    figures
}

/// Best sellers of the current month by quantity, then revenue.
pub fn top_products(state: &InventoryState, now: DateTime<Utc>, limit: usize) -> Vec<TopProduct> {
    let in_month: HashSet<&str> = state
        .ledger
        .transactions()
        .iter()
        .filter(|t| same_month(t.transaction_date, now))
        .map(|t| t.id.as_str())
        .collect();

    let mut totals: HashMap<&str, (u64, Money)> = HashMap::new();
    for item in state.ledger.items() {
        if !in_month.contains(item.sales_transaction_id.as_str()) {
            continue;
        }
        let entry = totals.entry(item.product_id.as_str()).or_insert((0, Decimal::ZERO));
        entry.0 += u64::from(item.quantity);
        entry.1 += item.total_price;
    }

    let mut ranked: Vec<TopProduct> = totals
        .into_iter()
        .map(|(product_id, (total_sold, total_revenue))| TopProduct {
            product_id: product_id.to_string(),
            name: state
                .catalog
                .get(product_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| product_id.to_string()),
            total_sold,
            total_revenue,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.total_sold
            .cmp(&a.total_sold)
            .then_with(|| b.total_revenue.cmp(&a.total_revenue))
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

fn same_month(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.month() == b.month()
}
