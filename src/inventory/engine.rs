//! The sale commit: basket validation, price snapshotting and stock decrements.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};
use crate::domain::{Money, Product, SaleRecord, SaleRequest, SalesTransaction, SalesTransactionItem};
use super::catalog::StockWriter;
use super::ledger::LedgerWriter;
use super::roster::PatientDirectory;
use super::SaleError;

/// Stateless: every commit reads the catalog through the scope it is given.
pub struct TransactionEngine;

impl TransactionEngine {
    /// Validates `request` against `scope` and stages the ledger entry and stock moves.
    ///
    /// Lines are processed in submitted order. Repeated products are checked against the
    /// stock left by the earlier lines. On error the scope may hold partial staged writes;
    /// the caller must discard it.
    #[instrument(
        name = "commit_sale",
        skip(scope, request),
        fields(actor_id = %request.actor_id, lines = request.basket.len())
    )]
    pub fn commit<S>(scope: &mut S, request: &SaleRequest, at: DateTime<Utc>) -> Result<SaleRecord, SaleError>
    where
        S: PatientDirectory + StockWriter + LedgerWriter,
    {
        request.validate().map_err(SaleError::ValidationError)?;

        if let Some(patient_id) = &request.patient_id {
            if !scope.has_patient(patient_id) {
                warn!(%patient_id, "Patient not found");
                return Err(SaleError::PatientNotFound(patient_id.clone()));
            }
        }

        // Every product must resolve before any stock is checked; prices are frozen here.
        let products = request
            .basket
            .iter()
            .map(|line| scope.product(&line.product_id))
            .collect::<Result<Vec<Product>, _>>()?;

        let sale_id = scope.next_sale_id();
        let mut items = Vec::with_capacity(products.len());
        for (line, product) in request.basket.iter().zip(&products) {
            if let Err(err) = scope.decrement_stock(&line.product_id, line.quantity) {
                warn!(product_id = %line.product_id, quantity = line.quantity, error = %err, "Stock check failed");
                return Err(err.into());
            }
            let unit_price = product.selling_price;
            let total_price = line_total(unit_price, line.quantity)?;
            debug!(product_id = %line.product_id, quantity = line.quantity, %unit_price, %total_price, "Line priced");
            items.push(SalesTransactionItem {
                sales_transaction_id: sale_id.clone(),
                product_id: line.product_id.clone(),
                quantity: line.quantity,
                unit_price,
                total_price,
            });
        }

        let total_amount = items.iter().try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(item.total_price)
                .ok_or_else(|| SaleError::ValidationError("Sale total is too large.".to_string()))
        })?;

        let record = SaleRecord {
            transaction: SalesTransaction {
                id: sale_id,
                actor_id: request.actor_id.clone(),
                patient_id: request.patient_id.clone(),
                total_amount,
                transaction_date: at,
            },
            items,
        };
        scope.append(record.clone());
        info!(sale_id = %record.transaction.id, %total_amount, "Sale staged");
        Ok(record)
    }
}

fn line_total(unit_price: Money, quantity: u32) -> Result<Money, SaleError> {
    unit_price
        .checked_mul(Decimal::from(quantity))
        .ok_or_else(|| SaleError::ValidationError("Line total is too large.".to_string()))
}
