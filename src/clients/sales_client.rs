use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};
use crate::clients::InventoryClient;
use crate::domain::{Page, SaleRecord, SaleRequest, SalesTransaction};
use crate::inventory::{SaleError, SalesReport};

/// Sale orchestration. The request shape is checked here; patient, product and stock
/// checks run inside the inventory service's commit.
#[derive(Clone)]
pub struct SalesClient {
    inventory: InventoryClient,
}

impl SalesClient {
    pub fn new(inventory: InventoryClient) -> Self {
        Self { inventory }
    }

    #[instrument(skip(self, request), fields(actor_id = %request.actor_id, lines = request.basket.len()))]
    pub async fn record_sale(&self, request: SaleRequest) -> Result<SaleRecord, SaleError> {
        info!("Processing record_sale request (Client Side)");

        // Step 1: Shape of the basket
        request.validate().map_err(SaleError::ValidationError)?;

        // Step 2: Atomic commit against live stock and the patient roster
        self.inventory.commit_sale(request).await
    }

    /// Retries `record_sale` on `PersistenceFailure` only, at most `max_attempts` times.
    /// Each attempt is a fresh commit that re-reads stock and prices.
    #[instrument(skip(self, request), fields(actor_id = %request.actor_id))]
    pub async fn record_sale_with_retry(
        &self,
        request: SaleRequest,
        max_attempts: u32,
    ) -> Result<SaleRecord, SaleError> {
        let max_attempts = max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.record_sale(request.clone()).await {
                Err(e) if e.is_retryable() && attempt < max_attempts => {
                    warn!(attempt, error = %e, "Sale commit failed, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get_sale(&self, id: String) -> Result<Option<SaleRecord>, SaleError> {
        self.inventory.get_sale(id).await
    }

    #[instrument(skip(self))]
    pub async fn list_sales(&self, page: usize, per_page: usize) -> Result<Page<SalesTransaction>, SaleError> {
        self.inventory.list_sales(page, per_page).await
    }

    #[instrument(skip(self))]
    pub async fn sales_report(&self, now: DateTime<Utc>, low_stock_threshold: u32) -> Result<SalesReport, SaleError> {
        self.inventory.sales_report(now, low_stock_threshold).await
    }
}
