use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};
use crate::clients::InventoryClient;
use crate::domain::{Page, Product, ProductCreate, ProductUpdate, SaleRecord, SaleRequest, SalesTransaction};
use crate::messages::{InventoryRequest, ServiceResponse};
use super::catalog::CatalogView;
use super::engine::TransactionEngine;
use super::reports::sales_report;
use super::snapshot::SnapshotStore;
use super::unit_of_work::{InventoryState, UnitOfWork};
use super::{CatalogError, SaleError};

pub type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Owner of the catalog and the ledger.
///
/// Requests are handled one at a time, so every sale commit runs alone against the
/// latest committed state. With a snapshot configured, a change only becomes visible
/// after it has been written to disk.
pub struct InventoryService {
    receiver: mpsc::Receiver<InventoryRequest>,
    state: InventoryState,
    snapshot: Option<SnapshotStore>,
    clock: Clock,
}

impl InventoryService {
    pub fn new(
        buffer_size: usize,
        state: InventoryState,
        snapshot: Option<SnapshotStore>,
    ) -> (Self, InventoryClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            state,
            snapshot,
            clock: Box::new(Utc::now),
        };
        (service, InventoryClient::new(sender))
    }

    /// Replaces the source of commit timestamps.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    #[instrument(name = "inventory_service", skip(self))]
    pub async fn run(mut self) {
        info!(
            products = self.state.catalog.len(),
            sales = self.state.ledger.len(),
            "InventoryService starting"
        );

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                InventoryRequest::GetProduct { id, respond_to } => {
                    self.handle_get_product(id, respond_to);
                }
                InventoryRequest::CreateProduct { params, respond_to } => {
                    self.handle_create_product(params, respond_to);
                }
                InventoryRequest::UpdateProduct { id, update, respond_to } => {
                    self.handle_update_product(id, update, respond_to);
                }
                InventoryRequest::DeleteProduct { id, respond_to } => {
                    self.handle_delete_product(id, respond_to);
                }
                InventoryRequest::ListProducts { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.catalog.list_all()));
                }
                InventoryRequest::ListAvailable { respond_to } => {
                    let _ = respond_to.send(Ok(self.state.catalog.list_available()));
                }
                InventoryRequest::ListLowStock { threshold, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.catalog.list_low_stock(threshold)));
                }
                InventoryRequest::EnrollPatient { id, respond_to } => {
                    if self.state.patients.enroll(id.clone()) {
                        debug!(patient_id = %id, "Patient enrolled");
                    }
                    let _ = respond_to.send(Ok(()));
                }
                InventoryRequest::WithdrawPatient { id, respond_to } => {
                    let withdrawn = self.state.patients.withdraw(&id);
                    debug!(patient_id = %id, withdrawn, "Patient withdrawn");
                    let _ = respond_to.send(Ok(withdrawn));
                }
                InventoryRequest::CommitSale { request, respond_to } => {
                    self.handle_commit_sale(request, respond_to);
                }
                InventoryRequest::GetSale { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.state.ledger.get(&id)));
                }
                InventoryRequest::ListSales { page, per_page, respond_to } => {
                    self.handle_list_sales(page, per_page, respond_to);
                }
                InventoryRequest::GetSalesReport { now, low_stock_threshold, respond_to } => {
                    let _ = respond_to.send(Ok(sales_report(&self.state, now, low_stock_threshold)));
                }
                InventoryRequest::Shutdown => {
                    info!("InventoryService shutting down");
                    break;
                }
            }
        }

        info!("InventoryService stopped");
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_get_product(&self, id: String, respond_to: ServiceResponse<Product, CatalogError>) {
        debug!("Processing get_product request");
        let _ = respond_to.send(self.state.catalog.product(&id));
    }

    #[instrument(fields(product_name = %params.name), skip(self, params, respond_to))]
    fn handle_create_product(&mut self, params: ProductCreate, respond_to: ServiceResponse<Product, CatalogError>) {
        debug!("Processing create_product request");

        let result = self.apply(|state| state.catalog.insert_new(params), CatalogError::Persistence);
        match &result {
            Ok(product) => info!(product_id = %product.id, stock = product.stock, "Product created"),
            Err(e) => warn!(error = %e, "Product rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, update, respond_to))]
    fn handle_update_product(
        &mut self,
        id: String,
        update: ProductUpdate,
        respond_to: ServiceResponse<Product, CatalogError>,
    ) {
        debug!("Processing update_product request");

        let result = self.apply(
            |state| {
                let updated = state
                    .catalog
                    .product(&id)?
                    .updated(update)
                    .map_err(CatalogError::ValidationError)?;
                state.catalog.replace(updated.clone());
                Ok(updated)
            },
            CatalogError::Persistence,
        );
        match &result {
            Ok(product) => info!(selling_price = %product.selling_price, "Product updated"),
            Err(e) => warn!(error = %e, "Product update rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(product_id = %id), skip(self, respond_to))]
    fn handle_delete_product(&mut self, id: String, respond_to: ServiceResponse<(), CatalogError>) {
        debug!("Processing delete_product request");

        let result = self.apply(
            |state| {
                if state.ledger.references_product(&id) {
                    return Err(CatalogError::InUse(id.clone()));
                }
                state
                    .catalog
                    .remove(&id)
                    .map(|_| ())
                    .ok_or_else(|| CatalogError::NotFound(id.clone()))
            },
            CatalogError::Persistence,
        );
        match &result {
            Ok(()) => info!("Product deleted"),
            Err(e) => warn!(error = %e, "Product delete rejected"),
        }

        let _ = respond_to.send(result);
    }

    #[instrument(fields(actor_id = %request.actor_id), skip(self, request, respond_to))]
    fn handle_commit_sale(&mut self, request: SaleRequest, respond_to: ServiceResponse<SaleRecord, SaleError>) {
        debug!("Processing commit_sale request");

        let at = (self.clock)();
        let result = self.commit(&request, at);
        match &result {
            Ok(record) => info!(
                sale_id = %record.transaction.id,
                total_amount = %record.transaction.total_amount,
                "Sale committed"
            ),
            Err(e) => warn!(error = %e, "Sale rejected"),
        }

        if respond_to.send(result).is_err() {
            debug!("Caller went away before the sale result was delivered");
        }
    }

    #[instrument(skip(self, respond_to))]
    fn handle_list_sales(
        &self,
        page: usize,
        per_page: usize,
        respond_to: ServiceResponse<Page<SalesTransaction>, SaleError>,
    ) {
        debug!("Processing list_sales request");
        let listing = Page::paginate(self.state.ledger.newest_first(), page, per_page);
        let _ = respond_to.send(Ok(listing));
    }

    /// Stages the sale against the live state and publishes it once journaled.
    fn commit(&mut self, request: &SaleRequest, at: DateTime<Utc>) -> Result<SaleRecord, SaleError> {
        let (record, changeset) = {
            let mut scope = UnitOfWork::begin(&self.state);
            let record = TransactionEngine::commit(&mut scope, request, at)?;
            (record, scope.into_changeset())
        };
        if let Some(snapshot) = &self.snapshot {
            if let Err(e) = snapshot.append_sale(&record) {
                error!(error = %e, path = %snapshot.journal_path().display(), "Failed to journal sale");
                return Err(SaleError::PersistenceFailure(e.to_string()));
            }
        }
        changeset.apply_to(&mut self.state);
        Ok(record)
    }

    /// Runs a catalog change against the state. With a snapshot, the change runs on a
    /// copy that replaces the live state only once it is on disk.
    fn apply<R, E>(
        &mut self,
        change: impl FnOnce(&mut InventoryState) -> Result<R, E>,
        persistence_error: impl FnOnce(String) -> E,
    ) -> Result<R, E> {
        let Some(snapshot) = &self.snapshot else {
            return change(&mut self.state);
        };

        let mut next = self.state.clone();
        let result = change(&mut next)?;
        if let Err(e) = snapshot.save(&next) {
            error!(error = %e, path = %snapshot.path().display(), "Failed to persist inventory");
            return Err(persistence_error(e.to_string()));
        }
        self.state = next;
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use crate::domain::BasketLine;
    use crate::inventory::catalog::tests::product_params;

    fn fixed_clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 10, 30, 0).unwrap()
    }

    fn spawn(state: InventoryState, snapshot: Option<SnapshotStore>) -> InventoryClient {
        let (service, client) = InventoryService::new(16, state, snapshot);
        tokio::spawn(service.with_clock(fixed_clock).run());
        client
    }

    fn seeded() -> InventoryState {
        let mut state = InventoryState::default();
        state.catalog.insert_new(product_params("Paracetamol", 100, 1000)).unwrap();
        state.catalog.insert_new(product_params("Amoxicillin", 10, 2500)).unwrap();
        state
    }

    fn sale(product_id: &str, quantity: u32) -> SaleRequest {
        SaleRequest::new("user_3", None, vec![BasketLine::new(product_id, quantity)])
    }

    #[tokio::test]
    async fn concurrent_commits_never_oversell() {
        let client = spawn(seeded(), None);

        let attempts: Vec<_> = (0..8)
            .map(|_| {
                let client = client.clone();
                tokio::spawn(async move { client.commit_sale(sale("product_2", 3)).await })
            })
            .collect();

        let mut committed = 0;
        for attempt in attempts {
            match attempt.await.unwrap() {
                Ok(_) => committed += 1,
                Err(SaleError::InsufficientStock { available, .. }) => assert!(available < 3),
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(committed, 3);
        assert_eq!(client.get_product("product_2".into()).await.unwrap().stock, 1);
        let sales = client.list_sales(1, 10).await.unwrap();
        assert_eq!(sales.total, 3);
    }

    #[tokio::test]
    async fn recorded_prices_survive_later_repricing() {
        let client = spawn(seeded(), None);
        let record = client.commit_sale(sale("product_1", 2)).await.unwrap();
        assert_eq!(record.transaction.transaction_date, fixed_clock());

        let update = ProductUpdate { selling_price: Some(Decimal::new(1500, 0)), ..Default::default() };
        client.update_product("product_1".into(), update).await.unwrap();

        let stored = client.get_sale(record.transaction.id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.items[0].unit_price, Decimal::new(1000, 0));
        assert_eq!(stored.transaction.total_amount, Decimal::new(2000, 0));

        let next = client.commit_sale(sale("product_1", 2)).await.unwrap();
        assert_eq!(next.transaction.total_amount, Decimal::new(3000, 0));
    }

    #[tokio::test]
    async fn sold_products_cannot_be_deleted() {
        let client = spawn(seeded(), None);
        client.commit_sale(sale("product_1", 1)).await.unwrap();

        assert_eq!(
            client.delete_product("product_1".into()).await,
            Err(CatalogError::InUse("product_1".into()))
        );
        client.delete_product("product_2".into()).await.unwrap();
        assert_eq!(
            client.get_product("product_2".into()).await,
            Err(CatalogError::NotFound("product_2".into()))
        );
    }

    #[tokio::test]
    async fn failed_snapshot_write_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let unwritable = SnapshotStore::new(dir.path().join("missing").join("inventory.json"));
        let client = spawn(seeded(), Some(unwritable));

        let err = client.commit_sale(sale("product_1", 5)).await.unwrap_err();
        assert!(matches!(err, SaleError::PersistenceFailure(_)));
        assert!(err.is_retryable());

        assert_eq!(client.get_product("product_1".into()).await.unwrap().stock, 100);
        assert_eq!(client.list_sales(1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn committed_sales_reach_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));
        store.save(&seeded()).unwrap();
        let client = spawn(seeded(), Some(store.clone()));

        client.commit_sale(sale("product_1", 5)).await.unwrap();

        let on_disk = store.load().unwrap().unwrap();
        assert_eq!(on_disk.catalog.get("product_1").unwrap().stock, 95);
        assert_eq!(on_disk.ledger.len(), 1);
    }

    #[tokio::test]
    async fn sales_append_to_the_journal_without_rewriting_the_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("inventory.json"));
        let client = spawn(InventoryState::default(), Some(store.clone()));
        client.create_product(product_params("Paracetamol", 100, 1000)).await.unwrap();
        let written = std::fs::read(store.path()).unwrap();

        for _ in 0..3 {
            client.commit_sale(sale("product_1", 2)).await.unwrap();
        }
        assert_eq!(std::fs::read(store.path()).unwrap(), written);
        let journal = std::fs::read_to_string(store.journal_path()).unwrap();
        assert_eq!(journal.lines().count(), 3);

        // Catalog changes fold the journal into the snapshot.
        client.create_product(product_params("Aspirin", 60, 1200)).await.unwrap();
        assert!(!store.journal_path().exists());
        let on_disk = store.load().unwrap().unwrap();
        assert_eq!(on_disk.catalog.get("product_1").unwrap().stock, 94);
        assert_eq!(on_disk.ledger.len(), 3);
    }

    #[tokio::test]
    async fn withdrawn_patients_cannot_be_sold_to() {
        let client = spawn(seeded(), None);
        let for_patient = || SaleRequest::new("user_3", Some("patient_1".into()), vec![BasketLine::new("product_1", 1)]);

        assert_eq!(client.commit_sale(for_patient()).await, Err(SaleError::PatientNotFound("patient_1".into())));

        client.enroll_patient("patient_1".into()).await.unwrap();
        client.commit_sale(for_patient()).await.unwrap();

        assert_eq!(client.withdraw_patient("patient_1".into()).await, Ok(true));
        assert_eq!(client.withdraw_patient("patient_1".into()).await, Ok(false));
        assert_eq!(client.commit_sale(for_patient()).await, Err(SaleError::PatientNotFound("patient_1".into())));

        assert_eq!(client.get_product("product_1".into()).await.unwrap().stock, 99);
        assert_eq!(client.list_sales(1, 10).await.unwrap().total, 1);
    }

    #[tokio::test]
    async fn sales_list_newest_first_in_pages() {
        let client = spawn(seeded(), None);
        for _ in 0..3 {
            client.commit_sale(sale("product_1", 1)).await.unwrap();
        }

        let first = client.list_sales(1, 2).await.unwrap();
        let ids: Vec<String> = first.data.iter().map(|t| t.id.clone()).collect();
        assert_eq!(ids, vec!["sale_3", "sale_2"]);
        assert_eq!(first.last_page(), 2);

        let second = client.list_sales(2, 2).await.unwrap();
        assert_eq!(second.data.len(), 1);
        assert_eq!(second.data[0].id, "sale_1");
    }
}
