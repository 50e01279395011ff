use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::{debug, instrument};
use crate::domain::{Page, Product, ProductCreate, ProductUpdate, SaleRecord, SaleRequest, SalesTransaction};
use crate::inventory::{CatalogError, SaleError, SalesReport};
use crate::messages::InventoryRequest;
use crate::patient_actor::PatientError;

/// Client for the inventory service.
#[derive(Clone)]
pub struct InventoryClient {
    sender: mpsc::Sender<InventoryRequest>,
}

impl InventoryClient {
    pub fn new(sender: mpsc::Sender<InventoryRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), CatalogError> {
        debug!("Sending shutdown request");
        self.sender
            .send(InventoryRequest::Shutdown)
            .await
            .map_err(|e| CatalogError::ActorCommunicationError(e.to_string()))
    }
}

client_method!(InventoryClient => fn get_product(id: String) -> Product as InventoryRequest::GetProduct, Error = CatalogError);
client_method!(InventoryClient => fn create_product(params: ProductCreate) -> Product as InventoryRequest::CreateProduct, Error = CatalogError);
client_method!(InventoryClient => fn update_product(id: String, update: ProductUpdate) -> Product as InventoryRequest::UpdateProduct, Error = CatalogError);
client_method!(InventoryClient => fn delete_product(id: String) -> () as InventoryRequest::DeleteProduct, Error = CatalogError);
client_method!(InventoryClient => fn list_products() -> Vec<Product> as InventoryRequest::ListProducts, Error = CatalogError);
client_method!(InventoryClient => fn list_available() -> Vec<Product> as InventoryRequest::ListAvailable, Error = CatalogError);
client_method!(InventoryClient => fn list_low_stock(threshold: u32) -> Vec<Product> as InventoryRequest::ListLowStock, Error = CatalogError);
client_method!(InventoryClient => fn enroll_patient(id: String) -> () as InventoryRequest::EnrollPatient, Error = PatientError);
client_method!(InventoryClient => fn withdraw_patient(id: String) -> bool as InventoryRequest::WithdrawPatient, Error = PatientError);
client_method!(InventoryClient => fn commit_sale(request: SaleRequest) -> SaleRecord as InventoryRequest::CommitSale, Error = SaleError);
client_method!(InventoryClient => fn get_sale(id: String) -> Option<SaleRecord> as InventoryRequest::GetSale, Error = SaleError);
client_method!(InventoryClient => fn list_sales(page: usize, per_page: usize) -> Page<SalesTransaction> as InventoryRequest::ListSales, Error = SaleError);
client_method!(InventoryClient => fn sales_report(now: DateTime<Utc>, low_stock_threshold: u32) -> SalesReport as InventoryRequest::GetSalesReport, Error = SaleError);
