use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use crate::domain::{Page, PatientId, Product, ProductCreate, ProductId, ProductUpdate, SaleId, SaleRecord, SaleRequest, SalesTransaction};
use crate::inventory::{CatalogError, SaleError, SalesReport};
use crate::patient_actor::PatientError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Messages understood by the inventory store. Each variant carries its parameters
/// and a oneshot channel for the response.
#[derive(Debug)]
pub enum InventoryRequest {
    GetProduct {
        id: ProductId,
        respond_to: ServiceResponse<Product, CatalogError>,
    },
    CreateProduct {
        params: ProductCreate,
        respond_to: ServiceResponse<Product, CatalogError>,
    },
    UpdateProduct {
        id: ProductId,
        update: ProductUpdate,
        respond_to: ServiceResponse<Product, CatalogError>,
    },
    DeleteProduct {
        id: ProductId,
        respond_to: ServiceResponse<(), CatalogError>,
    },
    ListProducts {
        respond_to: ServiceResponse<Vec<Product>, CatalogError>,
    },
    ListAvailable {
        respond_to: ServiceResponse<Vec<Product>, CatalogError>,
    },
    ListLowStock {
        threshold: u32,
        respond_to: ServiceResponse<Vec<Product>, CatalogError>,
    },
    EnrollPatient {
        id: PatientId,
        respond_to: ServiceResponse<(), PatientError>,
    },
    WithdrawPatient {
        id: PatientId,
        respond_to: ServiceResponse<bool, PatientError>,
    },
    CommitSale {
        request: SaleRequest,
        respond_to: ServiceResponse<SaleRecord, SaleError>,
    },
    GetSale {
        id: SaleId,
        respond_to: ServiceResponse<Option<SaleRecord>, SaleError>,
    },
    ListSales {
        page: usize,
        per_page: usize,
        respond_to: ServiceResponse<Page<SalesTransaction>, SaleError>,
    },
    GetSalesReport {
        now: DateTime<Utc>,
        low_stock_threshold: u32,
        respond_to: ServiceResponse<SalesReport, SaleError>,
    },
    Shutdown,
}
