use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::domain::{PatientId, ProductId};

/// Errors from catalog reads, stock moves and product administration.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock { product_id: ProductId, requested: u32, available: u32 },
    #[error("Product validation error: {0}")]
    ValidationError(String),
    #[error("Product {0} is referenced by recorded sales")]
    InUse(ProductId),
    #[error("Inventory persistence error: {0}")]
    Persistence(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for CatalogError {
    fn from(err: FrameworkError) -> Self {
        CatalogError::ActorCommunicationError(err.to_string())
    }
}

/// Errors from committing or reading sales. Only `PersistenceFailure` is worth retrying.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SaleError {
    #[error("Sale validation error: {0}")]
    ValidationError(String),
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),
    #[error("Insufficient stock for {product_id}: requested {requested}, available {available}")]
    InsufficientStock { product_id: ProductId, requested: u32, available: u32 },
    #[error("Patient not found: {0}")]
    PatientNotFound(PatientId),
    #[error("Sale could not be persisted: {0}")]
    PersistenceFailure(String),
}

impl SaleError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, SaleError::PersistenceFailure(_))
    }
}

impl From<CatalogError> for SaleError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(id) => SaleError::ProductNotFound(id),
            CatalogError::InsufficientStock { product_id, requested, available } => {
                SaleError::InsufficientStock { product_id, requested, available }
            }
            CatalogError::ValidationError(msg) | CatalogError::InUse(msg) => SaleError::ValidationError(msg),
            CatalogError::Persistence(msg) | CatalogError::ActorCommunicationError(msg) => {
                SaleError::PersistenceFailure(msg)
            }
        }
    }
}

impl From<FrameworkError> for SaleError {
    fn from(err: FrameworkError) -> Self {
        SaleError::PersistenceFailure(err.to_string())
    }
}
