use thiserror::Error;
use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PrescriptionError {
    #[error("Prescription not found: {0}")]
    NotFound(String),
    #[error("Visit not found: {0}")]
    VisitNotFound(String),
    #[error("Product not found: {0}")]
    ProductNotFound(String),
    #[error("Prescription validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for PrescriptionError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => PrescriptionError::NotFound(id),
            FrameworkError::Rejected(msg) => PrescriptionError::ValidationError(msg),
            other => PrescriptionError::ActorCommunicationError(other.to_string()),
        }
    }
}
