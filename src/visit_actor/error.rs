use thiserror::Error;
use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum VisitError {
    #[error("Visit not found: {0}")]
    NotFound(String),
    #[error("Patient not found: {0}")]
    PatientNotFound(String),
    #[error("Visit validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for VisitError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => VisitError::NotFound(id),
            FrameworkError::Rejected(msg) => VisitError::ValidationError(msg),
            other => VisitError::ActorCommunicationError(other.to_string()),
        }
    }
}
