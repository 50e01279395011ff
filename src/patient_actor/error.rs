use thiserror::Error;
use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PatientError {
    #[error("Patient not found: {0}")]
    NotFound(String),
    #[error("NIK has already been taken: {0}")]
    DuplicateNik(String),
    #[error("Patient validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for PatientError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => PatientError::NotFound(id),
            FrameworkError::Conflict(nik) => PatientError::DuplicateNik(nik),
            FrameworkError::Rejected(msg) => PatientError::ValidationError(msg),
            other => PatientError::ActorCommunicationError(other.to_string()),
        }
    }
}
