use thiserror::Error;
use crate::actor_framework::FrameworkError;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ScheduleError {
    #[error("Schedule not found: {0}")]
    NotFound(String),
    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),
    #[error("User {0} is not a doctor")]
    NotADoctor(String),
    #[error("Schedule validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<FrameworkError> for ScheduleError {
    fn from(err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(id) => ScheduleError::NotFound(id),
            FrameworkError::Rejected(msg) => ScheduleError::ValidationError(msg),
            other => ScheduleError::ActorCommunicationError(other.to_string()),
        }
    }
}
