use thiserror::Error;
use crate::access::AccessError;
use crate::inventory::{CatalogError, SaleError, SnapshotError};
use crate::patient_actor::PatientError;
use crate::prescription_actor::PrescriptionError;
use crate::schedule_actor::ScheduleError;
use crate::user_actor::UserError;
use crate::visit_actor::VisitError;

/// Any failure surfaced by [`ClinicSystem`](super::ClinicSystem).
#[derive(Debug, Error)]
pub enum ClinicError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Patient(#[from] PatientError),
    #[error(transparent)]
    Visit(#[from] VisitError),
    #[error(transparent)]
    Prescription(#[from] PrescriptionError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Sale(#[from] SaleError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error("Invalid seed data: {0}")]
    Seed(String),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
