//! Doctor visits.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{PatientClient, VisitClient};
use crate::domain::PatientVisit;

/// Creates a new Visit actor and its client. The client checks patients through
/// `patients` before recording a visit.
pub fn new(buffer_size: usize, patients: PatientClient) -> (ResourceActor<PatientVisit>, VisitClient) {
    let (actor, generic_client) = ResourceActor::new("visits", buffer_size, sequential_ids("visit"));
    (actor, VisitClient::new(generic_client, patients))
}
