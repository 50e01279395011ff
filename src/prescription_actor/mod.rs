//! Prescriptions written during visits, with redemption tracking.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{InventoryClient, PrescriptionClient, VisitClient};
use crate::domain::Prescription;

/// Creates a new Prescription actor and its client.
pub fn new(
    buffer_size: usize,
    visits: VisitClient,
    inventory: InventoryClient,
) -> (ResourceActor<Prescription>, PrescriptionClient) {
    let (actor, generic_client) =
        ResourceActor::new("prescriptions", buffer_size, sequential_ids("prescription"));
    (actor, PrescriptionClient::new(generic_client, visits, inventory))
}
