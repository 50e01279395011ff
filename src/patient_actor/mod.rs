//! Patient registry. `nik` is enforced unique by the actor.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{InventoryClient, PatientClient};
use crate::domain::Patient;

/// Creates a new Patient actor and its client. Registrations are enrolled with `inventory`.
pub fn new(buffer_size: usize, inventory: InventoryClient) -> (ResourceActor<Patient>, PatientClient) {
    let (actor, generic_client) = ResourceActor::new("patients", buffer_size, sequential_ids("patient"));
    (actor, PatientClient::new(generic_client, inventory))
}
