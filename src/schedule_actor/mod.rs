//! Weekly doctor availability.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{ScheduleClient, UserClient};
use crate::domain::DoctorSchedule;

/// Creates a new Schedule actor and its client.
pub fn new(buffer_size: usize, users: UserClient) -> (ResourceActor<DoctorSchedule>, ScheduleClient) {
    let (actor, generic_client) = ResourceActor::new("schedules", buffer_size, sequential_ids("schedule"));
    (actor, ScheduleClient::new(generic_client, users))
}
