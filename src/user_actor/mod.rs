//! Staff accounts managed by a generic resource actor.

pub mod entity;
pub mod error;

pub use error::*;

use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::UserClient;
use crate::domain::User;

/// Creates a new User actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<User>, UserClient) {
    let (actor, generic_client) = ResourceActor::new("users", buffer_size, sequential_ids("user"));
    (actor, UserClient::new(generic_client))
}
