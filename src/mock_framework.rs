//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] (or [`create_mock_inventory`] for the inventory service)
//! to get a client and a receiver. Then use helpers like [`expect_get`] or
//! [`expect_create`] to assert what the client sent and script the reply.

use tokio::sync::{mpsc, oneshot};
use crate::actor_framework::{ActorEntity, FrameworkError, ResourceClient, ResourceRequest};
use crate::clients::InventoryClient;
use crate::messages::InventoryRequest;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so replies (success, failure,
/// silence) are scripted deterministically without spawning an actor.
pub fn create_mock_client<T: ActorEntity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Same as [`create_mock_client`] for the hand-written inventory service.
pub fn create_mock_inventory(buffer_size: usize) -> (InventoryClient, mpsc::Receiver<InventoryRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (InventoryClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, oneshot::Sender<Result<T::Id, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<Option<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, oneshot::Sender<Result<(), FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<oneshot::Sender<Result<Vec<T>, FrameworkError>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, oneshot::Sender<Result<T::ActionResult, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use crate::clients::PatientClient;
    use crate::domain::{Gender, Patient, PatientCreate};
    use crate::patient_actor::PatientError;

    fn registration() -> PatientCreate {
        PatientCreate {
            full_name: "Jane Smith".to_string(),
            nik: "1234567890123457".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 7, 22).unwrap(),
            gender: Gender::Female,
            address: "Jl. Sudirman No. 456, Jakarta".to_string(),
            phone_number: "081234567891".to_string(),
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Patient>(10);

        let create_task = tokio::spawn(async move { client.create(registration()).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.full_name, "Jane Smith");
        responder.send(Ok("patient_1".to_string())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok("patient_1".to_string()));
    }

    #[tokio::test]
    async fn conflict_reply_maps_to_duplicate_nik() {
        let (inner, mut receiver) = create_mock_client::<Patient>(10);
        let (inventory, mut inventory_rx) = create_mock_inventory(10);
        let client = PatientClient::new(inner, inventory);

        let task = tokio::spawn(async move { client.register_patient(registration()).await });

        let (_, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        responder.send(Err(FrameworkError::Conflict("1234567890123457".into()))).unwrap();

        assert_eq!(task.await.unwrap(), Err(PatientError::DuplicateNik("1234567890123457".into())));
        assert!(inventory_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn registration_is_enrolled_for_sales() {
        let (inner, mut receiver) = create_mock_client::<Patient>(10);
        let (inventory, mut inventory_rx) = create_mock_inventory(10);
        let client = PatientClient::new(inner, inventory);

        let task = tokio::spawn(async move { client.register_patient(registration()).await });

        let (_, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        responder.send(Ok("patient_1".to_string())).unwrap();

        match inventory_rx.recv().await {
            Some(InventoryRequest::EnrollPatient { id, respond_to }) => {
                assert_eq!(id, "patient_1");
                respond_to.send(Ok(())).unwrap();
            }
            other => panic!("Expected EnrollPatient, got {:?}", other),
        }
        assert_eq!(task.await.unwrap(), Ok("patient_1".to_string()));
    }

    #[tokio::test]
    async fn failed_enrollment_removes_the_record() {
        let (inner, mut receiver) = create_mock_client::<Patient>(10);
        let (inventory, inventory_rx) = create_mock_inventory(10);
        drop(inventory_rx);
        let client = PatientClient::new(inner, inventory);

        let task = tokio::spawn(async move { client.register_patient(registration()).await });

        let (_, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        responder.send(Ok("patient_1".to_string())).unwrap();
        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, "patient_1");
        responder.send(Ok(())).unwrap();

        assert!(matches!(task.await.unwrap(), Err(PatientError::ActorCommunicationError(_))));
    }

    #[tokio::test]
    async fn dropped_actor_surfaces_as_communication_error() {
        let (inner, receiver) = create_mock_client::<Patient>(10);
        drop(receiver);
        let (inventory, _inventory_rx) = create_mock_inventory(10);
        let client = PatientClient::new(inner, inventory);

        let err = client.get_patient("patient_1".into()).await.unwrap_err();
        assert!(matches!(err, PatientError::ActorCommunicationError(_)));
    }
}
