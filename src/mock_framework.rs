//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior
//! and answer on the actor's behalf.

use tokio::sync::mpsc;

use crate::actor_framework::{Entity, Filter, ResourceClient, ResourceRequest, Response};

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test owns, so the test plays the actor:
/// it inspects each request and decides the reply, including errors and
/// dropped responders.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Filter<T>, Response<Vec<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Delete request
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{FrameworkError, StoreError};
    use crate::domain::{Role, User};
    use crate::user_actor::UserError;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        // Test Create
        let create_task = tokio::spawn(async move { client.create(()).await });

        let (_, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        let refused = UserError::ReadOnly("accounts are provisioned through the seed file");
        responder.send(Err(StoreError::Domain(refused.clone()))).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Err(StoreError::Domain(refused)));
    }

    #[tokio::test]
    async fn test_mock_list_and_domain_error() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let admin = User::new("Ada", "Root", "admin@example.com").with_role(Role::ADMIN);
        let customer = User::new("Ana", "Paz", "ana@example.com");

        let lister = client.clone();
        let list_task = tokio::spawn(async move { lister.list(|user| user.role.is_admin()).await });
        let (filter, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let matching: Vec<User> = [admin.clone(), customer].into_iter().filter(|u| filter(u)).collect();
        responder.send(Ok(matching)).unwrap();
        assert_eq!(list_task.await.unwrap().unwrap(), vec![admin]);

        let missing = Uuid::new_v4();
        let delete_task = tokio::spawn(async move { client.delete(missing).await });
        let (id, responder) = expect_delete(&mut receiver).await.expect("Expected Delete request");
        assert_eq!(id, missing);
        responder.send(Err(FrameworkError::NotFound(id.to_string()).into())).unwrap();
        let err = delete_task.await.unwrap().unwrap_err();
        assert_eq!(UserError::from(err), UserError::NotFound(missing.to_string()));
    }

    #[tokio::test]
    async fn test_dropped_responder_is_reported() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let get_task = tokio::spawn(async move { client.get(Uuid::new_v4()).await });
        let (_, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        drop(responder);
        let err: StoreError<UserError> = get_task.await.unwrap().unwrap_err();
        assert_eq!(err, StoreError::Framework(FrameworkError::ActorDropped));
    }
}
