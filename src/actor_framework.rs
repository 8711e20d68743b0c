use std::collections::HashMap;
use std::fmt::{self, Debug, Display};
use std::hash::Hash;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Errors produced by the record store itself, independent of any domain.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// Trait that any record kind must implement to be managed by ResourceActor.
///
/// Hooks and actions run inside the actor task, one request at a time, so an
/// action that reads and then mutates a record is atomic with respect to
/// every other request for that record kind.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;
    /// Domain error returned by hooks and actions.
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    fn id(&self) -> &Self::Id;

    /// Construct the full record from the ID and creation parameters
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle a domain-specific conditional write.
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, StoreError<E>>>;

/// Predicate used by `List` to select records inside the actor.
pub type Filter<T> = Box<dyn Fn(&T) -> bool + Send + Sync>;

/// Either a store-level failure or a domain error raised by a hook/action.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError<E> {
    #[error(transparent)]
    Framework(#[from] FrameworkError),
    #[error("{0}")]
    Domain(E),
}

pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        filter: Filter<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<T, T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

impl<T: Entity> Debug for ResourceRequest<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create { params, .. } => f.debug_struct("Create").field("params", params).finish(),
            Self::Get { id, .. } => f.debug_struct("Get").field("id", id).finish(),
            Self::List { .. } => f.debug_struct("List").finish_non_exhaustive(),
            Self::Update { id, patch, .. } => f.debug_struct("Update").field("id", id).field("patch", patch).finish(),
            Self::Delete { id, .. } => f.debug_struct("Delete").field("id", id).finish(),
            Self::Action { id, action, .. } => f.debug_struct("Action").field("id", id).field("action", action).finish(),
        }
    }
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        name: &'static str,
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            name,
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        (actor, ResourceClient::new(sender))
    }

    /// Preload records before the actor starts serving requests.
    pub fn seed(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.store.insert(item.id().clone(), item);
        }
    }

    pub async fn run(mut self) {
        info!(actor = self.name, records = self.store.len(), "Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            self.handle(msg);
        }
        info!(actor = self.name, "Actor stopped");
    }

    fn handle(&mut self, msg: ResourceRequest<T>) {
        match msg {
            ResourceRequest::Create { params, respond_to } => {
                let id = (self.next_id_fn)();
                let result = T::from_create_params(id.clone(), params).and_then(|mut item| {
                    item.on_create()?;
                    Ok(item)
                });
                match result {
                    Ok(item) => {
                        self.store.insert(id, item.clone());
                        let _ = respond_to.send(Ok(item));
                    }
                    Err(e) => {
                        let _ = respond_to.send(Err(StoreError::Domain(e)));
                    }
                }
            }
            ResourceRequest::Get { id, respond_to } => {
                let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
            }
            ResourceRequest::List { filter, respond_to } => {
                let items: Vec<T> = self.store.values().filter(|item| filter(*item)).cloned().collect();
                debug!(actor = self.name, count = items.len(), "Listed records");
                let _ = respond_to.send(Ok(items));
            }
            ResourceRequest::Update { id, patch, respond_to } => {
                let result: Result<_, StoreError<T::Error>> = match self.store.get_mut(&id) {
                    Some(item) => item
                        .on_update(patch)
                        .map(|()| item.clone())
                        .map_err(StoreError::Domain),
                    None => Err(FrameworkError::NotFound(id.to_string()).into()),
                };
                let _ = respond_to.send(result);
            }
            ResourceRequest::Delete { id, respond_to } => {
                let result: Result<_, StoreError<T::Error>> = match self.store.get(&id) {
                    Some(item) => match item.on_delete() {
                        Ok(()) => self
                            .store
                            .remove(&id)
                            .ok_or_else(|| FrameworkError::NotFound(id.to_string()).into()),
                        Err(e) => Err(StoreError::Domain(e)),
                    },
                    None => Err(FrameworkError::NotFound(id.to_string()).into()),
                };
                let _ = respond_to.send(result);
            }
            ResourceRequest::Action { id, action, respond_to } => {
                let result: Result<_, StoreError<T::Error>> = match self.store.get_mut(&id) {
                    Some(item) => item.handle_action(action).map_err(StoreError::Domain),
                    None => Err(FrameworkError::NotFound(id.to_string()).into()),
                };
                let _ = respond_to.send(result);
            }
        }
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn call<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, StoreError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, StoreError<T::Error>> {
        self.call(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, StoreError<T::Error>> {
        self.call(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(
        &self,
        filter: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Result<Vec<T>, StoreError<T::Error>> {
        let filter: Filter<T> = Box::new(filter);
        self.call(|respond_to| ResourceRequest::List { filter, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, StoreError<T::Error>> {
        self.call(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<T, StoreError<T::Error>> {
        self.call(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, StoreError<T::Error>> {
        self.call(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    struct Counter {
        id: String,
        label: String,
        value: u32,
    }

    #[derive(Debug)]
    struct CounterCreate {
        label: String,
    }

    #[derive(Debug)]
    struct CounterPatch {
        label: Option<String>,
    }

    #[derive(Debug)]
    enum CounterAction {
        TakeUpTo(u32),
        Put(u32),
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum CounterError {
        #[error("label must not be empty")]
        EmptyLabel,
        #[error("locked")]
        Locked,
    }

    impl Entity for Counter {
        type Id = String;
        type CreateParams = CounterCreate;
        type Patch = CounterPatch;
        type Action = CounterAction;
        type ActionResult = u32;
        type Error = CounterError;

        fn id(&self) -> &String {
            &self.id
        }

        fn from_create_params(id: String, params: CounterCreate) -> Result<Self, CounterError> {
            if params.label.is_empty() {
                return Err(CounterError::EmptyLabel);
            }
            Ok(Self { id, label: params.label, value: 0 })
        }

        fn on_update(&mut self, patch: CounterPatch) -> Result<(), CounterError> {
            if let Some(label) = patch.label {
                self.label = label;
            }
            Ok(())
        }

        fn on_delete(&self) -> Result<(), CounterError> {
            if self.label == "locked" {
                return Err(CounterError::Locked);
            }
            Ok(())
        }

        fn handle_action(&mut self, action: CounterAction) -> Result<u32, CounterError> {
            match action {
                CounterAction::TakeUpTo(n) => {
                    let taken = n.min(self.value);
                    self.value -= taken;
                    Ok(taken)
                }
                CounterAction::Put(n) => {
                    self.value += n;
                    Ok(self.value)
                }
            }
        }
    }

    fn start() -> ResourceClient<Counter> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("counter_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new("counter", 10, next_id);
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = start();

        let created = client.create(CounterCreate { label: "apples".into() }).await.unwrap();
        assert_eq!(created.id, "counter_1");

        let total = client.perform_action(created.id.clone(), CounterAction::Put(3)).await.unwrap();
        assert_eq!(total, 3);

        // Takes are clamped to what is available
        let taken = client.perform_action(created.id.clone(), CounterAction::TakeUpTo(5)).await.unwrap();
        assert_eq!(taken, 3);
        let stored = client.get(created.id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.value, 0);
    }

    #[tokio::test]
    async fn test_hooks_surface_domain_errors() {
        let client = start();

        let err = client.create(CounterCreate { label: String::new() }).await.unwrap_err();
        assert_eq!(err, StoreError::Domain(CounterError::EmptyLabel));

        let locked = client.create(CounterCreate { label: "locked".into() }).await.unwrap();
        let err = client.delete(locked.id.clone()).await.unwrap_err();
        assert_eq!(err, StoreError::Domain(CounterError::Locked));
        assert!(client.get(locked.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_missing_records_and_listing() {
        let client = start();

        let err = client.update("nope".into(), CounterPatch { label: None }).await.unwrap_err();
        assert_eq!(err, StoreError::Framework(FrameworkError::NotFound("nope".into())));
        let err = client.perform_action("nope".into(), CounterAction::Put(1)).await.unwrap_err();
        assert!(matches!(err, StoreError::Framework(FrameworkError::NotFound(_))));

        client.create(CounterCreate { label: "a".into() }).await.unwrap();
        client.create(CounterCreate { label: "b".into() }).await.unwrap();
        let only_b = client.list(|c: &Counter| c.label == "b").await.unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(client.list(|_: &Counter| true).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_seeded_records_are_served() {
        let (mut actor, client) = ResourceActor::new("counter", 4, || "generated".to_string());
        actor.seed([Counter { id: "fixed".into(), label: "seed".into(), value: 7 }]);
        tokio::spawn(actor.run());

        let seeded = client.get("fixed".into()).await.unwrap().unwrap();
        assert_eq!(seeded.value, 7);
    }

    #[tokio::test]
    async fn test_closed_actor_reports_communication_error() {
        let (actor, client) = ResourceActor::<Counter>::new("counter", 1, || "x".to_string());
        drop(actor);
        let err = client.get("x".into()).await.unwrap_err();
        assert_eq!(err, StoreError::Framework(FrameworkError::ActorClosed));
    }
}
