use std::collections::HashMap;
use std::hash::Hash;
use std::fmt::{Debug, Display};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any domain entity must implement to be managed by [`ResourceActor`].
pub trait ActorEntity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type UpdateParams: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full entity from the ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, String>;

    /// Key that must be unique across all stored entities of this type.
    fn unique_key(&self) -> Option<String> { None }

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), String> { Ok(()) }
    fn on_update(&mut self, params: Self::UpdateParams) -> Result<(), String>;
    fn on_delete(&self) -> Result<(), String> { Ok(()) }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, String>;
}

/// Errors raised by the generic actor plumbing.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Unique key already taken: {0}")]
    Conflict(String),
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Update {
        id: T::Id,
        params: T::UpdateParams,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: ActorEntity> {
    name: &'static str,
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: ActorEntity> ResourceActor<T> {
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

    #[instrument(name = "resource_actor", skip(self), fields(resource = self.name))]
    pub async fn run(mut self) {
        info!("Actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let _ = respond_to.send(Ok(self.store.get(&id).cloned()));
                }
                ResourceRequest::Update { id, params, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, params));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let _ = respond_to.send(self.handle_delete(id));
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.values().cloned().collect()));
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let _ = respond_to.send(self.handle_action(id, action));
                }
            }
        }
        info!("Actor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Rejected)?;
        item.on_create().map_err(FrameworkError::Rejected)?;
        self.check_unique(&item)?;
        self.store.insert(id.clone(), item);
        debug!(id = %id, "Item created");
        Ok(id)
    }

    fn handle_update(&mut self, id: T::Id, params: T::UpdateParams) -> Result<T, FrameworkError> {
        let mut working = self
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        working.on_update(params).map_err(FrameworkError::Rejected)?;
        self.check_unique(&working)?;
        self.store.insert(id, working.clone());
        Ok(working)
    }

    fn handle_delete(&mut self, id: T::Id) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(&id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete().map_err(FrameworkError::Rejected)?;
        self.store.remove(&id);
        Ok(())
    }

    fn handle_action(&mut self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        let mut working = self
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        let result = working.handle_action(action).map_err(FrameworkError::Rejected)?;
        self.store.insert(id, working);
        Ok(result)
    }

    /// Rejects `item` if another stored entity holds the same unique key.
    fn check_unique(&self, item: &T) -> Result<(), FrameworkError> {
        let Some(key) = item.unique_key() else {
            return Ok(());
        };
        let taken = self
            .store
            .values()
            .any(|other| other.id() != item.id() && other.unique_key().as_deref() == Some(key.as_str()));
        if taken {
            warn!(key = %key, "Unique key conflict");
            return Err(FrameworkError::Conflict(key));
        }
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, params: T::UpdateParams) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update { id, params, respond_to }).await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

/// Builds the `prefix_N` id generator used by every resource actor.
pub fn sequential_ids(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    let counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        format!("{}_{}", prefix, id)
    }
}

/// Orders ids from [`sequential_ids`] by creation: `badge_9` before `badge_10`.
/// Ids without a numeric suffix fall back to plain string order, after numbered ones.
pub fn id_order(a: &str, b: &str) -> std::cmp::Ordering {
    fn sequence(id: &str) -> Option<u64> {
        id.rsplit_once('_').and_then(|(_, n)| n.parse().ok())
    }

    match (sequence(a), sequence(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Badge {
        id: String,
        code: String,
        holder: String,
        active: bool,
    }

    #[derive(Debug)]
    struct BadgeCreate {
        code: String,
        holder: String,
    }

    #[derive(Debug)]
    struct BadgeUpdate {
        code: Option<String>,
    }

    #[derive(Debug)]
    enum BadgeAction {
        Deactivate,
        Reassign(String),
    }

    impl ActorEntity for Badge {
        type Id = String;
        type CreateParams = BadgeCreate;
        type UpdateParams = BadgeUpdate;
        type Action = BadgeAction;
        type ActionResult = bool;

        fn id(&self) -> &String { &self.id }

        fn from_create_params(id: String, params: BadgeCreate) -> Result<Self, String> {
            if params.code.is_empty() {
                return Err("code required".to_string());
            }
            Ok(Self { id, code: params.code, holder: params.holder, active: true })
        }

        fn unique_key(&self) -> Option<String> {
            Some(self.code.clone())
        }

        fn on_update(&mut self, params: BadgeUpdate) -> Result<(), String> {
            if let Some(code) = params.code {
                self.code = code;
            }
            Ok(())
        }

        fn handle_action(&mut self, action: BadgeAction) -> Result<bool, String> {
            match action {
                BadgeAction::Deactivate => {
                    if !self.active {
                        return Ok(false);
                    }
                    self.active = false;
                    Ok(true)
                }
                BadgeAction::Reassign(holder) => {
                    // Mutates before failing so the test can check the copy was discarded.
                    self.holder = holder;
                    if !self.active {
                        return Err("badge inactive".to_string());
                    }
                    Ok(true)
                }
            }
        }
    }

    fn spawn_badges() -> ResourceClient<Badge> {
        let (actor, client) = ResourceActor::new("badge", 10, sequential_ids("badge"));
        tokio::spawn(actor.run());
        client
    }

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_badges();

        let id = client
            .create(BadgeCreate { code: "A1".into(), holder: "Alice".into() })
            .await
            .unwrap();
        assert_eq!(id, "badge_1");

        let changed = client.perform_action(id.clone(), BadgeAction::Deactivate).await.unwrap();
        assert!(changed);
        let changed_again = client.perform_action(id.clone(), BadgeAction::Deactivate).await.unwrap();
        assert!(!changed_again);

        let badge = client.get(id).await.unwrap().unwrap();
        assert!(!badge.active);
    }

    #[tokio::test]
    async fn test_failed_action_leaves_entity_untouched() {
        let client = spawn_badges();
        let id = client
            .create(BadgeCreate { code: "A1".into(), holder: "Alice".into() })
            .await
            .unwrap();
        client.perform_action(id.clone(), BadgeAction::Deactivate).await.unwrap();

        let result = client.perform_action(id.clone(), BadgeAction::Reassign("Bob".into())).await;
        assert_eq!(result, Err(FrameworkError::Rejected("badge inactive".into())));

        let badge = client.get(id).await.unwrap().unwrap();
        assert_eq!(badge.holder, "Alice");
    }

    #[tokio::test]
    async fn test_unique_key_enforced_on_create_and_update() {
        let client = spawn_badges();
        client.create(BadgeCreate { code: "A1".into(), holder: "Alice".into() }).await.unwrap();
        let second = client.create(BadgeCreate { code: "B2".into(), holder: "Bob".into() }).await.unwrap();

        let dup = client.create(BadgeCreate { code: "A1".into(), holder: "Carol".into() }).await;
        assert_eq!(dup, Err(FrameworkError::Conflict("A1".into())));

        let clash = client.update(second.clone(), BadgeUpdate { code: Some("A1".into()) }).await;
        assert_eq!(clash, Err(FrameworkError::Conflict("A1".into())));

        // Keeping its own key is not a conflict.
        let same = client.update(second, BadgeUpdate { code: Some("B2".into()) }).await.unwrap();
        assert_eq!(same.code, "B2");
        assert_eq!(client.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_items_and_rejections() {
        let client = spawn_badges();
        assert_eq!(client.get("badge_9".into()).await.unwrap(), None);
        assert_eq!(
            client.delete("badge_9".into()).await,
            Err(FrameworkError::NotFound("badge_9".into()))
        );
        let rejected = client.create(BadgeCreate { code: String::new(), holder: "X".into() }).await;
        assert_eq!(rejected, Err(FrameworkError::Rejected("code required".into())));
    }

    #[test]
    fn ids_order_by_sequence_not_text() {
        let next = sequential_ids("badge");
        let mut ids: Vec<String> = (0..12).map(|_| next()).collect();
        ids.reverse();
        ids.sort_by(|a, b| id_order(a, b));
        assert_eq!(ids[8], "badge_9");
        assert_eq!(ids[9], "badge_10");
        assert_eq!(id_order("badge_2", "legacy"), std::cmp::Ordering::Less);
    }
}
