//! The to-do list facade.
//!
//! [`TodoList`] wraps a [`Store`] running the [`TodoReducer`] and exposes the
//! list operations as plain async methods. Handles are cheap to clone and
//! share the same list.

use crate::config::TodoConfig;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use todo_core::storage::KeyValueStorage;
use todo_runtime::{Store, StoreError};
use tokio::sync::{broadcast, watch};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// A persisted to-do list
#[derive(Clone)]
pub struct TodoList {
    store: TodoStore,
}

impl TodoList {
    /// Opens a list persisted in `storage`
    ///
    /// Initial items are chosen by `config.startup`. Opening never writes.
    #[must_use]
    pub fn open(config: &TodoConfig, storage: Arc<dyn KeyValueStorage>) -> Self {
        let items = config
            .startup
            .initial_items(storage.as_ref(), &config.storage_key);
        tracing::info!(
            startup = %config.startup,
            key = %config.storage_key,
            count = items.len(),
            "Opening todo list"
        );

        Self::with_state(
            TodoState::with_items(items),
            TodoEnvironment::new(storage, config.storage_key.clone()),
        )
    }

    /// Creates a list from an explicit state, bypassing the startup policy
    #[must_use]
    pub fn with_state(state: TodoState, env: TodoEnvironment) -> Self {
        Self {
            store: Store::new(state, TodoReducer::new(), env),
        }
    }

    /// Creates a todo at the head of the list
    ///
    /// Returns `None` without changing anything if `title` is blank.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TodoList::shutdown`].
    pub async fn create(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Option<TodoItem>, StoreError> {
        self.create_with(TodoAction::CreateTodo {
            title: title.into(),
            description: description.into(),
        })
        .await
    }

    /// Creates a todo from the pending title and description
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TodoList::shutdown`].
    pub async fn submit(&self) -> Result<Option<TodoItem>, StoreError> {
        self.create_with(TodoAction::SubmitPending).await
    }

    async fn create_with(&self, action: TodoAction) -> Result<Option<TodoItem>, StoreError> {
        self.store
            .send_and_read(action, |state| {
                state
                    .last_created
                    .and_then(|id| state.get(id))
                    .cloned()
            })
            .await
    }

    /// Replaces the pending title
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TodoList::shutdown`].
    pub async fn edit_title(&self, title: impl Into<String>) -> Result<(), StoreError> {
        self.store
            .send(TodoAction::EditPendingTitle {
                title: title.into(),
            })
            .await
    }

    /// Replaces the pending description
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TodoList::shutdown`].
    pub async fn edit_description(&self, description: impl Into<String>) -> Result<(), StoreError> {
        self.store
            .send(TodoAction::EditPendingDescription {
                description: description.into(),
            })
            .await
    }

    /// Flips a todo between open and done; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TodoList::shutdown`].
    pub async fn toggle(&self, id: TodoId) -> Result<(), StoreError> {
        self.store.send(TodoAction::ToggleTodo { id }).await
    }

    /// Deletes a todo; unknown ids are ignored
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ShutdownInProgress`] after [`TodoList::shutdown`].
    pub async fn delete(&self, id: TodoId) -> Result<(), StoreError> {
        self.store.send(TodoAction::DeleteTodo { id }).await
    }

    /// Copy of the items in display order
    pub async fn snapshot(&self) -> Vec<TodoItem> {
        self.store.state(|s| s.items.clone()).await
    }

    /// Copy of the full state, pending fields included
    pub async fn state(&self) -> TodoState {
        self.store.state(Clone::clone).await
    }

    /// Receiver that sees the state after every processed operation
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<TodoState> {
        self.store.subscribe_state()
    }

    /// Receiver for persistence outcomes (`ListPersisted` / `PersistFailed`)
    #[must_use]
    pub fn subscribe_actions(&self) -> broadcast::Receiver<TodoAction> {
        self.store.subscribe_actions()
    }

    /// Stops accepting operations
    pub fn shutdown(&self) {
        tracing::info!("Shutting down todo list");
        self.store.shutdown();
    }
}

impl std::fmt::Debug for TodoList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoList").finish_non_exhaustive()
    }
}
