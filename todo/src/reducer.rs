//! Reducer logic for the to-do list.
//!
//! Commands are validated, turned into events, and events are applied to
//! state. Every event that changes the list is followed by one storage write
//! carrying the full encoded list. A command that fails validation (blank
//! title, unknown id) changes nothing and writes nothing.

use crate::codec;
use crate::types::{TodoAction, TodoId, TodoItem, TodoState};
use std::sync::Arc;
use todo_core::{
    effect::Effect, reducer::Reducer, smallvec, storage::KeyValueStorage, write_storage, SmallVec,
};

/// Default key the list is persisted under
pub const DEFAULT_STORAGE_KEY: &str = "todos";

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Where the list is persisted
    pub storage: Arc<dyn KeyValueStorage>,
    /// Key the list is persisted under
    pub storage_key: String,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(storage: Arc<dyn KeyValueStorage>, storage_key: impl Into<String>) -> Self {
        Self {
            storage,
            storage_key: storage_key.into(),
        }
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment")
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

/// Reducer for the to-do list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a `CreateTodo` command
    fn validate_create_todo(title: &str) -> Result<(), String> {
        if title.trim().is_empty() {
            return Err("Todo title cannot be empty".to_string());
        }

        Ok(())
    }

    /// Validates that an id is left for a new todo
    fn validate_next_id(state: &TodoState) -> Result<TodoId, String> {
        match state.next_id {
            Some(id) if !state.exists(id) => Ok(id),
            _ => Err("No todo id left to allocate".to_string()),
        }
    }

    /// Validates a command addressing an existing todo
    fn validate_exists(state: &TodoState, id: TodoId) -> Result<(), String> {
        if !state.exists(id) {
            return Err(format!("Todo with ID {id} not found"));
        }

        Ok(())
    }

    /// Handles `CreateTodo` and `SubmitPending`
    fn create(
        state: &mut TodoState,
        title: String,
        description: String,
        env: &TodoEnvironment,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        state.last_created = None;

        if let Err(reason) = Self::validate_create_todo(&title) {
            tracing::debug!(%reason, "Ignoring create");
            return SmallVec::new();
        }

        let id = match Self::validate_next_id(state) {
            Ok(id) => id,
            Err(reason) => {
                tracing::warn!(%reason, "Ignoring create");
                return SmallVec::new();
            }
        };

        let event = TodoAction::TodoCreated {
            item: TodoItem::new(id, title, description),
        };
        if !Self::apply_event(state, &event) {
            return SmallVec::new();
        }
        let effects = Self::persist(state, env);

        state.pending_title.clear();
        state.pending_description.clear();
        state.last_created = Some(id);

        effects
    }

    /// Applies an event to state
    ///
    /// Returns `true` if the list changed.
    fn apply_event(state: &mut TodoState, event: &TodoAction) -> bool {
        match event {
            TodoAction::TodoCreated { item } => {
                if state.exists(item.id) {
                    tracing::debug!(id = %item.id, "Ignoring create for existing id");
                    return false;
                }
                state.reserve_id(item.id);
                state.items.insert(0, item.clone());
                true
            }
            TodoAction::TodoToggled { id, done } => {
                let Some(item) = state.items.iter_mut().find(|t| t.id == *id) else {
                    return false;
                };
                item.done = *done;
                state.partition_done();
                true
            }
            TodoAction::TodoDeleted { id } => {
                let before = state.items.len();
                state.items.retain(|t| t.id != *id);
                state.items.len() != before
            }
            TodoAction::ListPersisted => {
                state.last_error = None;
                false
            }
            TodoAction::PersistFailed { error } => {
                state.last_error = Some(error.clone());
                false
            }
            // Commands are not applied to state
            TodoAction::CreateTodo { .. }
            | TodoAction::SubmitPending
            | TodoAction::EditPendingTitle { .. }
            | TodoAction::EditPendingDescription { .. }
            | TodoAction::ToggleTodo { .. }
            | TodoAction::DeleteTodo { .. } => false,
        }
    }

    /// Applies an event and, if the list changed, persists it
    fn apply_and_persist(
        state: &mut TodoState,
        event: &TodoAction,
        env: &TodoEnvironment,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        if Self::apply_event(state, event) {
            Self::persist(state, env)
        } else {
            SmallVec::new()
        }
    }

    /// Builds the storage write for the current list
    fn persist(state: &mut TodoState, env: &TodoEnvironment) -> SmallVec<[Effect<TodoAction>; 4]> {
        match codec::encode(&state.items) {
            Ok(bytes) => smallvec![write_storage! {
                storage: env.storage,
                key: env.storage_key,
                value: bytes,
                on_success: || Some(TodoAction::ListPersisted),
                on_error: |error| Some(TodoAction::PersistFailed { error: error.to_string() })
            }],
            Err(error) => {
                tracing::warn!(error = %error, "Could not encode todo list, skipping write");
                state.last_error = Some(error.to_string());
                SmallVec::new()
            }
        }
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(
            command = action.is_command(),
            event = action.is_event(),
            "Reducing todo action"
        );

        match action {
            // ========== Commands ==========
            TodoAction::CreateTodo { title, description } => {
                Self::create(state, title, description, env)
            }

            TodoAction::SubmitPending => {
                let title = state.pending_title.clone();
                let description = state.pending_description.clone();
                Self::create(state, title, description, env)
            }

            TodoAction::EditPendingTitle { title } => {
                state.pending_title = title;
                SmallVec::new()
            }

            TodoAction::EditPendingDescription { description } => {
                state.pending_description = description;
                SmallVec::new()
            }

            TodoAction::ToggleTodo { id } => {
                if let Err(reason) = Self::validate_exists(state, id) {
                    tracing::debug!(%reason, "Ignoring toggle");
                    return SmallVec::new();
                }

                let done = state.get(id).is_some_and(|t| !t.done);
                Self::apply_and_persist(state, &TodoAction::TodoToggled { id, done }, env)
            }

            TodoAction::DeleteTodo { id } => {
                if let Err(reason) = Self::validate_exists(state, id) {
                    tracing::debug!(%reason, "Ignoring delete");
                    return SmallVec::new();
                }

                Self::apply_and_persist(state, &TodoAction::TodoDeleted { id }, env)
            }

            // ========== Events and feedback ==========
            TodoAction::TodoCreated { .. }
            | TodoAction::TodoToggled { .. }
            | TodoAction::TodoDeleted { .. }
            | TodoAction::ListPersisted
            | TodoAction::PersistFailed { .. } => Self::apply_and_persist(state, &action, env),
        }
    }
}
