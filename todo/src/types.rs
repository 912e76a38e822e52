//! Domain types for the to-do list.
//!
//! A to-do list is an ordered collection of items that can be created,
//! toggled between open and done, and deleted. The newest item comes first,
//! and after any toggle every open item precedes every done item.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unique identifier for a todo item
///
/// Serialized as a bare JSON number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(u64);

impl TodoId {
    /// The first id handed out by an empty list
    pub const FIRST: Self = Self(1);

    /// Creates a `TodoId` from its numeric value
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the numeric value
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns the id following this one, `None` past `u64::MAX`
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(raw) => Some(Self(raw)),
            None => None,
        }
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single todo item
///
/// This is also the persisted record: `{"id", "title", "description", "done"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Title, non-empty after trimming
    pub title: String,
    /// Free text, may be empty
    pub description: String,
    /// Whether the todo is done
    pub done: bool,
}

impl TodoItem {
    /// Creates a new open todo item
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            done: false,
        }
    }
}

/// State of the to-do list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TodoState {
    /// All todos in display order
    pub items: Vec<TodoItem>,
    /// Title typed for the next creation
    pub pending_title: String,
    /// Description typed for the next creation
    pub pending_description: String,
    /// Id the next created item receives; greater than every id in `items`.
    /// `None` once an item holds `u64::MAX` and no id is left.
    pub next_id: Option<TodoId>,
    /// Item produced by the most recent create command, if it succeeded
    pub last_created: Option<TodoId>,
    /// Last persistence failure (if any)
    pub last_error: Option<String>,
}

impl Default for TodoState {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoState {
    /// Creates a new empty todo state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            pending_title: String::new(),
            pending_description: String::new(),
            next_id: Some(TodoId::FIRST),
            last_created: None,
            last_error: None,
        }
    }

    /// Creates a state holding `items` in the given order
    ///
    /// Items repeating an earlier id are dropped. `next_id` starts after the
    /// largest id kept.
    #[must_use]
    pub fn with_items(items: Vec<TodoItem>) -> Self {
        let mut seen = HashSet::new();
        let items: Vec<TodoItem> = items.into_iter().filter(|item| seen.insert(item.id)).collect();
        let next_id = match items.iter().map(|item| item.id).max() {
            Some(max) => max.next(),
            None => Some(TodoId::FIRST),
        };

        Self {
            items,
            next_id,
            ..Self::new()
        }
    }

    /// Advances `next_id` past `id`
    pub fn reserve_id(&mut self, id: TodoId) {
        self.next_id = match (self.next_id, id.next()) {
            (Some(current), Some(after)) => Some(current.max(after)),
            _ => None,
        };
    }

    /// Returns the number of todos
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Returns the number of done todos
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.items.iter().filter(|t| t.done).count()
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.items.iter().find(|t| t.id == id)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn exists(&self, id: TodoId) -> bool {
        self.get(id).is_some()
    }

    /// Returns `true` when no done item precedes an open one
    #[must_use]
    pub fn is_partitioned(&self) -> bool {
        self.items
            .iter()
            .skip_while(|t| !t.done)
            .all(|t| t.done)
    }

    /// Moves done items after open ones, keeping relative order in each group
    pub fn partition_done(&mut self) {
        let (mut open, done): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.items).into_iter().partition(|t| !t.done);
        open.extend(done);
        self.items = open;
    }
}

/// Actions representing commands and events for the to-do list
///
/// Commands express intent and are validated by the reducer; accepted
/// commands are turned into events, which are what actually change the list.
/// Feedback actions report the outcome of a persistence write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Create a new todo at the head of the list
    CreateTodo {
        /// Title of the todo
        title: String,
        /// Description of the todo
        description: String,
    },

    /// Command: Create a todo from the pending input fields
    SubmitPending,

    /// Command: Replace the pending title
    EditPendingTitle {
        /// New pending title
        title: String,
    },

    /// Command: Replace the pending description
    EditPendingDescription {
        /// New pending description
        description: String,
    },

    /// Command: Flip a todo between open and done
    ToggleTodo {
        /// Todo to toggle
        id: TodoId,
    },

    /// Command: Delete a todo
    DeleteTodo {
        /// Todo to delete
        id: TodoId,
    },

    // ========== Events ==========
    /// Event: Todo was created
    TodoCreated {
        /// The new item
        item: TodoItem,
    },

    /// Event: Todo's done flag was set
    TodoToggled {
        /// Todo identifier
        id: TodoId,
        /// New value of the done flag
        done: bool,
    },

    /// Event: Todo was deleted
    TodoDeleted {
        /// Todo identifier
        id: TodoId,
    },

    // ========== Feedback ==========
    /// The list was written to storage
    ListPersisted,

    /// Writing the list to storage failed
    PersistFailed {
        /// Error message
        error: String,
    },
}

impl TodoAction {
    /// Returns `true` for commands
    #[must_use]
    pub const fn is_command(&self) -> bool {
        matches!(
            self,
            Self::CreateTodo { .. }
                | Self::SubmitPending
                | Self::EditPendingTitle { .. }
                | Self::EditPendingDescription { .. }
                | Self::ToggleTodo { .. }
                | Self::DeleteTodo { .. }
        )
    }

    /// Returns `true` for events that change the list
    #[must_use]
    pub const fn is_event(&self) -> bool {
        matches!(
            self,
            Self::TodoCreated { .. } | Self::TodoToggled { .. } | Self::TodoDeleted { .. }
        )
    }
}
