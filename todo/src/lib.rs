//! A persisted to-do list built on the reducer architecture.
//!
//! The list supports creating, toggling and deleting items. Every change is
//! written to a key-value storage as one JSON array, and the list can be
//! restored from it on the next start.
//!
//! - New items go to the head of the list
//! - After a toggle, open items come before done items, each group keeping its order
//! - Blank titles and unknown ids are ignored without touching storage
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use todo_list::{FileStorage, TodoConfig, TodoList};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TodoConfig::default();
//! let storage = Arc::new(FileStorage::open(&config.data_dir)?);
//! let list = TodoList::open(&config, storage);
//!
//! // Create a todo
//! if let Some(item) = list.create("Buy milk", "2 liters").await? {
//!     // Mark it done
//!     list.toggle(item.id).await?;
//! }
//!
//! for todo in list.snapshot().await {
//!     println!("[{}] {}", if todo.done { "x" } else { " " }, todo.title);
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod list;
pub mod reducer;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use config::{demo_seed, ConfigError, StartupPolicy, TodoConfig};
pub use list::TodoList;
pub use reducer::{TodoEnvironment, TodoReducer, DEFAULT_STORAGE_KEY};
pub use storage::FileStorage;
pub use types::{TodoAction, TodoId, TodoItem, TodoState};
pub use todo_runtime::StoreError;
