//! Configuration for the to-do list.
//!
//! [`TodoConfig`] is passed explicitly to [`crate::TodoList::open`]. The demo
//! binary builds one from environment variables with [`TodoConfig::from_env`].

use crate::codec;
use crate::types::{TodoId, TodoItem};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use todo_core::storage::KeyValueStorage;

use crate::reducer::DEFAULT_STORAGE_KEY;

/// Default directory used by the demo binary's file storage
pub const DEFAULT_DATA_DIR: &str = "./.todo-data";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Unknown startup policy name
    #[error("Unknown startup policy: {0:?} (expected seed, load-or-seed or load-or-empty)")]
    UnknownStartupPolicy(String),
}

/// Where the initial list comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartupPolicy {
    /// Always start from the demo items, ignoring anything persisted
    Seed,
    /// Use the persisted list if there is a valid one, else the demo items
    #[default]
    LoadOrSeed,
    /// Use the persisted list if there is a valid one, else start empty
    LoadOrEmpty,
}

impl StartupPolicy {
    /// Returns the configuration name of the policy
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seed => "seed",
            Self::LoadOrSeed => "load-or-seed",
            Self::LoadOrEmpty => "load-or-empty",
        }
    }

    /// Chooses the initial items
    ///
    /// A present and well-formed persisted list always wins over the
    /// fallback, even when it is empty. Read failures and malformed data
    /// count as "nothing persisted". Never writes to `storage`.
    #[must_use]
    pub fn initial_items(self, storage: &dyn KeyValueStorage, key: &str) -> Vec<TodoItem> {
        let fallback: fn() -> Vec<TodoItem> = match self {
            Self::Seed => return demo_seed(),
            Self::LoadOrSeed => demo_seed,
            Self::LoadOrEmpty => Vec::new,
        };

        load_persisted(storage, key).unwrap_or_else(fallback)
    }
}

impl FromStr for StartupPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "seed" => Ok(Self::Seed),
            "load-or-seed" => Ok(Self::LoadOrSeed),
            "load-or-empty" => Ok(Self::LoadOrEmpty),
            other => Err(ConfigError::UnknownStartupPolicy(other.to_string())),
        }
    }
}

impl std::fmt::Display for StartupPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two demo items a fresh list starts with
#[must_use]
pub fn demo_seed() -> Vec<TodoItem> {
    vec![
        TodoItem::new(TodoId::new(1), "Finish homework", "Complete math assignment"),
        TodoItem::new(TodoId::new(2), "Go for a run", "Jog in the park for 30 minutes"),
    ]
}

/// Reads the persisted list, `None` if there is no usable one
fn load_persisted(storage: &dyn KeyValueStorage, key: &str) -> Option<Vec<TodoItem>> {
    let bytes = match storage.get(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            tracing::debug!(key, "No persisted todo list");
            return None;
        }
        Err(error) => {
            tracing::warn!(key, error = %error, "Could not read persisted todo list");
            return None;
        }
    };

    match codec::decode(&bytes) {
        Ok(items) => {
            tracing::info!(key, count = items.len(), "Loaded persisted todo list");
            Some(items)
        }
        Err(error) => {
            tracing::warn!(key, error = %error, "Ignoring malformed persisted todo list");
            None
        }
    }
}

/// To-do list configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Key the list is persisted under
    pub storage_key: String,
    /// Where the initial list comes from
    pub startup: StartupPolicy,
    /// Directory for file-backed storage (demo binary only)
    pub data_dir: PathBuf,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            startup: StartupPolicy::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl TodoConfig {
    /// Creates the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the storage key
    #[must_use]
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Sets the startup policy
    #[must_use]
    pub const fn with_startup(mut self, startup: StartupPolicy) -> Self {
        self.startup = startup;
        self
    }

    /// Sets the data directory
    #[must_use]
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// - `TODO_STORAGE_KEY` (default `todos`)
    /// - `TODO_STARTUP`: `seed`, `load-or-seed` or `load-or-empty` (default `load-or-seed`)
    /// - `TODO_DATA_DIR` (default `./.todo-data`)
    ///
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            storage_key: env::var("TODO_STORAGE_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            startup: env::var("TODO_STARTUP")
                .ok()
                .and_then(|s| {
                    s.parse::<StartupPolicy>()
                        .map_err(|error| {
                            tracing::warn!(error = %error, "Using default startup policy");
                        })
                        .ok()
                })
                .unwrap_or_default(),
            data_dir: env::var("TODO_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_testing::{FailingStorage, InMemoryStorage};

    const PERSISTED: &str =
        r#"[{"id":5,"title":"Persisted","description":"","done":true}]"#;

    #[test]
    fn parses_policy_names() {
        assert_eq!("seed".parse(), Ok(StartupPolicy::Seed));
        assert_eq!("Load-Or-Seed".parse(), Ok(StartupPolicy::LoadOrSeed));
        assert_eq!(" load-or-empty ".parse(), Ok(StartupPolicy::LoadOrEmpty));
        assert_eq!(
            "restore".parse::<StartupPolicy>(),
            Err(ConfigError::UnknownStartupPolicy("restore".to_string()))
        );
        assert_eq!(StartupPolicy::LoadOrEmpty.to_string(), "load-or-empty");
    }

    #[test]
    fn default_config() {
        let config = TodoConfig::default();
        assert_eq!(config.storage_key, "todos");
        assert_eq!(config.startup, StartupPolicy::LoadOrSeed);
        assert_eq!(config.data_dir, PathBuf::from("./.todo-data"));
    }

    #[test]
    fn builder_overrides() {
        let config = TodoConfig::new()
            .with_storage_key("work")
            .with_startup(StartupPolicy::Seed)
            .with_data_dir("/tmp/todo");

        assert_eq!(config.storage_key, "work");
        assert_eq!(config.startup, StartupPolicy::Seed);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/todo"));
    }

    #[test]
    fn demo_seed_items() {
        let seed = demo_seed();
        assert_eq!(seed.len(), 2);
        assert_eq!(seed[0].id, TodoId::new(1));
        assert_eq!(seed[0].title, "Finish homework");
        assert_eq!(seed[1].description, "Jog in the park for 30 minutes");
        assert!(seed.iter().all(|t| !t.done));
    }

    #[test]
    fn seed_ignores_persisted_list() {
        let storage = InMemoryStorage::with_value("todos", PERSISTED);
        assert_eq!(StartupPolicy::Seed.initial_items(&storage, "todos"), demo_seed());
    }

    #[test]
    fn load_prefers_persisted_list() {
        let storage = InMemoryStorage::with_value("todos", PERSISTED);

        for policy in [StartupPolicy::LoadOrSeed, StartupPolicy::LoadOrEmpty] {
            let items = policy.initial_items(&storage, "todos");
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].title, "Persisted");
            assert!(items[0].done);
        }
        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn empty_persisted_list_is_kept() {
        let storage = InMemoryStorage::with_value("todos", "[]");
        assert!(StartupPolicy::LoadOrSeed.initial_items(&storage, "todos").is_empty());
    }

    #[test]
    fn missing_or_malformed_falls_back() {
        let missing = InMemoryStorage::new();
        assert_eq!(StartupPolicy::LoadOrSeed.initial_items(&missing, "todos"), demo_seed());
        assert!(StartupPolicy::LoadOrEmpty.initial_items(&missing, "todos").is_empty());

        let malformed = InMemoryStorage::with_value("todos", "{not json");
        assert_eq!(StartupPolicy::LoadOrSeed.initial_items(&malformed, "todos"), demo_seed());
        assert!(StartupPolicy::LoadOrEmpty.initial_items(&malformed, "todos").is_empty());
    }

    #[test]
    fn unreadable_storage_falls_back() {
        assert_eq!(
            StartupPolicy::LoadOrSeed.initial_items(&FailingStorage, "todos"),
            demo_seed()
        );
    }

    #[test]
    fn reads_only_the_configured_key() {
        let storage = InMemoryStorage::with_value("other", PERSISTED);
        assert!(StartupPolicy::LoadOrEmpty.initial_items(&storage, "todos").is_empty());
    }
}
