//! # Todo Testing
//!
//! Testing utilities and helpers for the todo list store.
//!
//! This crate provides:
//! - Mock implementations of the storage collaborator
//! - [`ReducerTest`], a Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todo_list::{TodoConfig, TodoList};
//! use todo_testing::InMemoryStorage;
//!
//! #[tokio::test]
//! async fn test_create_persists() {
//!     let storage = InMemoryStorage::new();
//!     let list = TodoList::open(&TodoConfig::default(), Arc::new(storage.clone()));
//!
//!     list.create("Buy milk", "").await.unwrap();
//!
//!     assert_eq!(storage.write_count(), 1);
//! }
//! ```

mod reducer_test;

pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of the storage collaborator
pub mod mocks {
    #![allow(clippy::unwrap_used)] // Mutex poisoning in test infrastructure is unrecoverable
    #![allow(clippy::missing_panics_doc)]

    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};
    use todo_core::storage::{KeyValueStorage, StorageError};

    /// A write observed by [`InMemoryStorage`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedWrite {
        /// Key that was written
        pub key: String,
        /// Bytes that were written
        pub value: Vec<u8>,
    }

    /// In-memory storage for fast, deterministic tests
    ///
    /// Keeps every successful write in order, so tests can assert both on
    /// the number of persistence writes and on what each one contained.
    /// Clones share the same data.
    ///
    /// # Example
    ///
    /// ```
    /// use todo_testing::InMemoryStorage;
    /// use todo_core::storage::KeyValueStorage;
    ///
    /// let storage = InMemoryStorage::new();
    /// storage.set("todos", b"[]").unwrap();
    ///
    /// assert_eq!(storage.write_count(), 1);
    /// assert_eq!(storage.get("todos").unwrap(), Some(b"[]".to_vec()));
    /// ```
    #[derive(Clone, Debug, Default)]
    pub struct InMemoryStorage {
        data: Arc<Mutex<HashMap<String, Vec<u8>>>>,
        writes: Arc<Mutex<Vec<RecordedWrite>>>,
        failing: Arc<AtomicBool>,
    }

    impl InMemoryStorage {
        /// Create a new empty in-memory storage
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a storage already holding `value` under `key`
        ///
        /// Seeding does not count as a recorded write.
        #[must_use]
        pub fn with_value(key: &str, value: impl Into<Vec<u8>>) -> Self {
            let storage = Self::new();
            storage
                .data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.into());
            storage
        }

        /// Make subsequent `set` calls fail (or succeed again)
        pub fn set_failing(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        /// Number of successful writes so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.lock().unwrap().len()
        }

        /// All successful writes, oldest first
        #[must_use]
        pub fn writes(&self) -> Vec<RecordedWrite> {
            self.writes.lock().unwrap().clone()
        }

        /// The most recent successful write, if any
        #[must_use]
        pub fn last_write(&self) -> Option<RecordedWrite> {
            self.writes.lock().unwrap().last().cloned()
        }

        /// Current value under `key` decoded as UTF-8
        #[must_use]
        pub fn value_str(&self, key: &str) -> Option<String> {
            self.data
                .lock()
                .unwrap()
                .get(key)
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }
    }

    impl KeyValueStorage for InMemoryStorage {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(StorageError::Unavailable("quota exceeded".to_string()));
            }

            self.data
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            self.writes.lock().unwrap().push(RecordedWrite {
                key: key.to_string(),
                value: value.to_vec(),
            });
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }
    }

    /// Storage whose every operation fails
    ///
    /// Stands in for a backend that is disabled outright.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct FailingStorage;

    impl KeyValueStorage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage disabled".to_string()))
        }
    }
}

// Re-export commonly used items
pub use mocks::{FailingStorage, InMemoryStorage, RecordedWrite};
