//! Key-value storage trait and related types.
//!
//! The store persists its list through a small key-value abstraction modeled
//! on browser local storage: string keys, opaque byte values, synchronous
//! access. Writes replace the previous value for a key wholesale.
//!
//! # Implementations
//!
//! - `FileStorage` (in `todo-list`): one file per key under a directory
//! - `InMemoryStorage` (in `todo-testing`): `HashMap`-backed, records every write
//!
//! # Example
//!
//! ```
//! use todo_core::storage::{KeyValueStorage, StorageError};
//!
//! fn copy_key(
//!     storage: &dyn KeyValueStorage,
//!     from: &str,
//!     to: &str,
//! ) -> Result<bool, StorageError> {
//!     match storage.get(from)? {
//!         Some(bytes) => {
//!             storage.set(to, &bytes)?;
//!             Ok(true)
//!         }
//!         None => Ok(false),
//!     }
//! }
//! ```

use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend cannot be used right now (disabled, full, locked).
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// The key cannot be represented by this backend.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Key-value byte store used for durability across sessions.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so they can be shared by the
/// environment of a Store that is cloned across tasks.
///
/// # Blocking
///
/// Calls are synchronous and may block on I/O. The Store calls `set` while
/// holding its state lock, inside `tokio::task::block_in_place` when running
/// on a multi-thread runtime. Implementations should finish promptly.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written (or was removed).
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be stored.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be modified.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
