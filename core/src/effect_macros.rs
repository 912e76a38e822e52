//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants, in
//! particular the boxed callbacks of storage operations.

/// Create an `Effect::Storage` with a `Write` operation
///
/// # Example
///
/// ```rust,ignore
/// use todo_core::write_storage;
///
/// write_storage! {
///     storage: env.storage,
///     key: "todos",
///     value: bytes,
///     on_success: || Some(TodoAction::ListPersisted),
///     on_error: |error| Some(TodoAction::PersistFailed { error: error.to_string() })
/// }
/// ```
#[macro_export]
macro_rules! write_storage {
    (
        storage: $storage:expr,
        key: $key:expr,
        value: $value:expr,
        on_success: || $success_body:expr,
        on_error: |$error_param:ident| $error_body:expr
    ) => {
        $crate::effect::Effect::Storage(
            $crate::effect::StorageOperation::Write {
                storage: ::std::sync::Arc::clone(&$storage),
                key: $key.to_string(),
                value: $value,
                on_success: ::std::boxed::Box::new(move |()| $success_body),
                on_error: ::std::boxed::Box::new(move |$error_param| $error_body),
            }
        )
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, StorageOperation};
    use crate::storage::{KeyValueStorage, StorageError};
    use std::sync::Arc;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Saved,
        Failed { error: String },
    }

    struct RejectingStorage;

    impl KeyValueStorage for RejectingStorage {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_write_storage_macro() {
        let storage: Arc<dyn KeyValueStorage> = Arc::new(RejectingStorage);

        let effect: Effect<TestAction> = write_storage! {
            storage: storage,
            key: "todos",
            value: b"[]".to_vec(),
            on_success: || Some(TestAction::Saved),
            on_error: |error| Some(TestAction::Failed { error: error.to_string() })
        };

        let Effect::Storage(StorageOperation::Write {
            storage,
            key,
            value,
            on_success,
            on_error,
        }) = effect
        else {
            unreachable!("write_storage! builds a storage write");
        };

        assert_eq!(key, "todos");
        assert_eq!(on_success(()), Some(TestAction::Saved));

        let error = storage.set(&key, &value).unwrap_err();
        assert_eq!(
            on_error(error),
            Some(TestAction::Failed {
                error: "Storage unavailable: disabled".to_string()
            })
        );
    }
}
