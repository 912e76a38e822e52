//! # Todo Runtime
//!
//! Runtime implementation for the todo list store.
//!
//! This crate provides the Store runtime that coordinates reducer execution
//! and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: The runtime that manages state and executes effects
//! - **Effect Executor**: Performs storage writes and feeds outcome actions back to the reducer
//! - **Observers**: Action broadcast and state snapshots for the render layer
//!
//! ## Example
//!
//! ```ignore
//! use todo_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use std::sync::Arc;
use todo_core::{effect::Effect, reducer::Reducer};
use tokio::sync::RwLock;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after `shutdown()`.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }
}

pub use error::StoreError;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// Configuration for Store instances
///
/// # Example
///
/// ```
/// use todo_runtime::StoreConfig;
///
/// let config = StoreConfig::default().with_broadcast_capacity(64);
/// assert_eq!(config.broadcast_capacity, 64);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Number of feedback actions buffered for slow action observers
    pub broadcast_capacity: usize,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub const fn new(broadcast_capacity: usize) -> Self {
        Self { broadcast_capacity }
    }

    /// Set the action broadcast capacity
    #[must_use]
    pub const fn with_broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            broadcast_capacity: 16,
        }
    }
}

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{
        Arc, AtomicBool, Effect, Ordering, Reducer, RwLock, StoreConfig, StoreError, VecDeque,
    };
    use todo_core::effect::StorageOperation;
    use tokio::sync::{broadcast, watch};
    use tokio::runtime::{Handle, RuntimeFlavor};

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock`, so actions are processed one at a time)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution (with feedback loop)
    /// 5. Observers (action broadcast, state snapshots)
    ///
    /// Storage effects run inside the same critical section as the reducer
    /// call that produced them. A write therefore always reflects the state
    /// produced by its action, and writes land in the order actions were sent.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        state: Arc<RwLock<S>>,
        reducer: R,
        environment: E,
        shutdown: Arc<AtomicBool>,
        /// Action broadcast channel for observing actions produced by effects.
        action_broadcast: broadcast::Sender<A>,
        /// Latest state, republished after every processed action.
        snapshots: Arc<watch::Sender<S>>,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + Clone + 'static,
        S: Clone + Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Uses [`StoreConfig::default`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new Store with custom configuration
        #[must_use]
        pub fn with_config(
            initial_state: S,
            reducer: R,
            environment: E,
            config: StoreConfig,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(config.broadcast_capacity.max(1));
            let (snapshots, _) = watch::channel(initial_state.clone());

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer,
                environment,
                shutdown: Arc::new(AtomicBool::new(false)),
                action_broadcast,
                snapshots: Arc::new(snapshots),
            }
        }

        /// Stop accepting actions
        ///
        /// Effects run inline, so there is never outstanding work to drain:
        /// once this returns, no further storage writes will be issued.
        pub fn shutdown(&self) {
            tracing::info!("Store shutting down");
            metrics::counter!("store.shutdown.initiated").increment(1);
            self.shutdown.store(true, Ordering::Release);
        }

        /// Returns `true` once [`Store::shutdown`] has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Executes returned effects; any action an effect produces is
        ///    broadcast to observers and reduced before the lock is released
        /// 4. Publishes the resulting state snapshot
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        ///
        /// # Panics
        ///
        /// If the reducer panics, the panic will propagate.
        /// Reducers should be pure functions that do not panic.
        pub async fn send(&self, action: A) -> Result<(), StoreError> {
            self.send_and_read(action, |_| ()).await
        }

        /// Send an action and read the resulting state before any other action runs
        ///
        /// `read` is called while the write lock is still held, so it observes
        /// exactly the state produced by `action` and its feedback actions.
        ///
        /// ```ignore
        /// let created = store
        ///     .send_and_read(TodoAction::SubmitPending, |s| s.last_created)
        ///     .await?;
        /// ```
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action, read), name = "store_send")]
        pub async fn send_and_read<F, T>(&self, action: A, read: F) -> Result<T, StoreError>
        where
            F: FnOnce(&S) -> T,
        {
            if self.is_shutting_down() {
                tracing::warn!("Rejected action: store is shutting down");
                metrics::counter!("store.shutdown.rejected_actions").increment(1);
                return Err(StoreError::ShutdownInProgress);
            }

            tracing::debug!("Processing action");
            metrics::counter!("store.commands.total").increment(1);

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let mut pending = VecDeque::from([action]);
            while let Some(action) = pending.pop_front() {
                let start = std::time::Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!("store.reducer.duration_seconds")
                    .record(start.elapsed().as_secs_f64());

                tracing::trace!("Reducer completed, returned {} effects", effects.len());

                for effect in effects {
                    if let Some(feedback) = self.execute_effect(effect) {
                        // Broadcast to observers (render layer, logging)
                        let _ = self.action_broadcast.send(feedback.clone());
                        pending.push_back(feedback);
                    }
                }
            }

            self.snapshots.send_replace((*state).clone());
            tracing::debug!("Action processing completed");

            Ok(read(&*state))
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.items.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Subscribe to state snapshots
        ///
        /// The receiver holds the latest state and is marked changed after
        /// every processed action, which is what a render layer re-renders from.
        #[must_use]
        pub fn subscribe_state(&self) -> watch::Receiver<S> {
            self.snapshots.subscribe()
        }

        /// Subscribe to all actions produced by effects
        ///
        /// Only feedback actions are broadcast (for example the outcome of a
        /// storage write), not the actions passed to [`Store::send`].
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<A> {
            self.action_broadcast.subscribe()
        }

        /// Execute an effect, returning the action it produced, if any
        ///
        /// # Error Handling Strategy
        ///
        /// Storage failures are not errors of the Store. They are handed to
        /// the operation's `on_error` callback, whose action is fed back into
        /// the reducer like any other. State already changed by the reducer
        /// is left as it is.
        #[tracing::instrument(skip(self, effect), name = "execute_effect")]
        fn execute_effect(&self, effect: Effect<A>) -> Option<A> {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                    metrics::counter!("store.effects.executed", "type" => "none").increment(1);
                    None
                },
                Effect::Storage(StorageOperation::Write {
                    storage,
                    key,
                    value,
                    on_success,
                    on_error,
                }) => {
                    metrics::counter!("store.effects.executed", "type" => "storage_write")
                        .increment(1);
                    tracing::debug!(key = %key, bytes = value.len(), "Executing storage write");

                    match run_blocking(|| storage.set(&key, &value)) {
                        Ok(()) => {
                            tracing::trace!(key = %key, "storage write succeeded");
                            on_success(())
                        },
                        Err(error) => {
                            tracing::warn!(key = %key, error = %error, "storage write failed");
                            metrics::counter!("store.storage.failures").increment(1);
                            on_error(error)
                        },
                    }
                },
            }
        }
    }

    /// Runs blocking storage I/O
    ///
    /// On a multi-thread runtime the worker is handed off with
    /// `block_in_place` so other tasks keep running; elsewhere `f` runs inline.
    fn run_blocking<T>(f: impl FnOnce() -> T) -> T {
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(f)
            },
            _ => f(),
        }
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Clone,
        E: Clone,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: self.reducer.clone(),
                environment: self.environment.clone(),
                shutdown: Arc::clone(&self.shutdown),
                action_broadcast: self.action_broadcast.clone(),
                snapshots: Arc::clone(&self.snapshots),
            }
        }
    }
}

// Re-export for convenience
pub use store::Store;

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::{smallvec, SmallVec};

    #[derive(Clone, Debug, Default)]
    struct TallyState {
        total: u32,
    }

    #[derive(Clone, Debug)]
    enum TallyAction {
        Add(u32),
    }

    #[derive(Clone)]
    struct TallyReducer;

    impl Reducer for TallyReducer {
        type State = TallyState;
        type Action = TallyAction;
        type Environment = ();

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TallyAction::Add(n) => state.total += n,
            }
            smallvec![Effect::None]
        }
    }

    #[test]
    fn default_config() {
        assert_eq!(StoreConfig::default().broadcast_capacity, 16);
        assert_eq!(StoreConfig::new(4).with_broadcast_capacity(8).broadcast_capacity, 8);
    }

    #[tokio::test]
    async fn send_updates_state() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        store.send(TallyAction::Add(2)).await.unwrap();
        store.send(TallyAction::Add(3)).await.unwrap();

        assert_eq!(store.state(|s| s.total).await, 5);
    }

    #[tokio::test]
    async fn send_and_read_sees_own_result() {
        let store = Store::new(TallyState::default(), TallyReducer, ());

        let total = store
            .send_and_read(TallyAction::Add(4), |s| s.total)
            .await
            .unwrap();

        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn shutdown_rejects_actions() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        store.shutdown();

        assert!(store.is_shutting_down());
        assert_eq!(
            store.send(TallyAction::Add(1)).await,
            Err(StoreError::ShutdownInProgress)
        );
        assert_eq!(store.state(|s| s.total).await, 0);
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = Store::new(TallyState::default(), TallyReducer, ());
        let other = store.clone();

        other.send(TallyAction::Add(7)).await.unwrap();

        assert_eq!(store.state(|s| s.total).await, 7);
    }
}
