//! # todolist core
//!
//! Core traits and types for the todo list manager.
//!
//! The manager is built on the Reducer pattern:
//!
//! - **State**: Domain state owned by one reducer
//! - **Action**: All possible inputs to a reducer (user commands and remote results)
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: Side effect descriptions (not execution)
//! - **Environment**: Injected collaborators (clock, key-value storage, remote source)
//!
//! This crate holds the seams only. The todo domain itself lives in the
//! `todolist` crate, the executor in `todolist-runtime`.
//!
//! ## Example
//!
//! ```ignore
//! use todolist_core::{effect::Effect, reducer::Reducer, SmallVec};
//!
//! impl Reducer for TodoReducer {
//!     type State = TodoState;
//!     type Action = TodoAction;
//!     type Environment = TodoEnvironment;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut TodoState,
//!         action: TodoAction,
//!         env: &TodoEnvironment,
//!     ) -> SmallVec<[Effect<TodoAction>; 4]> {
//!         SmallVec::new()
//!     }
//! }
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{smallvec, SmallVec};

pub mod error;
pub mod remote;

pub use error::{RemoteError, StorageError};
pub use remote::{RemoteTodo, RemoteTodoDraft};

/// Reducer module - the core trait for business logic
///
/// Reducers are functions: `(State, Action, Environment) → (State, Effects)`.
/// Inline I/O is limited to synchronous environment collaborators (clock reads,
/// storage writes). Anything that suspends is returned as an
/// [`Effect`](crate::effect::Effect).
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Updates state in place and returns effect descriptions for the
        /// runtime to execute.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]>;
    }
}

/// Effect module - side effect descriptions
///
/// Effects are values, not execution. The runtime decides when and where
/// they run.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed
    ///
    /// # Type Parameters
    ///
    /// - `Action`: The action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Arbitrary async computation
        ///
        /// Returns `Option<Action>` - if Some, the action is fed back into the reducer
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }
}

/// Environment module - dependency injection traits
///
/// Every collaborator of the manager sits behind one of these traits so the
/// production wiring (system clock, file-backed storage, HTTP remote) and the
/// test wiring (fixed clock, in-memory storage, scripted remote) are
/// interchangeable.
pub mod environment {
    use crate::error::{RemoteError, StorageError};
    use crate::remote::{RemoteTodo, RemoteTodoDraft};
    use chrono::{DateTime, Utc};
    use std::future::Future;
    use std::pin::Pin;

    /// Boxed future returned by [`RemoteTodos`] so the trait stays dyn compatible.
    pub type RemoteFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RemoteError>> + Send + 'a>>;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Wall clock backed by [`Utc::now`].
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// String key-value store with local-storage semantics.
    ///
    /// Reads and writes are synchronous. A missing key reads as `None`.
    pub trait KeyValueStore: Send + Sync {
        /// Read the value stored under `key`.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the backing medium cannot be read.
        fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

        /// Replace the value stored under `key`.
        ///
        /// # Errors
        ///
        /// Returns [`StorageError::Io`] if the backing medium cannot be written.
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    }

    /// Remote todo source used for hydration and best-effort mirroring.
    ///
    /// Uses explicit `Pin<Box<dyn Future>>` returns so the environment can hold
    /// an `Arc<dyn RemoteTodos>` and effects can capture it.
    pub trait RemoteTodos: Send + Sync {
        /// Whether this remote participates at all.
        ///
        /// A disabled remote turns hydration into a no-op and skips mirroring.
        fn is_enabled(&self) -> bool {
            true
        }

        /// Fetch the seed collection.
        fn fetch_todos(&self) -> RemoteFuture<'_, Vec<RemoteTodo>>;

        /// Forward a newly created todo. The response carries no meaning
        /// beyond success or failure.
        fn create_todo(&self, draft: RemoteTodoDraft) -> RemoteFuture<'_, ()>;
    }

    /// Remote used by the local-only variant of the manager.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct LocalOnly;

    impl RemoteTodos for LocalOnly {
        fn is_enabled(&self) -> bool {
            false
        }

        fn fetch_todos(&self) -> RemoteFuture<'_, Vec<RemoteTodo>> {
            Box::pin(async { Ok(Vec::new()) })
        }

        fn create_todo(&self, _draft: RemoteTodoDraft) -> RemoteFuture<'_, ()> {
            Box::pin(async { Ok(()) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::effect::Effect;
    use super::environment::{Clock, LocalOnly, RemoteTodos, SystemClock};
    use super::remote::RemoteTodoDraft;

    #[test]
    fn system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
    }

    #[test]
    fn local_only_remote_is_disabled() {
        assert!(!LocalOnly.is_enabled());
    }

    #[test]
    fn local_only_remote_answers_empty() {
        let fetched = tokio_test::block_on(LocalOnly.fetch_todos());
        assert!(matches!(fetched, Ok(ref todos) if todos.is_empty()));

        let created = tokio_test::block_on(LocalOnly.create_todo(RemoteTodoDraft::new("x")));
        assert!(created.is_ok());
    }

    #[test]
    fn effect_debug_hides_futures() {
        let none: Effect<()> = Effect::None;
        let future: Effect<()> = Effect::Future(Box::pin(async { None }));

        assert_eq!(format!("{none:?}"), "Effect::None");
        assert_eq!(format!("{future:?}"), "Effect::Future(<future>)");
    }
}
