//! # todolist testing
//!
//! Testing utilities for the todo list manager.
//!
//! This crate provides:
//! - Mock implementations of the environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use todolist::{TodoEnvironment, TodoStorage};
//! use todolist_testing::mocks::{remote_todo, test_clock, MemoryKeyValueStore, MockRemote};
//!
//! let remote = MockRemote::with_todos(vec![remote_todo(1, "seed")]);
//! let env = TodoEnvironment::new(
//!     Arc::new(test_clock()),
//!     TodoStorage::new(Arc::new(MemoryKeyValueStore::new())),
//!     Arc::new(remote.clone()),
//! );
//! ```

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use todolist_core::environment::{Clock, KeyValueStore, RemoteFuture, RemoteTodos};
use todolist_core::{RemoteError, RemoteTodo, RemoteTodoDraft, StorageError};


pub use reducer_test::{assertions, ReducerTest};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{
        Arc, AtomicUsize, Clock, DateTime, Duration, HashMap, KeyValueStore, Mutex, Ordering,
        PoisonError, RemoteError, RemoteFuture, RemoteTodo, RemoteTodoDraft, RemoteTodos,
        StorageError, Utc,
    };

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time.
    ///
    /// # Example
    ///
    /// ```
    /// use todolist_testing::mocks::FixedClock;
    /// use todolist_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every read.
    ///
    /// Useful where each call must observe a later instant than the last,
    /// such as timestamp-derived ids.
    #[derive(Debug, Clone)]
    pub struct SteppingClock {
        start: DateTime<Utc>,
        step: Duration,
        ticks: Arc<AtomicUsize>,
    }

    impl SteppingClock {
        /// Start at `start`, advancing `step` per read
        #[must_use]
        pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                start,
                step,
                ticks: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl Clock for SteppingClock {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
        fn now(&self) -> DateTime<Utc> {
            let tick = self.ticks.fetch_add(1, Ordering::SeqCst) as i32;
            self.start + self.step * tick
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// Panics if the hardcoded timestamp fails to parse, which never happens.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// In-memory key-value store
    ///
    /// Clones share the same map, so a test can keep a handle and inspect
    /// what the manager persisted.
    #[derive(Debug, Clone, Default)]
    pub struct MemoryKeyValueStore {
        entries: Arc<Mutex<HashMap<String, String>>>,
        writes: Arc<AtomicUsize>,
    }

    impl MemoryKeyValueStore {
        /// Create an empty store
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Create a store pre-populated with `entries`
        #[must_use]
        pub fn with_entries<I, K, V>(entries: I) -> Self
        where
            I: IntoIterator<Item = (K, V)>,
            K: Into<String>,
            V: Into<String>,
        {
            let store = Self::new();
            {
                let mut map = store.entries.lock().unwrap_or_else(PoisonError::into_inner);
                for (key, value) in entries {
                    map.insert(key.into(), value.into());
                }
            }
            store
        }

        /// Raw value under `key`
        #[must_use]
        pub fn raw(&self, key: &str) -> Option<String> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .get(key)
                .cloned()
        }

        /// Number of `set` calls so far
        #[must_use]
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for MemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.raw(key))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(key.to_string(), value.to_string());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Scripted remote todo source
    ///
    /// Answers `fetch_todos` from a canned result and records every draft
    /// passed to `create_todo`. Clones share their recordings.
    #[derive(Debug, Clone)]
    pub struct MockRemote {
        fetch_result: Result<Vec<RemoteTodo>, RemoteError>,
        create_error: Option<RemoteError>,
        fetch_delay: Option<std::time::Duration>,
        enabled: bool,
        fetches: Arc<AtomicUsize>,
        created: Arc<Mutex<Vec<RemoteTodoDraft>>>,
    }

    impl MockRemote {
        /// Remote that serves `todos` and accepts every create
        #[must_use]
        pub fn with_todos(todos: Vec<RemoteTodo>) -> Self {
            Self {
                fetch_result: Ok(todos),
                create_error: None,
                fetch_delay: None,
                enabled: true,
                fetches: Arc::new(AtomicUsize::new(0)),
                created: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Remote whose every call fails with `error`
        #[must_use]
        pub fn failing(error: RemoteError) -> Self {
            Self {
                fetch_result: Err(error.clone()),
                create_error: Some(error),
                ..Self::with_todos(Vec::new())
            }
        }

        /// Remote reporting itself as disabled (local-only manager)
        #[must_use]
        pub fn disabled() -> Self {
            Self {
                enabled: false,
                ..Self::with_todos(Vec::new())
            }
        }

        /// Make `create_todo` fail with `error`
        #[must_use]
        pub fn with_create_error(mut self, error: RemoteError) -> Self {
            self.create_error = Some(error);
            self
        }

        /// Delay every fetch by `delay`
        #[must_use]
        pub const fn with_fetch_delay(mut self, delay: std::time::Duration) -> Self {
            self.fetch_delay = Some(delay);
            self
        }

        /// Number of `fetch_todos` calls so far
        #[must_use]
        pub fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }

        /// Drafts received by `create_todo`, oldest first
        #[must_use]
        pub fn created(&self) -> Vec<RemoteTodoDraft> {
            self.created
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }
    }

    impl RemoteTodos for MockRemote {
        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn fetch_todos(&self) -> RemoteFuture<'_, Vec<RemoteTodo>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            let result = self.fetch_result.clone();
            let delay = self.fetch_delay;
            Box::pin(async move {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                result
            })
        }

        fn create_todo(&self, draft: RemoteTodoDraft) -> RemoteFuture<'_, ()> {
            self.created
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(draft);
            let result = self.create_error.clone().map_or(Ok(()), Err);
            Box::pin(async move { result })
        }
    }

    /// Remote record as the public demo API serves it (no description)
    #[must_use]
    pub fn remote_todo(id: i64, title: &str) -> RemoteTodo {
        RemoteTodo {
            id,
            title: title.to_string(),
            completed: false,
            user_id: 1,
            description: None,
        }
    }
}

/// Test helpers and utilities
pub mod helpers {
    /// Install a `tracing` subscriber writing to the test harness output.
    ///
    /// Safe to call from many tests; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "todolist=debug".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

// Re-export commonly used items
pub use mocks::{
    remote_todo, test_clock, FixedClock, MemoryKeyValueStore, MockRemote, SteppingClock,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
    }

    #[test]
    fn test_stepping_clock_advances() {
        let clock = SteppingClock::new(test_clock().now(), Duration::milliseconds(5));
        let first = clock.now();
        let second = clock.now();
        assert_eq!(second - first, Duration::milliseconds(5));
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryKeyValueStore::with_entries([("todos", "[]")]);
        assert_eq!(store.get("todos").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.write_count(), 0);

        store.set("todos", "[1]").unwrap();
        assert_eq!(store.raw("todos").as_deref(), Some("[1]"));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_mock_remote_records_drafts() {
        let remote = MockRemote::with_todos(vec![remote_todo(1, "a")]);
        let handle = remote.clone();

        let fetched = tokio_test::block_on(remote.fetch_todos()).unwrap();
        tokio_test::block_on(remote.create_todo(RemoteTodoDraft::new("b"))).unwrap();

        assert_eq!(fetched.len(), 1);
        assert_eq!(handle.fetch_count(), 1);
        assert_eq!(handle.created(), vec![RemoteTodoDraft::new("b")]);
    }

    #[test]
    fn test_failing_remote() {
        let remote = MockRemote::failing(RemoteError::Status { status: 503 });
        let fetched = tokio_test::block_on(remote.fetch_todos());
        let created = tokio_test::block_on(remote.create_todo(RemoteTodoDraft::new("b")));

        assert_eq!(fetched, Err(RemoteError::Status { status: 503 }));
        assert_eq!(created, Err(RemoteError::Status { status: 503 }));
    }
}
