//! Persistence of the two todo collections.
//!
//! Each collection is stored as one JSON array under its own key. Reads are
//! forgiving: a missing or unreadable record loads as an empty collection.

use crate::types::{DeletedTodoItem, TodoItem, TodoState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use todolist_core::environment::KeyValueStore;
use todolist_core::StorageError;

/// Key holding the active collection
pub const ACTIVE_KEY: &str = "todos";

/// Key holding the trashed collection
pub const TRASH_KEY: &str = "deletedTodos";

/// JSON codec for the todo collections over a [`KeyValueStore`]
#[derive(Clone)]
pub struct TodoStorage {
    store: Arc<dyn KeyValueStore>,
}

impl TodoStorage {
    /// Wrap a key-value store
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the active collection
    #[must_use]
    pub fn load_active(&self) -> Vec<TodoItem> {
        self.read(ACTIVE_KEY)
    }

    /// Read the trashed collection
    #[must_use]
    pub fn load_trashed(&self) -> Vec<DeletedTodoItem> {
        self.read(TRASH_KEY)
    }

    /// Build the initial manager state from both collections
    #[must_use]
    pub fn load_state(&self, items_per_page: usize) -> TodoState {
        let todos = self.load_active();
        let trashed = self.load_trashed();
        tracing::debug!(
            active = todos.len(),
            trashed = trashed.len(),
            "Loaded todos from storage"
        );
        TodoState::with_collections(todos, trashed, items_per_page)
    }

    /// Overwrite the active collection
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the underlying write fails.
    pub fn save_active(&self, todos: &[TodoItem]) -> Result<(), StorageError> {
        self.write(ACTIVE_KEY, todos)
    }

    /// Overwrite the trashed collection
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if encoding or the underlying write fails.
    pub fn save_trashed(&self, trashed: &[DeletedTodoItem]) -> Result<(), StorageError> {
        self.write(TRASH_KEY, trashed)
    }

    fn read<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(key, error = %error, "Failed to read todos from storage");
                return Vec::new();
            },
        };

        serde_json::from_str(&raw).unwrap_or_else(|error| {
            tracing::warn!(key, error = %error, "Discarding unreadable todos record");
            metrics::counter!("todolist.storage.corrupt_records").increment(1);
            Vec::new()
        })
    }

    fn write<T: Serialize>(&self, key: &str, records: &[T]) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        self.store.set(key, &json)
    }
}

impl std::fmt::Debug for TodoStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStorage").finish_non_exhaustive()
    }
}
