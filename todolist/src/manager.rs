//! The todo list manager: a [`Store`] running [`TodoReducer`] plus the read
//! views callers need.
//!
//! Calls are expected from one task at a time. Each command resolves once
//! its action has been reduced and persisted; [`load`](TodoManager::load)
//! additionally waits for the hydration fetch to settle. Mirroring a new
//! todo runs in the background and is drained by
//! [`shutdown`](TodoManager::shutdown).

use crate::action::TodoAction;
use crate::error::ManagerError;
use crate::reducer::{TodoEnvironment, TodoReducer};
use crate::storage::TodoStorage;
use crate::types::{DeletedTodoItem, TodoDraft, TodoId, TodoItem, TodoState, TodoUpdate};
use std::sync::Arc;
use std::time::Duration;
use todolist_core::environment::{LocalOnly, RemoteTodos, SystemClock};
use todolist_runtime::{FileKeyValueStore, HttpRemote, ManagerConfig, Store};

type TodoStore = Store<TodoState, TodoAction, TodoEnvironment, TodoReducer>;

/// Todo list manager
#[derive(Clone)]
pub struct TodoManager {
    store: TodoStore,
}

impl TodoManager {
    /// Build a manager over `environment`, reading both collections from
    /// its storage.
    #[must_use]
    pub fn new(environment: TodoEnvironment, items_per_page: usize) -> Self {
        let state = environment.storage.load_state(items_per_page);
        Self {
            store: Store::new(state, TodoReducer::new(), environment),
        }
    }

    /// Build the production manager described by `config`
    ///
    /// Storage lives in `config.data_dir`. A disabled remote yields the
    /// local-only variant.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Storage`] if the data directory cannot be
    /// created.
    pub fn from_config(config: &ManagerConfig) -> Result<Self, ManagerError> {
        let store = FileKeyValueStore::open(&config.data_dir)?;
        let remote: Arc<dyn RemoteTodos> = if config.remote.enabled {
            Arc::new(HttpRemote::new(config.remote.url.clone()))
        } else {
            Arc::new(LocalOnly)
        };

        tracing::info!(
            data_dir = %config.data_dir.display(),
            remote_enabled = config.remote.enabled,
            "Opening todo list"
        );

        let environment = TodoEnvironment::new(
            Arc::new(SystemClock),
            TodoStorage::new(Arc::new(store)),
            remote,
        );
        Ok(Self::new(environment, config.items_per_page))
    }

    // ========== Commands ==========

    /// Hydrate from the remote source if the active list is empty.
    ///
    /// Resolves after the fetch result has been applied. A failed fetch
    /// leaves the message in [`error`](Self::error).
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn load(&self) -> Result<(), ManagerError> {
        let mut handle = self.store.send(TodoAction::Load).await?;
        handle.wait().await;
        Ok(())
    }

    /// Append a new todo and return it
    ///
    /// Mirroring to the remote continues in the background.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn add_todo(&self, draft: TodoDraft) -> Result<TodoItem, ManagerError> {
        self.store.send(TodoAction::AddTodo { draft }).await?;
        self.store
            .state(|s| s.todos().last().cloned())
            .await
            .ok_or(ManagerError::AddNotApplied)
    }

    /// Flip the completion flag of an active todo
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn toggle_todo(&self, id: TodoId) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::ToggleTodo { id }).await
    }

    /// Merge `update` into an active todo
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn update_todo(&self, id: TodoId, update: TodoUpdate) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::UpdateTodo { id, update }).await
    }

    /// Move an active todo to the trash
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn delete_todo(&self, id: TodoId) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::DeleteTodo { id }).await
    }

    /// Move a trashed todo back to the active list
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn restore_todo(&self, id: TodoId) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::RestoreTodo { id }).await
    }

    /// Remove a trashed todo for good
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn permanently_delete_todo(&self, id: TodoId) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::PermanentlyDeleteTodo { id }).await
    }

    /// Replace the search term; a changed term sends the page back to 1
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn set_search_term(&self, term: impl Into<String>) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::SetSearchTerm { term: term.into() })
            .await
    }

    /// Jump to `page`; ignored unless `1 <= page <= total_pages()`
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if the manager is shutting down.
    pub async fn set_page(&self, page: usize) -> Result<(), ManagerError> {
        self.dispatch(TodoAction::SetPage { page }).await
    }

    /// Stop accepting commands and wait up to `timeout` for background
    /// remote calls.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::Store`] if effects are still running when
    /// the timeout elapses.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), ManagerError> {
        self.store.shutdown(timeout).await?;
        Ok(())
    }

    async fn dispatch(&self, action: TodoAction) -> Result<(), ManagerError> {
        self.store.send(action).await?;
        Ok(())
    }

    // ========== Views ==========

    /// Active todos in display order
    pub async fn todos(&self) -> Vec<TodoItem> {
        self.store.state(|s| s.todos().to_vec()).await
    }

    /// Trashed todos, most recently deleted first
    pub async fn trashed_todos(&self) -> Vec<DeletedTodoItem> {
        self.store.state(|s| s.trashed().to_vec()).await
    }

    /// Active todos matching the search term
    pub async fn filtered_todos(&self) -> Vec<TodoItem> {
        self.store
            .state(|s| s.filtered().into_iter().cloned().collect())
            .await
    }

    /// Current page of the filtered view
    pub async fn paginated_todos(&self) -> Vec<TodoItem> {
        self.store
            .state(|s| s.paginated().into_iter().cloned().collect())
            .await
    }

    /// Page count of the filtered view
    pub async fn total_pages(&self) -> usize {
        self.store.state(TodoState::total_pages).await
    }

    /// Current 1-indexed page
    pub async fn current_page(&self) -> usize {
        self.store.state(|s| s.list().current_page).await
    }

    /// Page size
    pub async fn items_per_page(&self) -> usize {
        self.store.state(|s| s.list().items_per_page).await
    }

    /// Current search term
    pub async fn search_term(&self) -> String {
        self.store.state(|s| s.list().search_term.clone()).await
    }

    /// Whether hydration is in flight
    pub async fn loading(&self) -> bool {
        self.store.state(TodoState::loading).await
    }

    /// Last remote failure, if any
    pub async fn error(&self) -> Option<String> {
        self.store.state(|s| s.last_error().map(str::to_string)).await
    }

    /// Active todo by id
    pub async fn find(&self, id: TodoId) -> Option<TodoItem> {
        self.store.state(|s| s.find(id).cloned()).await
    }
}

impl std::fmt::Debug for TodoManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoManager")
            .field("pending_effects", &self.store.pending_effects())
            .finish_non_exhaustive()
    }
}
