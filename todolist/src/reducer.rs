//! Reducer logic for the todo list.
//!
//! Every arm that changes a collection writes that collection back to
//! storage before returning. Remote calls are returned as effects and their
//! outcome comes back as a result action.

use crate::action::TodoAction;
use crate::storage::TodoStorage;
use crate::types::{DeletedTodoItem, TodoDraft, TodoId, TodoItem, TodoState, TodoUpdate};
use std::sync::Arc;
use todolist_core::{
    effect::Effect,
    environment::{Clock, RemoteTodos},
    reducer::Reducer,
    smallvec, RemoteError, RemoteTodo, RemoteTodoDraft, SmallVec,
};

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for ids and deletion timestamps
    pub clock: Arc<dyn Clock>,
    /// Persistence of both collections
    pub storage: TodoStorage,
    /// Hydration source and mirror sink
    pub remote: Arc<dyn RemoteTodos>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, storage: TodoStorage, remote: Arc<dyn RemoteTodos>) -> Self {
        Self {
            clock,
            storage,
            remote,
        }
    }
}

/// Reducer for the todo list
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn persist_active(state: &TodoState, env: &TodoEnvironment) {
        if let Err(error) = env.storage.save_active(&state.todos) {
            tracing::warn!(error = %error, "Failed to persist active todos");
            metrics::counter!("todolist.storage.write_failures").increment(1);
        }
    }

    fn persist_trashed(state: &TodoState, env: &TodoEnvironment) {
        if let Err(error) = env.storage.save_trashed(&state.trashed) {
            tracing::warn!(error = %error, "Failed to persist trashed todos");
            metrics::counter!("todolist.storage.write_failures").increment(1);
        }
    }

    fn load(state: &mut TodoState, env: &TodoEnvironment) -> SmallVec<[Effect<TodoAction>; 4]> {
        if !state.todos.is_empty() {
            tracing::debug!(active = state.todos.len(), "Active list present, skipping hydration");
            return SmallVec::new();
        }
        if !env.remote.is_enabled() {
            tracing::debug!("Remote disabled, skipping hydration");
            return SmallVec::new();
        }

        state.loading = true;
        state.last_error = None;

        let remote = Arc::clone(&env.remote);
        smallvec![Effect::Future(Box::pin(async move {
            Some(match remote.fetch_todos().await {
                Ok(todos) => TodoAction::TodosFetched { todos },
                Err(error) => TodoAction::FetchFailed { error },
            })
        }))]
    }

    fn hydrate(state: &mut TodoState, todos: Vec<RemoteTodo>, env: &TodoEnvironment) {
        let fetched = todos.len();
        let kept: Vec<TodoItem> = todos
            .into_iter()
            .map(TodoItem::from_remote)
            .filter(|todo| state.find_trashed(todo.id).is_none())
            .collect();
        state.todos = kept;
        state.loading = false;
        Self::persist_active(state, env);

        tracing::info!(
            fetched,
            kept = state.todos.len(),
            "Hydrated todos from remote"
        );
    }

    fn hydration_failed(state: &mut TodoState, error: &RemoteError, env: &TodoEnvironment) {
        tracing::error!(error = %error, "Failed to fetch initial todos");
        metrics::counter!("todolist.remote.fetch_failures").increment(1);

        state.last_error = Some(error.to_string());
        state.todos.clear();
        state.loading = false;
        Self::persist_active(state, env);
    }

    fn add(
        state: &mut TodoState,
        draft: TodoDraft,
        env: &TodoEnvironment,
    ) -> SmallVec<[Effect<TodoAction>; 4]> {
        let id = state.next_id(env.clock.now().timestamp_millis());
        let item = TodoItem::new(id, draft.title, draft.description);
        let mirror = RemoteTodoDraft::new(item.title.clone());

        state.todos.push(item);
        Self::persist_active(state, env);
        tracing::debug!(%id, "Added todo");

        if !env.remote.is_enabled() {
            return SmallVec::new();
        }

        let remote = Arc::clone(&env.remote);
        smallvec![Effect::Future(Box::pin(async move {
            Some(match remote.create_todo(mirror).await {
                Ok(()) => TodoAction::TodoMirrored { id },
                Err(error) => TodoAction::MirrorFailed { id, error },
            })
        }))]
    }

    fn toggle(state: &mut TodoState, id: TodoId, env: &TodoEnvironment) {
        let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(%id, "Toggle ignored, no such active todo");
            return;
        };
        todo.completed = !todo.completed;
        Self::persist_active(state, env);
    }

    fn update(state: &mut TodoState, id: TodoId, update: TodoUpdate, env: &TodoEnvironment) {
        let Some(todo) = state.todos.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(%id, "Update ignored, no such active todo");
            return;
        };
        todo.apply(update);
        Self::persist_active(state, env);
    }

    fn delete(state: &mut TodoState, id: TodoId, env: &TodoEnvironment) {
        let Some(index) = state.todos.iter().position(|t| t.id == id) else {
            tracing::debug!(%id, "Delete ignored, no such active todo");
            return;
        };

        let item = state.todos.remove(index);
        state
            .trashed
            .insert(0, DeletedTodoItem::new(item, env.clock.now()));

        // Step back once if the current page emptied out
        if state.list.current_page > 1 && state.paginated().is_empty() {
            state.list.current_page -= 1;
        }

        Self::persist_active(state, env);
        Self::persist_trashed(state, env);
    }

    fn restore(state: &mut TodoState, id: TodoId, env: &TodoEnvironment) {
        let Some(index) = state.trashed.iter().position(|t| t.id() == id) else {
            tracing::debug!(%id, "Restore ignored, no such trashed todo");
            return;
        };

        let item = state.trashed.remove(index).into_item();
        state.todos.insert(0, item);

        Self::persist_active(state, env);
        Self::persist_trashed(state, env);
    }

    fn purge(state: &mut TodoState, id: TodoId, env: &TodoEnvironment) {
        let before = state.trashed.len();
        state.trashed.retain(|t| t.id() != id);
        if state.trashed.len() == before {
            tracing::debug!(%id, "Permanent delete ignored, no such trashed todo");
            return;
        }
        Self::persist_trashed(state, env);
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoState;
    type Action = TodoAction;
    type Environment = TodoEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(command = action.is_command(), "Reducing todo action");

        match action {
            // ========== Commands ==========
            TodoAction::Load => return Self::load(state, env),
            TodoAction::AddTodo { draft } => return Self::add(state, draft, env),
            TodoAction::ToggleTodo { id } => Self::toggle(state, id, env),
            TodoAction::UpdateTodo { id, update } => Self::update(state, id, update, env),
            TodoAction::DeleteTodo { id } => Self::delete(state, id, env),
            TodoAction::RestoreTodo { id } => Self::restore(state, id, env),
            TodoAction::PermanentlyDeleteTodo { id } => Self::purge(state, id, env),
            TodoAction::SetSearchTerm { term } => {
                // Re-sending the current term keeps the page
                if term != state.list.search_term {
                    state.list.search_term = term;
                    state.list.current_page = 1;
                }
            },
            TodoAction::SetPage { page } => {
                if (1..=state.total_pages()).contains(&page) {
                    state.list.current_page = page;
                } else {
                    tracing::debug!(page, "Page out of range, ignored");
                }
            },

            // ========== Remote results ==========
            TodoAction::TodosFetched { todos } => Self::hydrate(state, todos, env),
            TodoAction::FetchFailed { error } => Self::hydration_failed(state, &error, env),
            TodoAction::TodoMirrored { id } => {
                tracing::debug!(%id, "Todo mirrored to remote");
            },
            TodoAction::MirrorFailed { id, error } => {
                tracing::warn!(%id, error = %error, "Failed to mirror todo, keeping local copy");
                metrics::counter!("todolist.remote.mirror_failures").increment(1);
                state.last_error = Some(error.to_string());
            },
        }

        SmallVec::new()
    }
}
