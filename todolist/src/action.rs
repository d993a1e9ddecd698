//! Actions accepted by the todo reducer.

use crate::types::{TodoDraft, TodoId, TodoUpdate};
use todolist_core::{RemoteError, RemoteTodo};

/// Everything that can happen to the todo list
///
/// Commands come from callers of the manager. The remaining variants are
/// fed back by effects once a remote call settles.
#[derive(Clone, Debug, PartialEq)]
pub enum TodoAction {
    // Commands
    /// Hydrate the active list from the remote source if it is empty
    Load,
    /// Append a new todo to the active list
    AddTodo {
        /// Title and optional description
        draft: TodoDraft,
    },
    /// Flip the completion flag of an active todo
    ToggleTodo {
        /// Target todo
        id: TodoId,
    },
    /// Merge a partial update into an active todo
    UpdateTodo {
        /// Target todo
        id: TodoId,
        /// Fields to change
        update: TodoUpdate,
    },
    /// Move an active todo to the front of the trash
    DeleteTodo {
        /// Target todo
        id: TodoId,
    },
    /// Move a trashed todo back to the front of the active list
    RestoreTodo {
        /// Target todo
        id: TodoId,
    },
    /// Drop a trashed todo for good
    PermanentlyDeleteTodo {
        /// Target todo
        id: TodoId,
    },
    /// Replace the search term; a changed term goes back to page 1
    SetSearchTerm {
        /// Raw term as entered
        term: String,
    },
    /// Jump to a page of the filtered view
    SetPage {
        /// 1-indexed page
        page: usize,
    },

    // Remote results
    /// Hydration fetch returned records
    TodosFetched {
        /// Records in remote order
        todos: Vec<RemoteTodo>,
    },
    /// Hydration fetch failed
    FetchFailed {
        /// Cause
        error: RemoteError,
    },
    /// A new todo reached the mirror sink
    TodoMirrored {
        /// Local id of the mirrored todo
        id: TodoId,
    },
    /// Forwarding a new todo to the mirror sink failed
    MirrorFailed {
        /// Local id of the todo
        id: TodoId,
        /// Cause
        error: RemoteError,
    },
}

impl TodoAction {
    /// Whether this action was issued by a caller rather than fed back by
    /// an effect.
    #[must_use]
    pub const fn is_command(&self) -> bool {
        !matches!(
            self,
            Self::TodosFetched { .. }
                | Self::FetchFailed { .. }
                | Self::TodoMirrored { .. }
                | Self::MirrorFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_results_are_not_commands() {
        assert!(TodoAction::Load.is_command());
        assert!(TodoAction::SetPage { page: 2 }.is_command());
        assert!(!TodoAction::TodosFetched { todos: vec![] }.is_command());
        assert!(
            !TodoAction::MirrorFailed {
                id: TodoId::new(1),
                error: RemoteError::Status { status: 500 },
            }
            .is_command()
        );
    }
}
