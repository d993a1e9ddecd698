//! Todo list manager with a trash, search, pagination and optional remote
//! hydration.
//!
//! The manager keeps two collections, active todos and trashed todos, and
//! writes both to a key-value store after every change. When a remote
//! source is enabled, an empty active list can be seeded from it and new
//! todos are forwarded to it on a best-effort basis.
//!
//! # Quick Start
//!
//! ```no_run
//! use todolist::{TodoDraft, TodoManager};
//! use todolist_runtime::ManagerConfig;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = TodoManager::from_config(&ManagerConfig::from_env()?)?;
//! manager.load().await?;
//!
//! let todo = manager.add_todo(TodoDraft::new("Buy milk")).await?;
//! manager.toggle_todo(todo.id).await?;
//! manager.delete_todo(todo.id).await?;
//! manager.restore_todo(todo.id).await?;
//!
//! manager.set_search_term("milk").await?;
//! for todo in manager.paginated_todos().await {
//!     println!("{} {}", todo.id, todo.title);
//! }
//!
//! manager.shutdown(Duration::from_secs(5)).await?;
//! # Ok(())
//! # }
//! ```

pub mod action;
pub mod error;
pub mod manager;
pub mod reducer;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use action::TodoAction;
pub use error::ManagerError;
pub use manager::TodoManager;
pub use reducer::{TodoEnvironment, TodoReducer};
pub use storage::TodoStorage;
pub use types::{
    DeletedTodoItem, ListState, TodoDraft, TodoId, TodoItem, TodoState, TodoUpdate,
    DEFAULT_DESCRIPTION, DEFAULT_ITEMS_PER_PAGE,
};
