//! Errors surfaced by [`TodoManager`](crate::TodoManager).

use thiserror::Error;
use todolist_core::StorageError;
use todolist_runtime::StoreError;

/// Errors returned by manager operations
///
/// Domain misses (unknown ids, out-of-range pages) are not errors; those
/// operations simply leave state untouched.
#[derive(Error, Debug)]
pub enum ManagerError {
    /// The underlying store refused or timed out
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The storage backend could not be opened
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// An add completed but its item was not the last active todo
    #[error("Added todo is missing from the active list")]
    AddNotApplied,
}
