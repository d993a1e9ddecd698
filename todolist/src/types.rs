//! Domain types for the todo list.
//!
//! A todo lives in exactly one of two ordered collections: the active list or
//! the trash. [`TodoState`] owns both, together with the search and
//! pagination cursor, and derives the filtered and paginated views from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use todolist_core::remote::DEFAULT_USER_ID;
use todolist_core::RemoteTodo;

/// Description given to a todo created without one
pub const DEFAULT_DESCRIPTION: &str = "Task details";

/// Default page size of the paginated view
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Identifier of a todo
///
/// Derived from the creation time in milliseconds, or taken from the
/// remote record for hydrated todos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(i64);

impl TodoId {
    /// Wrap a raw identifier
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TodoId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TodoId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Title
    pub title: String,
    /// Free-text description
    #[serde(default = "default_description")]
    pub description: String,
    /// Whether the todo is completed
    #[serde(default)]
    pub completed: bool,
    /// Owning user; constant in this single-user application
    #[serde(default = "default_user_id")]
    pub user_id: i64,
}

impl TodoItem {
    /// Creates a new, incomplete todo item
    ///
    /// A missing or empty description falls back to [`DEFAULT_DESCRIPTION`].
    #[must_use]
    pub fn new(id: TodoId, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            completed: false,
            user_id: DEFAULT_USER_ID,
        }
    }

    /// Build an item from a hydration record, synthesizing a description
    /// when the record has none.
    #[must_use]
    pub fn from_remote(remote: RemoteTodo) -> Self {
        let description = remote
            .description
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| format!("Task {} details", remote.id));

        Self {
            id: TodoId(remote.id),
            title: remote.title,
            description,
            completed: remote.completed,
            user_id: remote.user_id,
        }
    }

    /// Case-insensitive substring match on title or description.
    ///
    /// `needle` must already be lower-cased.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }

    /// Merge an update into this item.
    ///
    /// Fields the update omits are kept. An empty description counts as
    /// omitted.
    pub fn apply(&mut self, update: TodoUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description.filter(|d| !d.is_empty()) {
            self.description = description;
        }
        if let Some(completed) = update.completed {
            self.completed = completed;
        }
    }
}

/// A todo sitting in the trash
///
/// Serialized flat: the todo's own fields plus `deletedAt`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodoItem {
    /// The trashed todo
    #[serde(flatten)]
    pub item: TodoItem,
    /// When it was moved to the trash
    pub deleted_at: DateTime<Utc>,
}

impl DeletedTodoItem {
    /// Wrap `item` as trashed at `deleted_at`
    #[must_use]
    pub const fn new(item: TodoItem, deleted_at: DateTime<Utc>) -> Self {
        Self { item, deleted_at }
    }

    /// Identifier of the trashed todo
    #[must_use]
    pub const fn id(&self) -> TodoId {
        self.item.id
    }

    /// Drop the deletion timestamp
    #[must_use]
    pub fn into_item(self) -> TodoItem {
        self.item
    }
}

/// Input for creating a todo
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoDraft {
    /// Title
    pub title: String,
    /// Optional description
    pub description: Option<String>,
}

impl TodoDraft {
    /// Draft with a title and no description
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
        }
    }

    /// Attach a description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update of an active todo; `None` leaves a field unchanged
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoUpdate {
    /// New title
    pub title: Option<String>,
    /// New description (empty is ignored)
    pub description: Option<String>,
    /// New completion flag
    pub completed: Option<bool>,
}

impl TodoUpdate {
    /// Update that changes nothing
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the completion flag
    #[must_use]
    pub const fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }
}

/// Search and pagination cursor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListState {
    /// Raw search term as entered
    pub search_term: String,
    /// 1-indexed page
    pub current_page: usize,
    /// Page size, at least 1
    pub items_per_page: usize,
}

impl ListState {
    /// Fresh cursor on page 1 with no search term
    #[must_use]
    pub fn new(items_per_page: usize) -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

/// State of the todo list manager
///
/// Invariant: no id appears in both `todos` and `trashed`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TodoState {
    pub(crate) todos: Vec<TodoItem>,
    pub(crate) trashed: Vec<DeletedTodoItem>,
    pub(crate) list: ListState,
    pub(crate) loading: bool,
    pub(crate) last_error: Option<String>,
}

impl TodoState {
    /// Creates an empty state
    #[must_use]
    pub fn new(items_per_page: usize) -> Self {
        Self::with_collections(Vec::new(), Vec::new(), items_per_page)
    }

    /// Creates a state from previously persisted collections
    #[must_use]
    pub fn with_collections(
        todos: Vec<TodoItem>,
        trashed: Vec<DeletedTodoItem>,
        items_per_page: usize,
    ) -> Self {
        Self {
            todos,
            trashed,
            list: ListState::new(items_per_page),
            loading: false,
            last_error: None,
        }
    }

    /// Active todos in display order
    #[must_use]
    pub fn todos(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Trashed todos, most recently deleted first
    #[must_use]
    pub fn trashed(&self) -> &[DeletedTodoItem] {
        &self.trashed
    }

    /// Search and pagination cursor
    #[must_use]
    pub const fn list(&self) -> &ListState {
        &self.list
    }

    /// Whether a hydration fetch is in flight
    #[must_use]
    pub const fn loading(&self) -> bool {
        self.loading
    }

    /// Last remote failure, if any
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Active todo by id
    #[must_use]
    pub fn find(&self, id: TodoId) -> Option<&TodoItem> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Trashed todo by id
    #[must_use]
    pub fn find_trashed(&self, id: TodoId) -> Option<&DeletedTodoItem> {
        self.trashed.iter().find(|t| t.id() == id)
    }

    /// Whether `id` is known in either collection
    #[must_use]
    pub fn contains_id(&self, id: TodoId) -> bool {
        self.find(id).is_some() || self.find_trashed(id).is_some()
    }

    /// Pick an id for a new todo
    ///
    /// Uses `candidate` unless either collection already holds it, in which
    /// case the id goes one past the largest known id.
    #[must_use]
    pub fn next_id(&self, candidate: i64) -> TodoId {
        if !self.contains_id(TodoId(candidate)) {
            return TodoId(candidate);
        }

        let largest = self
            .todos
            .iter()
            .map(|t| t.id.0)
            .chain(self.trashed.iter().map(|t| t.id().0))
            .max()
            .unwrap_or(candidate);

        TodoId(largest.max(candidate).saturating_add(1))
    }

    /// Active todos matching the search term
    ///
    /// The term is trimmed and lower-cased; a blank term matches everything.
    #[must_use]
    pub fn filtered(&self) -> Vec<&TodoItem> {
        let needle = self.list.search_term.trim().to_lowercase();
        if needle.is_empty() {
            return self.todos.iter().collect();
        }
        self.todos.iter().filter(|t| t.matches(&needle)).collect()
    }

    /// Number of pages over the filtered view (0 when nothing matches)
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.filtered().len().div_ceil(self.list.items_per_page)
    }

    /// The current page of the filtered view
    #[must_use]
    pub fn paginated(&self) -> Vec<&TodoItem> {
        let per_page = self.list.items_per_page;
        let start = (self.list.current_page.saturating_sub(1)).saturating_mul(per_page);
        self.filtered().into_iter().skip(start).take(per_page).collect()
    }
}

const fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, title: &str) -> TodoItem {
        TodoItem::new(TodoId::new(id), title, None)
    }

    fn state_with(count: i64) -> TodoState {
        let todos = (1..=count).map(|i| item(i, &format!("Todo {i}"))).collect();
        TodoState::with_collections(todos, Vec::new(), 10)
    }

    #[test]
    fn new_item_defaults() {
        let todo = TodoItem::new(TodoId::new(5), "Write docs", None);
        assert_eq!(todo.description, DEFAULT_DESCRIPTION);
        assert!(!todo.completed);
        assert_eq!(todo.user_id, 1);

        let blank = TodoItem::new(TodoId::new(6), "x", Some(String::new()));
        assert_eq!(blank.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn from_remote_synthesizes_description() {
        let remote = RemoteTodo {
            id: 42,
            title: "seed".to_string(),
            completed: true,
            user_id: 3,
            description: None,
        };
        let todo = TodoItem::from_remote(remote);

        assert_eq!(todo.id, TodoId::new(42));
        assert_eq!(todo.description, "Task 42 details");
        assert!(todo.completed);
        assert_eq!(todo.user_id, 3);
    }

    #[test]
    fn update_keeps_description_when_omitted_or_empty() {
        let mut todo = TodoItem::new(TodoId::new(1), "old", Some("keep me".to_string()));

        todo.apply(TodoUpdate::new().title("new"));
        assert_eq!(todo.title, "new");
        assert_eq!(todo.description, "keep me");

        todo.apply(TodoUpdate::new().description(""));
        assert_eq!(todo.description, "keep me");

        todo.apply(TodoUpdate::new().description("changed").completed(true));
        assert_eq!(todo.description, "changed");
        assert!(todo.completed);
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut state = TodoState::with_collections(
            vec![item(1, "Buy Milk"), item(2, "Walk dog")],
            Vec::new(),
            10,
        );

        state.list.search_term = "  milk ".to_string();
        let hits: Vec<_> = state.filtered().iter().map(|t| t.id.get()).collect();
        assert_eq!(hits, vec![1]);

        state.list.search_term = "xyz".to_string();
        assert!(state.filtered().is_empty());

        state.list.search_term = "   ".to_string();
        assert_eq!(state.filtered().len(), 2);
    }

    #[test]
    fn filter_matches_description() {
        let mut state = TodoState::with_collections(
            vec![TodoItem::new(TodoId::new(1), "Errand", Some("Pick up MILK".to_string()))],
            Vec::new(),
            10,
        );
        state.list.search_term = "milk".to_string();
        assert_eq!(state.filtered().len(), 1);
    }

    #[test]
    fn pagination_over_25_items() {
        let mut state = state_with(25);
        assert_eq!(state.total_pages(), 3);

        state.list.current_page = 3;
        let page: Vec<_> = state.paginated().iter().map(|t| t.id.get()).collect();
        assert_eq!(page, vec![21, 22, 23, 24, 25]);
    }

    #[test]
    fn empty_list_has_zero_pages() {
        let state = TodoState::new(10);
        assert_eq!(state.total_pages(), 0);
        assert!(state.paginated().is_empty());
    }

    #[test]
    fn next_id_avoids_both_collections() {
        let trashed = DeletedTodoItem::new(item(900, "gone"), Utc::now());
        let state = TodoState::with_collections(vec![item(100, "a")], vec![trashed], 10);

        assert_eq!(state.next_id(500), TodoId::new(500));
        assert_eq!(state.next_id(100), TodoId::new(901));
        assert_eq!(state.next_id(900), TodoId::new(901));
    }

    #[test]
    fn deleted_item_serializes_flat() {
        let deleted_at = DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let json = serde_json::to_value(DeletedTodoItem::new(item(7, "x"), deleted_at)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "title": "x",
                "description": "Task details",
                "completed": false,
                "userId": 1,
                "deletedAt": "2025-01-01T00:00:00Z"
            })
        );
    }

    #[test]
    fn todo_id_parses_from_str() {
        assert_eq!(" 1700000000000 ".parse::<TodoId>().unwrap(), TodoId::new(1_700_000_000_000));
        assert!("abc".parse::<TodoId>().is_err());
    }

    #[test]
    fn list_state_clamps_page_size() {
        assert_eq!(ListState::new(0).items_per_page, 1);
        assert_eq!(ListState::default().items_per_page, DEFAULT_ITEMS_PER_PAGE);
    }
}
