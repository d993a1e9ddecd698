//! Records exchanged with the remote todo source.

use serde::{Deserialize, Serialize};

/// Owner of every todo in this single-user application.
pub const DEFAULT_USER_ID: i64 = 1;

/// A todo as served by the remote hydration source.
///
/// The source is not guaranteed to send a description; unknown fields are
/// ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTodo {
    /// Remote identifier
    pub id: i64,
    /// Title text
    pub title: String,
    /// Completion flag
    #[serde(default)]
    pub completed: bool,
    /// Owning user
    #[serde(default = "default_user_id")]
    pub user_id: i64,
    /// Description, absent on the public demo API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Body forwarded to the remote mirror sink when a todo is created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteTodoDraft {
    /// Title text
    pub title: String,
    /// Completion flag (always false for a fresh todo)
    pub completed: bool,
    /// Owning user
    pub user_id: i64,
}

impl RemoteTodoDraft {
    /// Draft for a new, incomplete todo owned by [`DEFAULT_USER_ID`].
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
            user_id: DEFAULT_USER_ID,
        }
    }
}

const fn default_user_id() -> i64 {
    DEFAULT_USER_ID
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_demo_api_record_without_description() {
        let json = r#"{"userId": 1, "id": 7, "title": "illo est ratione", "completed": true}"#;
        let todo: RemoteTodo = serde_json::from_str(json).unwrap();

        assert_eq!(todo.id, 7);
        assert_eq!(todo.user_id, 1);
        assert!(todo.completed);
        assert_eq!(todo.description, None);
    }

    #[test]
    fn draft_serializes_camel_case() {
        let json = serde_json::to_value(RemoteTodoDraft::new("X")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "X", "completed": false, "userId": 1})
        );
    }
}
