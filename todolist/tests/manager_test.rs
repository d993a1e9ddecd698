//! End-to-end behaviour of `TodoManager` over mock and real backends.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;
use todolist::{TodoDraft, TodoEnvironment, TodoId, TodoManager, TodoStorage, TodoUpdate};
use todolist_core::environment::Clock;
use todolist_core::RemoteError;
use todolist_runtime::{ManagerConfig, RemoteConfig};
use todolist_testing::helpers::init_test_tracing;
use todolist_testing::{remote_todo, test_clock, MemoryKeyValueStore, MockRemote, SteppingClock};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn manager_over(kv: &MemoryKeyValueStore, remote: &MockRemote) -> TodoManager {
    init_test_tracing();
    let env = TodoEnvironment::new(
        Arc::new(SteppingClock::new(test_clock().now(), chrono::Duration::milliseconds(1))),
        TodoStorage::new(Arc::new(kv.clone())),
        Arc::new(remote.clone()),
    );
    TodoManager::new(env, 10)
}

fn seed(count: i64) -> Vec<todolist_core::RemoteTodo> {
    (1..=count).map(|i| remote_todo(i, &format!("seed {i}"))).collect()
}

#[tokio::test]
async fn load_hydrates_empty_list() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::with_todos(seed(3));
    let manager = manager_over(&kv, &remote);

    manager.load().await.unwrap();

    let todos = manager.todos().await;
    assert_eq!(todos.len(), 3);
    assert_eq!(todos[0].description, "Task 1 details");
    assert!(!manager.loading().await);
    assert!(manager.error().await.is_none());
    assert!(kv.raw("todos").unwrap().contains("seed 3"));
}

#[tokio::test]
async fn load_keeps_persisted_list() {
    let kv = MemoryKeyValueStore::with_entries([(
        "todos",
        r#"[{"id":5,"title":"mine","description":"d","completed":false,"userId":1}]"#,
    )]);
    let remote = MockRemote::with_todos(seed(3));
    let manager = manager_over(&kv, &remote);

    manager.load().await.unwrap();

    assert_eq!(remote.fetch_count(), 0);
    let todos = manager.todos().await;
    assert_eq!(todos.len(), 1);
    assert_eq!(todos[0].title, "mine");
}

#[tokio::test]
async fn stored_todos_without_description_survive_load() {
    let kv = MemoryKeyValueStore::with_entries([(
        "todos",
        r#"[{"id":1,"title":"keep me","completed":false,"userId":1},{"id":2,"title":"me too","description":"x","completed":false,"userId":1}]"#,
    )]);
    let remote = MockRemote::with_todos(vec![remote_todo(99, "seed")]);
    let manager = manager_over(&kv, &remote);

    manager.load().await.unwrap();

    let titles: Vec<String> = manager.todos().await.into_iter().map(|t| t.title).collect();
    assert_eq!(titles, vec!["keep me", "me too"]);
    assert_eq!(remote.fetch_count(), 0);
    assert!(!kv.raw("todos").unwrap().contains("seed"));
}

#[tokio::test]
async fn load_failure_is_recorded() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::failing(RemoteError::Transport("offline".to_string()));
    let manager = manager_over(&kv, &remote);

    manager.load().await.unwrap();

    assert!(manager.todos().await.is_empty());
    assert!(!manager.loading().await);
    assert!(manager.error().await.unwrap().contains("offline"));
}

#[tokio::test]
async fn loading_flag_is_set_while_fetching() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::with_todos(seed(1)).with_fetch_delay(Duration::from_millis(200));
    let manager = manager_over(&kv, &remote);

    let background = manager.clone();
    let load = tokio::spawn(async move { background.load().await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(manager.loading().await);

    load.await.unwrap().unwrap();
    assert!(!manager.loading().await);
    assert_eq!(manager.todos().await.len(), 1);
}

#[tokio::test]
async fn local_only_manager_never_touches_remote() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::disabled();
    let manager = manager_over(&kv, &remote);

    manager.load().await.unwrap();
    manager.add_todo(TodoDraft::new("offline")).await.unwrap();
    manager.shutdown(Duration::from_secs(1)).await.unwrap();

    assert_eq!(remote.fetch_count(), 0);
    assert!(remote.created().is_empty());
    assert_eq!(manager.todos().await.len(), 1);
}

#[tokio::test]
async fn add_returns_item_and_mirrors_it() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::with_todos(Vec::new());
    let manager = manager_over(&kv, &remote);

    let todo = manager
        .add_todo(TodoDraft::new("Write report").with_description("quarterly"))
        .await
        .unwrap();
    manager.shutdown(Duration::from_secs(1)).await.unwrap();

    assert_eq!(todo.title, "Write report");
    assert_eq!(todo.description, "quarterly");
    assert_eq!(manager.todos().await, vec![todo]);
    assert_eq!(remote.created().len(), 1);
    assert_eq!(remote.created()[0].title, "Write report");
    assert!(manager.error().await.is_none());
}

#[tokio::test]
async fn failed_mirror_keeps_local_todo() {
    let kv = MemoryKeyValueStore::new();
    let remote =
        MockRemote::with_todos(Vec::new()).with_create_error(RemoteError::Status { status: 500 });
    let manager = manager_over(&kv, &remote);

    let todo = manager.add_todo(TodoDraft::new("Stay")).await.unwrap();
    manager.shutdown(Duration::from_secs(1)).await.unwrap();

    assert_eq!(manager.find(todo.id).await, Some(todo));
    assert!(kv.raw("todos").unwrap().contains("Stay"));
    assert_eq!(
        manager.error().await.as_deref(),
        Some("Remote returned status 500")
    );
}

#[tokio::test]
async fn trash_lifecycle_survives_reopen() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::disabled();
    let manager = manager_over(&kv, &remote);

    let a = manager.add_todo(TodoDraft::new("a")).await.unwrap();
    let b = manager.add_todo(TodoDraft::new("b")).await.unwrap();
    let c = manager.add_todo(TodoDraft::new("c")).await.unwrap();

    manager.delete_todo(a.id).await.unwrap();
    manager.delete_todo(b.id).await.unwrap();
    manager.restore_todo(a.id).await.unwrap();
    manager.permanently_delete_todo(b.id).await.unwrap();
    manager.toggle_todo(c.id).await.unwrap();
    manager
        .update_todo(c.id, TodoUpdate::new().title("c2"))
        .await
        .unwrap();

    let reopened = manager_over(&kv, &remote);
    let active = reopened.todos().await;
    let ids: Vec<TodoId> = active.iter().map(|t| t.id).collect();

    assert_eq!(ids, vec![a.id, c.id]);
    assert!(active[1].completed);
    assert_eq!(active[1].title, "c2");
    assert!(reopened.trashed_todos().await.is_empty());
}

#[tokio::test]
async fn deleted_at_is_not_before_creation() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::disabled();
    let manager = manager_over(&kv, &remote);

    let added = manager.add_todo(TodoDraft::new("short lived")).await.unwrap();
    manager.delete_todo(added.id).await.unwrap();

    assert!(manager.todos().await.is_empty());
    let trashed = manager.trashed_todos().await;
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].item, added);
    assert!(trashed[0].deleted_at.timestamp_millis() >= added.id.get());
}

#[tokio::test]
async fn search_and_pagination() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::with_todos(seed(25));
    let manager = manager_over(&kv, &remote);
    manager.load().await.unwrap();

    assert_eq!(manager.total_pages().await, 3);
    manager.set_page(3).await.unwrap();
    let page: Vec<i64> = manager
        .paginated_todos()
        .await
        .iter()
        .map(|t| t.id.get())
        .collect();
    assert_eq!(page, vec![21, 22, 23, 24, 25]);

    manager.set_page(4).await.unwrap();
    assert_eq!(manager.current_page().await, 3);

    manager.set_search_term("SEED 1").await.unwrap();
    assert_eq!(manager.search_term().await, "SEED 1");
    assert_eq!(manager.items_per_page().await, 10);
    assert_eq!(manager.current_page().await, 1);
    // "seed 1" and "seed 10" through "seed 19"
    assert_eq!(manager.filtered_todos().await.len(), 11);
    assert_eq!(manager.total_pages().await, 2);

    manager.set_search_term("nothing like this").await.unwrap();
    assert_eq!(manager.total_pages().await, 0);
    assert!(manager.paginated_todos().await.is_empty());
}

#[tokio::test]
async fn deleting_last_row_of_last_page_steps_back() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::with_todos(seed(11));
    let manager = manager_over(&kv, &remote);
    manager.load().await.unwrap();

    manager.set_page(2).await.unwrap();
    manager.delete_todo(TodoId::new(11)).await.unwrap();

    assert_eq!(manager.current_page().await, 1);
    assert_eq!(manager.paginated_todos().await.len(), 10);
}

#[tokio::test]
async fn hydration_skips_trashed_ids() {
    let kv = MemoryKeyValueStore::with_entries([(
        "deletedTodos",
        r#"[{"id":2,"title":"old","description":"d","completed":false,"userId":1,"deletedAt":"2025-01-01T00:00:00Z"}]"#,
    )]);
    let remote = MockRemote::with_todos(seed(3));
    let manager = manager_over(&kv, &remote);

    manager.load().await.unwrap();

    let ids: Vec<i64> = manager.todos().await.iter().map(|t| t.id.get()).collect();
    assert_eq!(ids, vec![1, 3]);
    assert_eq!(manager.trashed_todos().await.len(), 1);
}

#[tokio::test]
async fn commands_rejected_after_shutdown() {
    let kv = MemoryKeyValueStore::new();
    let remote = MockRemote::disabled();
    let manager = manager_over(&kv, &remote);

    manager.shutdown(Duration::from_secs(1)).await.unwrap();

    assert!(manager.add_todo(TodoDraft::new("late")).await.is_err());
    assert!(manager.todos().await.is_empty());
}

#[tokio::test]
async fn file_backed_manager_against_http_remote() {
    init_test_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/todos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"userId": 1, "id": 1, "title": "from server", "completed": true}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/todos"))
        .and(body_json(serde_json::json!({
            "title": "local",
            "completed": false,
            "userId": 1
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 201})))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let config = ManagerConfig {
        data_dir: dir.path().to_path_buf(),
        items_per_page: 10,
        remote: RemoteConfig {
            enabled: true,
            url: format!("{}/todos", server.uri()),
        },
    };

    let manager = TodoManager::from_config(&config).unwrap();
    manager.load().await.unwrap();
    manager.add_todo(TodoDraft::new("local")).await.unwrap();
    manager.shutdown(Duration::from_secs(5)).await.unwrap();

    let reopened = TodoManager::from_config(&config).unwrap();
    reopened.load().await.unwrap();
    let todos = reopened.todos().await;

    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0].description, "Task 1 details");
    assert!(todos[0].completed);
    assert_eq!(todos[1].title, "local");
    assert!(dir.path().join("todos.json").exists());
}
