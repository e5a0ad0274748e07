//! Migration Tests

use super::fake::{board, Call, FakeRepository, Op};
use crate::error::SyncError;
use crate::migrate::{
    has_local_data, load_local_tasks, migrate_local_tasks, parse_legacy_tasks, LegacyTask,
    LocalTaskStore, MemoryLocalStore, MigrationReport, CONTEXT_KEY, HOME_KEY, LEGACY_KEY, WORK_KEY,
};

fn user_boards() -> FakeRepository {
    FakeRepository::with_boards(vec![
        board("home", "Home", Vec::new()),
        board("work", "Work", Vec::new()),
    ])
}

fn store_with(entries: &[(&str, &str)]) -> MemoryLocalStore {
    let store = MemoryLocalStore::new();
    for (key, value) in entries {
        store.set(key, value);
    }
    store
}

#[test]
fn test_has_local_data() {
    assert!(!has_local_data(&MemoryLocalStore::new()));
    assert!(has_local_data(&store_with(&[(WORK_KEY, "[]")])));
    assert!(has_local_data(&store_with(&[(LEGACY_KEY, "[{}]")])));
    assert!(!has_local_data(&store_with(&[(CONTEXT_KEY, "Home")])));
}

#[test]
fn test_legacy_records_parse_leniently() {
    let tasks = parse_legacy_tasks(r#"[{"id": 5, "x": 12}, {"id": "b", "label": "B", "size": 0, "y": "oops"}]"#);

    assert_eq!(
        tasks,
        vec![
            LegacyTask {
                id: "5".to_string(),
                label: String::new(),
                x: 12.0,
                y: 0.0,
                size: 100.0,
            },
            LegacyTask {
                id: "b".to_string(),
                label: "B".to_string(),
                x: 0.0,
                y: 0.0,
                size: 100.0,
            },
        ]
    );
}

#[test]
fn test_unreadable_local_data_is_empty() {
    assert!(parse_legacy_tasks("not json").is_empty());
    assert!(parse_legacy_tasks(r#"{"id": 1}"#).is_empty());
}

#[test]
fn test_legacy_key_feeds_home_only() {
    let store = store_with(&[(LEGACY_KEY, r#"[{"id": 1, "label": "Old"}]"#)]);

    assert_eq!(load_local_tasks(&store, "Home").len(), 1);
    assert!(load_local_tasks(&store, "Work").is_empty());
    assert!(load_local_tasks(&store, "Garage").is_empty());
}

#[tokio::test]
async fn test_migration_creates_tasks_and_clears_local_data() {
    let repo = user_boards();
    let store = store_with(&[
        (HOME_KEY, r#"[{"id": 1, "label": "A", "x": 10, "y": 20}, {"id": 2, "label": "B"}]"#),
        (WORK_KEY, r#"[{"id": 3, "label": "C", "size": 60}]"#),
        (CONTEXT_KEY, "Work"),
    ]);

    let report = migrate_local_tasks(&repo, &store).await.unwrap();

    assert_eq!(report, MigrationReport { migrated: 3, failed: 0 });
    assert_eq!(repo.stored_tasks("home").len(), 2);
    let work = repo.stored_tasks("work");
    assert_eq!((work[0].label.as_str(), work[0].size), ("C", 60.0));
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_failed_creates_are_counted_and_keep_local_data() {
    let repo = user_boards();
    repo.fail(Op::CreateTask);
    let store = store_with(&[(HOME_KEY, r#"[{"id": 1}, {"id": 2}]"#)]);

    let report = migrate_local_tasks(&repo, &store).await.unwrap();

    assert_eq!(report, MigrationReport { migrated: 0, failed: 2 });
    assert!(has_local_data(&store));
}

#[tokio::test]
async fn test_missing_user_boards_abort_before_any_create() {
    let repo = FakeRepository::with_boards(vec![board("home", "Home", Vec::new())]);
    let store = store_with(&[(HOME_KEY, r#"[{"id": 1}]"#)]);

    let err = migrate_local_tasks(&repo, &store).await.unwrap_err();

    assert_eq!(err, SyncError::UnknownBoard("Work".to_string()));
    assert_eq!(repo.count(Op::CreateTask), 0);
    assert!(has_local_data(&store));
}

#[tokio::test]
async fn test_nothing_to_migrate_makes_no_calls() {
    let repo = user_boards();

    let report = migrate_local_tasks(&repo, &MemoryLocalStore::new()).await.unwrap();

    assert_eq!(report, MigrationReport::default());
    assert_eq!(repo.calls(), Vec::<Call>::new());
}
