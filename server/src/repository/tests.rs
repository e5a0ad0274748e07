//! Repository Integration Tests
//!
//! Store behaviour against in-memory and on-disk SQLite.

#[cfg(test)]
mod tests {
    use crate::domain::{Board, DomainError, Task, TaskChanges, DEFAULT_TASK_SIZE};
    use crate::repository::{OwnedRepository, Repository, Store};

    async fn setup_test_db() -> Store {
        Store::in_memory().expect("Failed to init test DB")
    }

    async fn user_with_boards(store: &Store, user_id: &str) -> (String, String) {
        let user = store.users.upsert(user_id, Some(user_id), None).await.unwrap();
        let home = user.boards.iter().find(|b| b.name == "Home").unwrap().id.clone();
        let work = user.boards.iter().find(|b| b.name == "Work").unwrap().id.clone();
        (home, work)
    }

    #[tokio::test]
    async fn test_new_user_gets_default_boards() {
        let store = setup_test_db().await;

        let user = store.users.upsert("u1", Some("ada"), Some("ada@example.com")).await.unwrap();

        let names: Vec<_> = user.boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Work"]);
        assert_eq!(user.username.as_deref(), Some("ada"));
    }

    #[tokio::test]
    async fn test_upsert_updates_without_new_boards() {
        let store = setup_test_db().await;
        store.users.upsert("u1", Some("ada"), Some("ada@example.com")).await.unwrap();

        let user = store.users.upsert("u1", Some("lovelace"), None).await.unwrap();

        assert_eq!(user.username.as_deref(), Some("lovelace"));
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(user.boards.len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_user_is_none() {
        let store = setup_test_db().await;
        assert!(store.users.find_with_boards("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_tasks_listed_in_creation_order() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "u1").await;

        for label in ["first", "second", "third"] {
            store
                .tasks
                .create(&Task::new(home.clone(), label, 0.0, 0.0, DEFAULT_TASK_SIZE))
                .await
                .unwrap();
        }

        let labels: Vec<_> = store
            .tasks
            .list_by_board(&home)
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_created_task_reads_back_unchanged() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "u1").await;
        let created = store
            .tasks
            .create(&Task::new(home.clone(), "A", 0.0, 0.0, DEFAULT_TASK_SIZE))
            .await
            .unwrap();

        assert_eq!(store.tasks.find_by_id(&created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(store.tasks.list_by_board(&home).await.unwrap(), vec![created]);
    }

    #[tokio::test]
    async fn test_update_task() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "u1").await;
        let mut task = store
            .tasks
            .create(&Task::new(home, "A", 0.0, 0.0, DEFAULT_TASK_SIZE))
            .await
            .unwrap();

        task.apply(&TaskChanges {
            x: Some(50.0),
            y: Some(75.0),
            ..Default::default()
        });
        store.tasks.update(&task).await.expect("Update failed");

        let found = store.tasks.find_by_id(&task.id).await.unwrap().unwrap();
        assert_eq!((found.label.as_str(), found.x, found.y), ("A", 50.0, 75.0));
    }

    #[tokio::test]
    async fn test_delete_task() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "u1").await;
        let task = store
            .tasks
            .create(&Task::new(home, "To delete", 0.0, 0.0, DEFAULT_TASK_SIZE))
            .await
            .unwrap();

        store.tasks.delete(&task.id).await.expect("Delete failed");

        assert!(store.tasks.find_by_id(&task.id).await.unwrap().is_none());
        assert!(matches!(
            store.tasks.delete(&task.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_ownership_hides_other_users_data() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "owner").await;
        user_with_boards(&store, "intruder").await;
        let task = store
            .tasks
            .create(&Task::new(home.clone(), "Mine", 0.0, 0.0, DEFAULT_TASK_SIZE))
            .await
            .unwrap();

        assert!(store.boards.find_owned(&home, "owner").await.unwrap().is_some());
        assert!(store.boards.find_owned(&home, "intruder").await.unwrap().is_none());
        assert!(store.tasks.find_owned(&task.id, "intruder").await.unwrap().is_none());
        assert_eq!(
            store.tasks.find_owned(&task.id, "owner").await.unwrap(),
            Some(task)
        );
    }

    #[tokio::test]
    async fn test_boards_listed_by_name_with_tasks() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "u1").await;
        store.boards.create(&Board::new("u1", "Garden")).await.unwrap();
        store
            .tasks
            .create(&Task::new(home, "Nested", 0.0, 0.0, DEFAULT_TASK_SIZE))
            .await
            .unwrap();

        let boards = store.boards.list_for_user("u1").await.unwrap();

        let names: Vec<_> = boards.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Garden", "Home", "Work"]);
        assert_eq!(boards[1].tasks.len(), 1);
    }

    #[tokio::test]
    async fn test_board_requires_existing_user_and_name() {
        let store = setup_test_db().await;

        assert!(matches!(
            store.boards.create(&Board::new("ghost", "Home")).await,
            Err(DomainError::NotFound(_))
        ));
        user_with_boards(&store, "u1").await;
        assert!(matches!(
            store.boards.create(&Board::new("u1", "  ")).await,
            Err(DomainError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_rename_and_delete_board_cascades() {
        let store = setup_test_db().await;
        let (home, _) = user_with_boards(&store, "u1").await;
        let task = store
            .tasks
            .create(&Task::new(home.clone(), "Gone", 0.0, 0.0, DEFAULT_TASK_SIZE))
            .await
            .unwrap();

        let mut board = store.boards.find_by_id(&home).await.unwrap().unwrap();
        board.name = "House".to_string();
        store.boards.update(&board).await.unwrap();
        assert_eq!(
            store.boards.find_by_id(&home).await.unwrap().unwrap().name,
            "House"
        );

        store.boards.delete(&home).await.unwrap();
        assert!(store.tasks.find_by_id(&task.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_on_disk_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blobby.db");
        {
            let store = Store::open(&path).unwrap();
            store.users.upsert("u1", None, None).await.unwrap();
        }

        let reopened = Store::open(&path).unwrap();
        let user = reopened.users.find_with_boards("u1").await.unwrap().unwrap();
        assert_eq!(user.boards.len(), 2);
    }
}
