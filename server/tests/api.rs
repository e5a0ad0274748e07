//! REST surface tests driven through the router with `oneshot`.

use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use blobby_server::{config::Config, repository::Store, router, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let store = Store::in_memory().expect("Failed to init test DB");
    router(AppState::with_store(Config::default(), Some(store)))
}

async fn call(app: &Router, method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(AUTHORIZATION, format!("Bearer {user}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Sign up `user` and return the id of the named board
async fn board_id(app: &Router, user: &str, name: &str) -> String {
    let (status, body) = call(app, Method::POST, "/api/user", Some(user), Some(json!({ "username": user, "email": format!("{user}@example.com") }))).await;
    assert_eq!(status, StatusCode::OK);
    body["user"]["boards"]
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["name"] == name)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_task(app: &Router, user: &str, board: &str, label: &str) -> Value {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/tasks",
        Some(user),
        Some(json!({ "boardId": board, "label": label, "x": 10, "y": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["task"].clone()
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = app();

    let (status, body) = call(&app, Method::GET, "/api/boards", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Unauthorized" }));

    let (status, _) = call(&app, Method::GET, "/api/tasks?boardId=x", Some(" "), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_user_upsert_seeds_default_boards_once() {
    let app = app();

    let (_, body) = call(&app, Method::GET, "/api/user", Some("u1"), None).await;
    assert_eq!(body, json!({ "user": null }));

    board_id(&app, "u1", "Home").await;
    let (status, body) = call(&app, Method::POST, "/api/user", Some("u1"), Some(json!({ "username": "renamed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "renamed");
    assert_eq!(body["user"]["email"], "u1@example.com");
    assert_eq!(body["user"]["boards"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_boards_listed_by_name_with_nested_tasks() {
    let app = app();
    let home = board_id(&app, "u1", "Home").await;
    create_task(&app, "u1", &home, "A").await;

    let (status, body) = call(&app, Method::POST, "/api/boards", Some("u1"), Some(json!({ "name": "Errands" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["board"]["name"], "Errands");
    assert_eq!(body["board"]["tasks"], json!([]));

    let (_, body) = call(&app, Method::GET, "/api/boards", Some("u1"), None).await;
    let boards = body["boards"].as_array().unwrap();
    let names: Vec<_> = boards.iter().map(|b| b["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Errands", "Home", "Work"]);
    assert_eq!(boards[1]["tasks"][0]["label"], "A");
}

#[tokio::test]
async fn test_task_lifecycle() {
    let app = app();
    let home = board_id(&app, "u1", "Home").await;

    let first = create_task(&app, "u1", &home, "First").await;
    create_task(&app, "u1", &home, "Second").await;
    assert_eq!(first["size"], 100.0);
    assert_eq!(first["boardId"], home.as_str());
    let id = first["id"].as_str().unwrap().to_string();

    let (status, body) = call(&app, Method::PUT, "/api/tasks", Some("u1"), Some(json!({ "id": id, "x": 50, "y": 75 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["label"], "First");
    assert_eq!((body["task"]["x"].as_f64(), body["task"]["y"].as_f64()), (Some(50.0), Some(75.0)));

    let (_, body) = call(&app, Method::GET, &format!("/api/tasks?boardId={home}"), Some("u1"), None).await;
    let labels: Vec<_> = body["tasks"].as_array().unwrap().iter().map(|t| t["label"].as_str().unwrap()).collect();
    assert_eq!(labels, vec!["First", "Second"]);

    let (status, body) = call(&app, Method::DELETE, &format!("/api/tasks?id={id}"), Some("u1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));

    let (status, body) = call(&app, Method::DELETE, &format!("/api/tasks?id={id}"), Some("u1"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Task not found" }));
}

#[tokio::test]
async fn test_created_task_matches_later_reads() {
    let app = app();
    let home = board_id(&app, "u1", "Home").await;

    let created = create_task(&app, "u1", &home, "Stable").await;

    let (_, body) = call(&app, Method::GET, &format!("/api/tasks?boardId={home}"), Some("u1"), None).await;
    assert_eq!(body["tasks"][0], created);
}

#[tokio::test]
async fn test_other_users_data_is_not_found() {
    let app = app();
    let home = board_id(&app, "owner", "Home").await;
    board_id(&app, "intruder", "Home").await;
    let task = create_task(&app, "owner", &home, "Private").await;
    let id = task["id"].as_str().unwrap();

    let (status, body) = call(&app, Method::GET, &format!("/api/tasks?boardId={home}"), Some("intruder"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Board not found" }));

    let (status, _) = call(&app, Method::POST, "/api/tasks", Some("intruder"), Some(json!({ "boardId": home, "label": "X", "x": 0, "y": 0 }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::PUT, "/api/tasks", Some("intruder"), Some(json!({ "id": id, "label": "Mine now" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::DELETE, &format!("/api/tasks?id={id}"), Some("intruder"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = call(&app, Method::GET, &format!("/api/tasks?boardId={home}"), Some("owner"), None).await;
    assert_eq!(body["tasks"][0]["label"], "Private");
}

#[tokio::test]
async fn test_missing_ids_are_bad_requests() {
    let app = app();
    board_id(&app, "u1", "Home").await;

    let (status, body) = call(&app, Method::GET, "/api/tasks", Some("u1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Board ID required" }));

    let (status, _) = call(&app, Method::POST, "/api/tasks", Some("u1"), Some(json!({ "label": "Orphan" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&app, Method::DELETE, "/api/tasks", Some("u1"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Task ID required" }));

    let (status, body) = call(&app, Method::PUT, "/api/tasks", Some("u1"), Some(json!({ "x": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Task ID required" }));
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/tasks")
        .header(AUTHORIZATION, "Bearer u1")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_without_database_every_endpoint_is_empty() {
    let app = router(AppState::with_store(Config::default(), None));

    let (status, body) = call(&app, Method::GET, "/api/boards", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "boards": [] }));

    let (_, body) = call(&app, Method::GET, "/api/tasks?boardId=b1", None, None).await;
    assert_eq!(body, json!({ "tasks": [] }));

    let (_, body) = call(&app, Method::POST, "/api/tasks", Some("u1"), Some(json!({ "boardId": "b1" }))).await;
    assert_eq!(body, json!({ "task": null }));

    let (_, body) = call(&app, Method::DELETE, "/api/tasks?id=t1", None, None).await;
    assert_eq!(body, json!({ "success": true }));

    let (_, body) = call(&app, Method::POST, "/api/user", None, None).await;
    assert_eq!(body, json!({ "user": null }));
}

#[tokio::test]
async fn test_on_disk_database_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::default().with_database(dir.path().join("blobby.db"));
    let app = router(AppState::new(config).unwrap());

    let home = board_id(&app, "u1", "Home").await;
    create_task(&app, "u1", &home, "Durable").await;

    let reopened = router(AppState::new(Config::default().with_database(dir.path().join("blobby.db"))).unwrap());
    let (_, body) = call(&reopened, Method::GET, "/api/boards", Some("u1"), None).await;
    assert_eq!(body["boards"][0]["tasks"][0]["label"], "Durable");
}
