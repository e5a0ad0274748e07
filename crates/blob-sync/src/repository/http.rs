//! HTTP Task Repository
//!
//! `TaskRepository` over the store's REST surface.

use std::cell::RefCell;
use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::{FutureExt, LocalBoxFuture, Shared};
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::traits::TaskRepository;
use crate::config::ClientConfig;
use crate::error::{SyncError, SyncResult};
use crate::model::{Board, NewTask, Task, TaskPatch, User};

type SharedRequest = Shared<LocalBoxFuture<'static, SyncResult<String>>>;

// ========================
// Request / Response Bodies
// ========================

#[derive(Serialize)]
struct CreateBoardBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct UpdateTaskBody<'a> {
    id: &'a str,
    #[serde(flatten)]
    patch: &'a TaskPatch,
}

#[derive(Serialize)]
struct EnsureUserBody<'a> {
    username: &'a str,
    email: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

// ========================
// Repository
// ========================

/// REST client for the task store
///
/// Owns a request deduplication map: identical GETs issued while one is still
/// in flight share its response. Entries live only until the request settles.
pub struct HttpTaskRepository {
    client: Client,
    config: ClientConfig,
    in_flight: RefCell<HashMap<String, SharedRequest>>,
}

impl HttpTaskRepository {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ClientConfig) -> Self {
        Self {
            client,
            config,
            in_flight: RefCell::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Number of GETs currently shared through the dedup map
    pub fn in_flight_requests(&self) -> usize {
        self.in_flight.borrow().len()
    }

    /// Forget all in-flight entries; callers already awaiting keep their result.
    pub fn reset(&self) {
        self.in_flight.borrow_mut().clear();
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.api_root(), path);
        let builder = self.client.request(method, url);
        match &self.config.token {
            Some(token) => builder.header(AUTHORIZATION, format!("Bearer {}", token)),
            None => builder,
        }
    }

    /// Deduplicated GET returning the raw body
    async fn get(&self, path: &str, query: &[(&str, &str)]) -> SyncResult<String> {
        let key = cache_key(path, query);
        let shared = {
            let mut in_flight = self.in_flight.borrow_mut();
            match in_flight.get(&key) {
                Some(existing) => {
                    log::debug!("[REPO] Joining in-flight GET {}", key);
                    existing.clone()
                }
                None => {
                    let request = send(self.request(Method::GET, path).query(query))
                        .boxed_local()
                        .shared();
                    in_flight.insert(key.clone(), request.clone());
                    request
                }
            }
        };

        let result = shared.clone().await;

        let mut in_flight = self.in_flight.borrow_mut();
        if in_flight.get(&key).is_some_and(|current| current.ptr_eq(&shared)) {
            in_flight.remove(&key);
        }
        result
    }
}

#[async_trait(?Send)]
impl TaskRepository for HttpTaskRepository {
    async fn list_boards(&self) -> SyncResult<Vec<Board>> {
        let body = self.get("/boards", &[]).await?;
        collection(&body, "boards")
    }

    async fn create_board(&self, name: &str) -> SyncResult<Board> {
        let body = send(self.request(Method::POST, "/boards").json(&CreateBoardBody { name })).await?;
        required(&body, "board")
    }

    async fn list_tasks(&self, board_id: &str) -> SyncResult<Vec<Task>> {
        let body = self.get("/tasks", &[("boardId", board_id)]).await?;
        collection(&body, "tasks")
    }

    async fn create_task(&self, task: &NewTask) -> SyncResult<Task> {
        let body = send(self.request(Method::POST, "/tasks").json(task)).await?;
        required(&body, "task")
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> SyncResult<Task> {
        let body = send(self.request(Method::PUT, "/tasks").json(&UpdateTaskBody { id, patch })).await?;
        required(&body, "task")
    }

    async fn delete_task(&self, id: &str) -> SyncResult<()> {
        send(self.request(Method::DELETE, "/tasks").query(&[("id", id)])).await?;
        Ok(())
    }

    async fn current_user(&self) -> SyncResult<Option<User>> {
        let body = self.get("/user", &[]).await?;
        optional(&body, "user")
    }

    async fn ensure_user(&self, username: &str, email: &str) -> SyncResult<User> {
        let body = send(self.request(Method::POST, "/user").json(&EnsureUserBody { username, email })).await?;
        required(&body, "user")
    }
}

// ========================
// Helpers
// ========================

async fn send(builder: RequestBuilder) -> SyncResult<String> {
    let response = builder.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        return Ok(body);
    }

    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|b| b.error)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Request failed").to_string());
    log::warn!("[REPO] Request failed with {}: {}", status, message);
    Err(SyncError::from_status(status.as_u16(), message))
}

fn cache_key(path: &str, query: &[(&str, &str)]) -> String {
    let mut key = path.to_string();
    for (i, (name, value)) in query.iter().enumerate() {
        key.push(if i == 0 { '?' } else { '&' });
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

/// Envelope field, `None` when missing or `null`
fn optional<T: DeserializeOwned>(body: &str, field: &'static str) -> SyncResult<Option<T>> {
    let mut envelope: Value = serde_json::from_str(body)?;
    match envelope.get_mut(field).map(Value::take) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
    }
}

fn required<T: DeserializeOwned>(body: &str, field: &'static str) -> SyncResult<T> {
    optional(body, field)?.ok_or(SyncError::MissingPayload(field))
}

fn collection<T: DeserializeOwned>(body: &str, field: &'static str) -> SyncResult<Vec<T>> {
    Ok(optional(body, field)?.unwrap_or_default())
}
