//! Task Routes
//!
//! `/tasks`: list by board, create, partial update, delete by id.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::required;
use crate::auth::Identity;
use crate::domain::{Task, TaskChanges, DEFAULT_TASK_SIZE};
use crate::error::{ApiError, ApiResult};
use crate::repository::{OwnedRepository, Repository};
use crate::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardQuery {
    board_id: Option<String>,
}

#[derive(Deserialize)]
pub struct TaskIdQuery {
    id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    board_id: Option<String>,
    #[serde(default)]
    label: String,
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
    size: Option<f64>,
}

#[derive(Deserialize)]
pub struct UpdateTaskBody {
    id: Option<String>,
    #[serde(flatten)]
    changes: TaskChanges,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Query(query): Query<BoardQuery>,
) -> ApiResult<Json<Value>> {
    let store = state.store()?;
    let board_id = required(query.board_id, "Board ID required")?;

    store
        .boards
        .find_owned(&board_id, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    let tasks = store.tasks.list_by_board(&board_id).await?;
    Ok(Json(json!({ "tasks": tasks })))
}

pub async fn create_task(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    payload: Result<Json<CreateTaskBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let store = state.store()?;
    let Json(body) = payload?;
    let board_id = required(body.board_id, "Board ID required")?;

    store
        .boards
        .find_owned(&board_id, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Board not found".to_string()))?;

    let size = body.size.unwrap_or(DEFAULT_TASK_SIZE);
    let task = store
        .tasks
        .create(&Task::new(board_id, body.label, body.x, body.y, size))
        .await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn update_task(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    payload: Result<Json<UpdateTaskBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let store = state.store()?;
    let Json(body) = payload?;
    let id = required(body.id, "Task ID required")?;

    let mut task = store
        .tasks
        .find_owned(&id, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    task.apply(&body.changes);
    let task = store.tasks.update(&task).await?;
    Ok(Json(json!({ "task": task })))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    Query(query): Query<TaskIdQuery>,
) -> ApiResult<Json<Value>> {
    let store = state.store()?;
    let id = required(query.id, "Task ID required")?;

    store
        .tasks
        .find_owned(&id, &user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    store.tasks.delete(&id).await?;
    Ok(Json(json!({ "success": true })))
}
