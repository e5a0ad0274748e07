//! Board Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::required;
use crate::auth::Identity;
use crate::domain::Board;
use crate::error::ApiResult;
use crate::repository::Repository;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateBoardBody {
    name: Option<String>,
}

/// Caller's boards by name, tasks nested
pub async fn list_boards(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> ApiResult<Json<Value>> {
    let boards = state.store()?.boards.list_for_user(&user_id).await?;
    Ok(Json(json!({ "boards": boards })))
}

pub async fn create_board(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    payload: Result<Json<CreateBoardBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let store = state.store()?;
    let Json(body) = payload?;
    let name = required(body.name, "Board name required")?;

    let board = store.boards.create(&Board::new(user_id, name)).await?;
    Ok(Json(json!({ "board": board })))
}
