//! User Routes

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::Identity;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Deserialize)]
pub struct UpsertUserBody {
    username: Option<String>,
    email: Option<String>,
}

/// `{ user: null }` until the first upsert
pub async fn get_user(
    State(state): State<AppState>,
    Identity(user_id): Identity,
) -> ApiResult<Json<Value>> {
    let user = state.store()?.users.find_with_boards(&user_id).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn upsert_user(
    State(state): State<AppState>,
    Identity(user_id): Identity,
    payload: Result<Json<UpsertUserBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let store = state.store()?;
    let Json(body) = payload?;

    let user = store
        .users
        .upsert(&user_id, body.username.as_deref(), body.email.as_deref())
        .await?;
    Ok(Json(json!({ "user": user })))
}
