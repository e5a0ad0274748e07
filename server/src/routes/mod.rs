//! Routes Layer
//!
//! HTTP handlers that bridge the REST surface to the repositories.

mod board_routes;
mod task_routes;
mod user_routes;

pub use board_routes::*;
pub use task_routes::*;
pub use user_routes::*;

use crate::error::{ApiError, ApiResult};

/// Present and non-blank, or 400 with `message`
fn required(value: Option<String>, message: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}
