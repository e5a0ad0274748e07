//! User Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::board::Board;

/// Identity owning boards; the id is the bearer identity itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub boards: Vec<Board>,
}
