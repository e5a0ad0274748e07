//! Board Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{now, Entity};
use super::task::Task;

/// Boards every new user starts with
pub const DEFAULT_BOARD_NAMES: [&str; 2] = ["Home", "Work"];

/// Named group of tasks owned by one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Filled when listed with tasks, ordered by creation
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Board {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            name: name.into(),
            created_at: now(),
            tasks: Vec::new(),
        }
    }
}

impl Entity for Board {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}
