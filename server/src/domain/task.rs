//! Task Entity
//!
//! A labeled circle placed on a board.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::{now, Entity};

/// Diameter used when a create request carries no size
pub const DEFAULT_TASK_SIZE: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub board_id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// New task with a fresh id, timestamped now
    pub fn new(board_id: impl Into<String>, label: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        let stamp = now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            board_id: board_id.into(),
            label: label.into(),
            x,
            y,
            size,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// Apply the present fields of a partial update
    pub fn apply(&mut self, changes: &TaskChanges) {
        if let Some(label) = &changes.label {
            self.label = label.clone();
        }
        self.x = changes.x.unwrap_or(self.x);
        self.y = changes.y.unwrap_or(self.y);
        self.size = changes.size.unwrap_or(self.size);
        self.updated_at = now();
    }
}

impl Entity for Task {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }
}

/// Partial update; absent fields stay untouched
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TaskChanges {
    pub label: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub size: Option<f64>,
}
