//! Client Models
//!
//! Data structures matching the store's wire format, plus the tagged task
//! identity used while a task has not been acknowledged yet.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Diameter the store assigns when a create call carries no size.
pub const DEFAULT_TASK_SIZE: f64 = 100.0;

/// Boards every user starts with.
pub const DEFAULT_BOARD_NAMES: [&str; 2] = ["Home", "Work"];

/// Prefix used when rendering temporary ids.
pub const TEMP_ID_PREFIX: &str = "tmp-";

pub type BoardId = String;

/// Identity of a task on the client.
///
/// `Temporary` ids are issued locally and never leave the client; the store
/// only ever sees and returns `Persisted` ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskId {
    Temporary(u64),
    Persisted(String),
}

impl TaskId {
    pub fn persisted(id: impl Into<String>) -> Self {
        TaskId::Persisted(id.into())
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, TaskId::Temporary(_))
    }

    /// Store id, if this task has been acknowledged.
    pub fn as_persisted(&self) -> Option<&str> {
        match self {
            TaskId::Persisted(id) => Some(id),
            TaskId::Temporary(_) => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Temporary(n) => write!(f, "{}{}", TEMP_ID_PREFIX, n),
            TaskId::Persisted(id) => f.write_str(id),
        }
    }
}

impl Serialize for TaskId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// Anything arriving from the outside world is a store id.
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(TaskId::Persisted)
    }
}

/// A positioned, labeled, circular task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default = "default_size")]
    pub size: f64,
}

fn default_size() -> f64 {
    DEFAULT_TASK_SIZE
}

impl Task {
    pub fn new(id: TaskId, label: impl Into<String>, x: f64, y: f64, size: f64) -> Self {
        Self {
            id,
            label: label.into(),
            x,
            y,
            size,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_temporary()
    }
}

/// Board data structure (matches store), tasks nested when listed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tasks: Vec<Task>,
}

impl Board {
    pub fn summary(&self) -> BoardSummary {
        BoardSummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Board without its tasks, used for tabs and lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSummary {
    pub id: BoardId,
    pub name: String,
}

/// Current user as returned by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub boards: Vec<Board>,
}

/// Body of a create-task call
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub board_id: BoardId,
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl NewTask {
    pub fn from_task(board_id: &str, task: &Task) -> Self {
        Self {
            board_id: board_id.to_string(),
            label: task.label.clone(),
            x: task.x,
            y: task.y,
            size: Some(task.size),
        }
    }
}

/// Partial update; only present fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl TaskPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Default::default()
        }
    }

    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Default::default()
        }
    }
}

/// Empty deployments answer with `null` where a list is expected.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temporary_ids_render_with_prefix() {
        assert_eq!(TaskId::Temporary(7).to_string(), "tmp-7");
        assert_eq!(TaskId::persisted("abc").to_string(), "abc");
        assert!(TaskId::Temporary(1).is_temporary());
        assert_eq!(TaskId::persisted("abc").as_persisted(), Some("abc"));
        assert_eq!(TaskId::Temporary(1).as_persisted(), None);
    }

    #[test]
    fn test_store_task_parses_ignoring_extra_fields() {
        let json = r#"{"id":"t1","boardId":"b1","label":"A","x":1.5,"y":-2,"createdAt":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::persisted("t1"));
        assert_eq!(task.size, DEFAULT_TASK_SIZE);
        assert_eq!(task.y, -2.0);
    }

    #[test]
    fn test_board_with_null_tasks_is_empty() {
        let board: Board = serde_json::from_str(r#"{"id":"b1","name":"Home","tasks":null}"#).unwrap();
        assert!(board.tasks.is_empty());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let json = serde_json::to_value(TaskPatch::position(3.0, 4.0)).unwrap();
        assert_eq!(json, serde_json::json!({"x": 3.0, "y": 4.0}));
    }

    #[test]
    fn test_new_task_uses_camel_case() {
        let task = Task::new(TaskId::Temporary(1), "Ship it", 10.0, 10.0, 100.0);
        let json = serde_json::to_value(NewTask::from_task("b1", &task)).unwrap();
        assert_eq!(json["boardId"], "b1");
        assert_eq!(json["size"], 100.0);
    }
}
