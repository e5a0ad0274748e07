//! Local Fallback Store & Migration
//!
//! Older builds kept each board's blobs as a JSON array in browser storage.
//! This module reads that data leniently and moves it into the remote store
//! once the user is signed in.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{SyncError, SyncResult};
use crate::model::{NewTask, DEFAULT_TASK_SIZE};
use crate::repository::TaskRepository;

pub const HOME_KEY: &str = "circles-home";
pub const WORK_KEY: &str = "circles-work";
/// Pre-board storage; treated as Home data
pub const LEGACY_KEY: &str = "circles";
/// Last selected board name
pub const CONTEXT_KEY: &str = "blobby-current-context";

/// Minimal key-value storage, shaped like the browser's `localStorage`
pub trait LocalTaskStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory `LocalTaskStore`
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl LocalTaskStore for MemoryLocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.borrow_mut().remove(key);
    }
}

/// Storage key for a board name, if that board ever had local data
pub fn storage_key(board_name: &str) -> Option<&'static str> {
    match board_name {
        "Home" => Some(HOME_KEY),
        "Work" => Some(WORK_KEY),
        _ => None,
    }
}

/// A blob as older builds stored it. Every field may be missing or mistyped.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyTask {
    pub id: String,
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Deserialize)]
struct RawLegacyTask {
    #[serde(default)]
    id: Value,
    #[serde(default)]
    label: Value,
    #[serde(default)]
    x: Value,
    #[serde(default)]
    y: Value,
    #[serde(default)]
    size: Value,
}

impl From<RawLegacyTask> for LegacyTask {
    fn from(raw: RawLegacyTask) -> Self {
        let id = match raw.id {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        };
        let number = |v: &Value| v.as_f64().filter(|n| *n != 0.0);
        Self {
            id,
            label: raw.label.as_str().unwrap_or_default().to_string(),
            x: number(&raw.x).unwrap_or(0.0),
            y: number(&raw.y).unwrap_or(0.0),
            size: number(&raw.size).unwrap_or(DEFAULT_TASK_SIZE),
        }
    }
}

/// Parse a stored array; anything unreadable counts as no data.
pub fn parse_legacy_tasks(raw: &str) -> Vec<LegacyTask> {
    match serde_json::from_str::<Vec<RawLegacyTask>>(raw) {
        Ok(tasks) => tasks.into_iter().map(LegacyTask::from).collect(),
        Err(e) => {
            log::warn!("[MIGRATE] Ignoring unreadable local data: {}", e);
            Vec::new()
        }
    }
}

/// Local blobs for a board name (`Home` also reads the legacy key)
pub fn load_local_tasks(store: &dyn LocalTaskStore, board_name: &str) -> Vec<LegacyTask> {
    let Some(key) = storage_key(board_name) else {
        return Vec::new();
    };
    let raw = store
        .get(key)
        .or_else(|| (key == HOME_KEY).then(|| store.get(LEGACY_KEY)).flatten());
    raw.map(|raw| parse_legacy_tasks(&raw)).unwrap_or_default()
}

pub fn has_local_data(store: &dyn LocalTaskStore) -> bool {
    [HOME_KEY, WORK_KEY, LEGACY_KEY]
        .iter()
        .any(|key| store.get(key).is_some_and(|v| !v.is_empty()))
}

pub fn clear_local_data(store: &dyn LocalTaskStore) {
    for key in [HOME_KEY, WORK_KEY, LEGACY_KEY, CONTEXT_KEY] {
        store.remove(key);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub migrated: usize,
    pub failed: usize,
}

/// Create every local blob in the matching remote board.
///
/// Individual create failures are counted, not fatal. Local data is cleared
/// only when at least one blob made it across.
pub async fn migrate_local_tasks<R>(repo: &R, store: &dyn LocalTaskStore) -> SyncResult<MigrationReport>
where
    R: TaskRepository + ?Sized,
{
    let home = load_local_tasks(store, "Home");
    let work = load_local_tasks(store, "Work");
    if home.is_empty() && work.is_empty() {
        log::info!("[MIGRATE] No local data found to migrate");
        return Ok(MigrationReport::default());
    }

    let boards = repo.list_boards().await?;
    let board_id = |name: &str| {
        boards
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.id.clone())
            .ok_or_else(|| SyncError::UnknownBoard(name.to_string()))
    };
    let home_id = board_id("Home")?;
    let work_id = board_id("Work")?;

    let mut report = MigrationReport::default();
    for (board_id, tasks) in [(&home_id, home), (&work_id, work)] {
        for task in tasks {
            let new_task = NewTask {
                board_id: board_id.clone(),
                label: task.label,
                x: task.x,
                y: task.y,
                size: Some(task.size),
            };
            match repo.create_task(&new_task).await {
                Ok(_) => report.migrated += 1,
                Err(e) => {
                    log::warn!("[MIGRATE] Could not migrate task {}: {}", task.id, e);
                    report.failed += 1;
                }
            }
        }
    }

    if report.migrated > 0 {
        clear_local_data(store);
    }
    log::info!("[MIGRATE] Migrated {} tasks, {} failed", report.migrated, report.failed);
    Ok(report)
}
