//! Task Repository
//!
//! SQLite-backed task storage. Listing order is creation time, ties broken by
//! insertion order.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::db::{from_millis, to_millis, Db};
use super::traits::{OwnedRepository, Repository};
use crate::domain::{DomainError, DomainResult, Task};

#[derive(Clone)]
pub struct TaskRepository {
    conn: Db,
}

impl TaskRepository {
    pub fn new(conn: Db) -> Self {
        Self { conn }
    }

    pub async fn list_by_board(&self, board_id: &str) -> DomainResult<Vec<Task>> {
        let conn = self.conn.lock().await;
        tasks_for_board(&conn, board_id)
    }
}

pub(super) fn tasks_for_board(conn: &Connection, board_id: &str) -> DomainResult<Vec<Task>> {
    let mut stmt = conn.prepare(
        "SELECT id, board_id, label, x, y, size, created_at, updated_at
         FROM tasks WHERE board_id = ? ORDER BY created_at, rowid",
    )?;
    let tasks = stmt
        .query_map(params![board_id], row_to_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

#[async_trait]
impl Repository<Task> for TaskRepository {
    async fn create(&self, task: &Task) -> DomainResult<Task> {
        let conn = self.conn.lock().await;
        conn.execute(
            "INSERT INTO tasks (id, board_id, label, x, y, size, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                task.id,
                task.board_id,
                task.label,
                task.x,
                task.y,
                task.size,
                to_millis(&task.created_at),
                to_millis(&task.updated_at)
            ],
        )?;
        Ok(task.clone())
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Task>> {
        let conn = self.conn.lock().await;
        let task = conn
            .query_row(
                "SELECT id, board_id, label, x, y, size, created_at, updated_at FROM tasks WHERE id = ?",
                params![id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    async fn update(&self, task: &Task) -> DomainResult<Task> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE tasks SET label = ?, x = ?, y = ?, size = ?, updated_at = ? WHERE id = ?",
            params![
                task.label,
                task.x,
                task.y,
                task.size,
                to_millis(&task.updated_at),
                task.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound("Task not found".to_string()));
        }
        Ok(task.clone())
    }

    async fn delete(&self, id: &String) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM tasks WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound("Task not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OwnedRepository<Task> for TaskRepository {
    async fn find_owned(&self, id: &String, user_id: &str) -> DomainResult<Option<Task>> {
        let conn = self.conn.lock().await;
        let task = conn
            .query_row(
                "SELECT t.id, t.board_id, t.label, t.x, t.y, t.size, t.created_at, t.updated_at
                 FROM tasks t JOIN boards b ON b.id = t.board_id
                 WHERE t.id = ? AND b.user_id = ?",
                params![id, user_id],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }
}

fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        board_id: row.get(1)?,
        label: row.get(2)?,
        x: row.get(3)?,
        y: row.get(4)?,
        size: row.get(5)?,
        created_at: from_millis(row.get(6)?),
        updated_at: from_millis(row.get(7)?),
    })
}
