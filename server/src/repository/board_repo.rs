//! Board Repository
//!
//! Boards are listed by name; listing can nest each board's tasks.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::db::{from_millis, to_millis, Db};
use super::task_repo::tasks_for_board;
use super::traits::{OwnedRepository, Repository};
use crate::domain::{Board, DomainError, DomainResult};

#[derive(Clone)]
pub struct BoardRepository {
    conn: Db,
}

impl BoardRepository {
    pub fn new(conn: Db) -> Self {
        Self { conn }
    }

    /// All boards of a user with their tasks
    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Board>> {
        let conn = self.conn.lock().await;
        boards_for_user(&conn, user_id, true)
    }
}

pub(super) fn boards_for_user(conn: &Connection, user_id: &str, with_tasks: bool) -> DomainResult<Vec<Board>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, created_at FROM boards WHERE user_id = ? ORDER BY name, rowid",
    )?;
    let mut boards = stmt
        .query_map(params![user_id], row_to_board)?
        .collect::<Result<Vec<_>, _>>()?;

    if with_tasks {
        for board in &mut boards {
            board.tasks = tasks_for_board(conn, &board.id)?;
        }
    }
    Ok(boards)
}

pub(super) fn insert_board(conn: &Connection, board: &Board) -> DomainResult<()> {
    conn.execute(
        "INSERT INTO boards (id, user_id, name, created_at) VALUES (?, ?, ?, ?)",
        params![board.id, board.user_id, board.name, to_millis(&board.created_at)],
    )?;
    Ok(())
}

#[async_trait]
impl Repository<Board> for BoardRepository {
    async fn create(&self, board: &Board) -> DomainResult<Board> {
        if board.name.trim().is_empty() {
            return Err(DomainError::InvalidInput("Board name required".to_string()));
        }
        let conn = self.conn.lock().await;
        let user_exists = conn
            .query_row("SELECT 1 FROM users WHERE id = ?", params![board.user_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !user_exists {
            return Err(DomainError::NotFound("User not found".to_string()));
        }

        insert_board(&conn, board)?;
        Ok(board.clone())
    }

    async fn find_by_id(&self, id: &String) -> DomainResult<Option<Board>> {
        let conn = self.conn.lock().await;
        let board = conn
            .query_row(
                "SELECT id, user_id, name, created_at FROM boards WHERE id = ?",
                params![id],
                row_to_board,
            )
            .optional()?;
        Ok(board)
    }

    /// Rename
    async fn update(&self, board: &Board) -> DomainResult<Board> {
        let conn = self.conn.lock().await;
        let changed = conn.execute(
            "UPDATE boards SET name = ? WHERE id = ?",
            params![board.name, board.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound("Board not found".to_string()));
        }
        Ok(board.clone())
    }

    /// Deletes the board's tasks with it
    async fn delete(&self, id: &String) -> DomainResult<()> {
        let conn = self.conn.lock().await;
        let changed = conn.execute("DELETE FROM boards WHERE id = ?", params![id])?;
        if changed == 0 {
            return Err(DomainError::NotFound("Board not found".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl OwnedRepository<Board> for BoardRepository {
    async fn find_owned(&self, id: &String, user_id: &str) -> DomainResult<Option<Board>> {
        let conn = self.conn.lock().await;
        let board = conn
            .query_row(
                "SELECT id, user_id, name, created_at FROM boards WHERE id = ? AND user_id = ?",
                params![id, user_id],
                row_to_board,
            )
            .optional()?;
        Ok(board)
    }
}

fn row_to_board(row: &Row) -> rusqlite::Result<Board> {
    Ok(Board {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        created_at: from_millis(row.get(3)?),
        tasks: Vec::new(),
    })
}
