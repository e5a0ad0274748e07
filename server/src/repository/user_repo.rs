//! User Repository
//!
//! Users are created on their first upsert, together with the default boards.

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::board_repo::{boards_for_user, insert_board};
use super::db::{from_millis, to_millis, Db};
use crate::domain::{Board, DomainError, DomainResult, User, DEFAULT_BOARD_NAMES};

#[derive(Clone)]
pub struct UserRepository {
    conn: Db,
}

impl UserRepository {
    pub fn new(conn: Db) -> Self {
        Self { conn }
    }

    /// User with boards and their tasks, `None` if never upserted
    pub async fn find_with_boards(&self, id: &str) -> DomainResult<Option<User>> {
        let conn = self.conn.lock().await;
        let Some(mut user) = find_user(&conn, id)? else {
            return Ok(None);
        };
        user.boards = boards_for_user(&conn, id, true)?;
        Ok(Some(user))
    }

    /// Create the user with `Home` and `Work`, or update the given fields.
    /// Returns the user with its boards (tasks not nested).
    pub async fn upsert(&self, id: &str, username: Option<&str>, email: Option<&str>) -> DomainResult<User> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let now = to_millis(&Utc::now());

        if find_user(&tx, id)?.is_some() {
            tx.execute(
                "UPDATE users SET username = COALESCE(?, username), email = COALESCE(?, email), updated_at = ?
                 WHERE id = ?",
                params![username, email, now, id],
            )?;
        } else {
            tx.execute(
                "INSERT INTO users (id, username, email, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
                params![id, username, email, now, now],
            )?;
            for name in DEFAULT_BOARD_NAMES {
                insert_board(&tx, &Board::new(id, name))?;
            }
            tracing::info!("Created user {id} with default boards");
        }

        let mut user = find_user(&tx, id)?
            .ok_or_else(|| DomainError::Internal("User vanished during upsert".to_string()))?;
        user.boards = boards_for_user(&tx, id, false)?;
        tx.commit()?;
        Ok(user)
    }
}

fn find_user(conn: &Connection, id: &str) -> DomainResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT id, username, email, created_at FROM users WHERE id = ?",
            params![id],
            row_to_user,
        )
        .optional()?;
    Ok(user)
}

fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        created_at: from_millis(row.get(3)?),
        boards: Vec::new(),
    })
}
