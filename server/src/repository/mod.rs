//! Repository Layer
//!
//! Data access abstractions and their SQLite implementations.

mod board_repo;
mod db;
mod task_repo;
mod traits;
mod user_repo;

#[cfg(test)]
mod tests;

use std::path::Path;
use std::sync::Arc;

use rusqlite::Connection;
use tokio::sync::Mutex;

use crate::domain::DomainResult;

pub use board_repo::BoardRepository;
pub use db::{open_db, open_in_memory, Db};
pub use task_repo::TaskRepository;
pub use traits::{OwnedRepository, Repository};
pub use user_repo::UserRepository;

/// All repositories over one shared connection
#[derive(Clone)]
pub struct Store {
    pub users: UserRepository,
    pub boards: BoardRepository,
    pub tasks: TaskRepository,
}

impl Store {
    pub fn open(path: &Path) -> DomainResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn in_memory() -> DomainResult<Self> {
        Ok(Self::from_connection(open_in_memory()?))
    }

    fn from_connection(conn: Connection) -> Self {
        let db: Db = Arc::new(Mutex::new(conn));
        Self {
            users: UserRepository::new(db.clone()),
            boards: BoardRepository::new(db.clone()),
            tasks: TaskRepository::new(db),
        }
    }
}
