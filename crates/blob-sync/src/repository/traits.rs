//! Repository Layer - Core Trait
//!
//! Abstract interface for the remote task store. The synchronizer only ever
//! talks to this trait, so tests can swap in a scripted store.

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::model::{Board, NewTask, Task, TaskPatch, User};

/// Remote CRUD over boards and tasks
///
/// Every method either returns the parsed payload or an error; nothing is
/// swallowed. Futures are not `Send`: the client runs on a single thread.
#[async_trait(?Send)]
pub trait TaskRepository {
    /// All boards of the current user, tasks nested
    async fn list_boards(&self) -> SyncResult<Vec<Board>>;

    async fn create_board(&self, name: &str) -> SyncResult<Board>;

    async fn list_tasks(&self, board_id: &str) -> SyncResult<Vec<Task>>;

    async fn create_task(&self, task: &NewTask) -> SyncResult<Task>;

    /// Partial update; returns the stored task
    async fn update_task(&self, id: &str, patch: &TaskPatch) -> SyncResult<Task>;

    async fn delete_task(&self, id: &str) -> SyncResult<()>;

    /// `None` when the identity has no user record yet
    async fn current_user(&self) -> SyncResult<Option<User>>;

    /// Create or update the user record, seeding default boards on creation
    async fn ensure_user(&self, username: &str, email: &str) -> SyncResult<User>;
}
