//! Blobby Sync Core
//!
//! Layered like the rest of the app:
//! - model: tasks, boards, users and the tagged task identity
//! - repository: remote store abstraction and its HTTP implementation
//! - synchronizer: optimistic in-memory board state with rollback
//! - migrate: one-time transfer of legacy local data into the store

pub mod config;
pub mod error;
pub mod migrate;
pub mod model;
pub mod repository;
pub mod synchronizer;

#[cfg(test)]
mod tests;

pub use config::{ClientConfig, SyncConfig};
pub use error::{ErrorKind, SyncError, SyncResult};
pub use migrate::{
    has_local_data, migrate_local_tasks, LocalTaskStore, MemoryLocalStore, MigrationReport,
};
pub use model::{Board, BoardId, BoardSummary, NewTask, Task, TaskId, TaskPatch, User};
pub use repository::{HttpTaskRepository, TaskRepository};
pub use synchronizer::{SyncNotice, SyncSnapshot, Synchronizer};
