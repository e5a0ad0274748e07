//! Domain Layer
//!
//! Entities stored by the server and the errors its repositories raise.

mod board;
mod entity;
mod task;
mod user;

pub use board::{Board, DEFAULT_BOARD_NAMES};
pub use entity::{DomainError, DomainResult, Entity};
pub use task::{Task, TaskChanges, DEFAULT_TASK_SIZE};
pub use user::User;
