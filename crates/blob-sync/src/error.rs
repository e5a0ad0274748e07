//! Sync Errors
//!
//! Everything the repository or the synchronizer can fail with, grouped into
//! the four kinds the UI cares about.

use thiserror::Error;

use crate::model::TaskId;

pub type SyncResult<T> = Result<T, SyncError>;

/// How a failure should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No identity; render the signed-out view
    Unauthenticated,
    /// Resource missing or owned by someone else
    NotFound,
    /// Missing or invalid input
    Validation,
    /// Network failure, server error or unreadable response
    Transient,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SyncError {
    #[error("Not signed in")]
    Unauthenticated,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Response carried no {0}")]
    MissingPayload(&'static str),

    #[error("Unknown task {0}")]
    UnknownTask(TaskId),

    #[error("Task {0} is not waiting for a label")]
    NotAwaitingLabel(TaskId),

    #[error("No active board")]
    NoActiveBoard,

    #[error("Unknown board {0}")]
    UnknownBoard(String),
}

impl SyncError {
    /// Map a non-success HTTP status and its `{ error }` message.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => SyncError::Validation(message),
            401 => SyncError::Unauthenticated,
            404 => SyncError::NotFound(message),
            _ => SyncError::Server { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SyncError::Unauthenticated => ErrorKind::Unauthenticated,
            SyncError::NotFound(_) | SyncError::UnknownBoard(_) => ErrorKind::NotFound,
            SyncError::Validation(_)
            | SyncError::UnknownTask(_)
            | SyncError::NotAwaitingLabel(_)
            | SyncError::NoActiveBoard => ErrorKind::Validation,
            SyncError::Server { .. }
            | SyncError::Transport(_)
            | SyncError::Decode(_)
            | SyncError::MissingPayload(_) => ErrorKind::Transient,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        self.kind() == ErrorKind::Unauthenticated
    }
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            SyncError::Decode(e.to_string())
        } else {
            SyncError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Decode(e.to_string())
    }
}
