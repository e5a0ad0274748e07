//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The synchronizer
//! owns the truth; this store mirrors its latest snapshot for rendering.

use blob_sync::{BoardSummary, SyncNotice, SyncSnapshot, Task, TaskId};
use leptos::prelude::*;
use reactive_stores::Store;

/// What the label prompt is currently asking for
#[derive(Clone, Debug, PartialEq)]
pub enum LabelPrompt {
    /// Rename an existing blob
    Rename { id: TaskId, current: String },
    /// Name a freshly created blob before it is saved
    Create { id: TaskId, current: String },
}

impl LabelPrompt {
    pub fn id(&self) -> &TaskId {
        match self {
            LabelPrompt::Rename { id, .. } | LabelPrompt::Create { id, .. } => id,
        }
    }

    pub fn current(&self) -> &str {
        match self {
            LabelPrompt::Rename { current, .. } | LabelPrompt::Create { current, .. } => current,
        }
    }
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    pub boards: Vec<BoardSummary>,
    pub active_board: Option<String>,
    /// Blobs of the active board, in display order
    pub tasks: Vec<Task>,
    pub notice: Option<SyncNotice>,
    pub signed_out: bool,
    /// First load finished
    pub loaded: bool,
    /// Legacy browser data waiting to be imported
    pub migration_available: bool,
    pub prompt: Option<LabelPrompt>,
}

impl AppState {
    pub fn new(signed_out: bool) -> Self {
        Self {
            signed_out,
            ..Default::default()
        }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Mirror a synchronizer snapshot into the store
pub fn store_apply_snapshot(store: &AppStore, snapshot: &SyncSnapshot) {
    store.boards().set(snapshot.boards.clone());
    store.active_board().set(snapshot.active_board.clone());
    store.tasks().set(snapshot.tasks.clone());
    store.notice().set(snapshot.notice.clone());
    store.signed_out().set(snapshot.signed_out);

    // A prompt for a blob that no longer exists has nothing left to edit
    let stale = store
        .prompt()
        .with_untracked(|prompt| prompt.as_ref().is_some_and(|p| !snapshot.tasks.iter().any(|t| &t.id == p.id())));
    if stale {
        store.prompt().set(None);
    }
}

/// Look up a blob of the active board by id
pub fn store_find_task(store: &AppStore, id: &TaskId) -> Option<Task> {
    store
        .tasks()
        .with_untracked(|tasks| tasks.iter().find(|t| &t.id == id).cloned())
}
