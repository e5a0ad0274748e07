//! Optimistic State Synchronizer
//!
//! Owns the in-memory task collection of every loaded board. Each mutation
//! applies its local change at call time, then returns a future that talks to
//! the repository and either reconciles or rolls back.
//!
//! Single-threaded: state sits in a `RefCell` and no borrow is held across an
//! `.await`, so a local phase always completes before anything else can look
//! at the collection.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;

use futures::future::join_all;

use crate::config::SyncConfig;
use crate::error::{ErrorKind, SyncError, SyncResult};
use crate::model::{Board, BoardId, BoardSummary, NewTask, Task, TaskId, TaskPatch};
use crate::repository::TaskRepository;

/// Board that gets activated after a fresh load
const PREFERRED_BOARD: &str = "Home";

/// Visible, dismissible error
#[derive(Debug, Clone, PartialEq)]
pub struct SyncNotice {
    pub id: u64,
    pub message: String,
    pub kind: ErrorKind,
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncSnapshot {
    pub boards: Vec<BoardSummary>,
    pub active_board: Option<BoardId>,
    /// Tasks of the active board, in display order
    pub tasks: Vec<Task>,
    pub notice: Option<SyncNotice>,
    /// Set once the store answered 401
    pub signed_out: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CreatePhase {
    /// Visible locally, waiting for the user to name it
    AwaitingLabel,
    /// Create call in flight
    Saving,
}

#[derive(Debug, Clone)]
struct PendingCreate {
    board_id: BoardId,
    phase: CreatePhase,
    /// Hidden by a clear that has not settled yet
    in_clear: bool,
}

/// Count one more in-flight call for a stored task
fn hold_id(counts: &mut HashMap<TaskId, usize>, id: &TaskId) {
    if id.is_temporary() {
        return;
    }
    *counts.entry(id.clone()).or_default() += 1;
}

fn release_id(counts: &mut HashMap<TaskId, usize>, id: &TaskId) {
    if let Some(n) = counts.get_mut(id) {
        *n -= 1;
        if *n == 0 {
            counts.remove(id);
        }
    }
}

#[derive(Debug, Default)]
struct SyncState {
    boards: Vec<BoardSummary>,
    active_board: Option<BoardId>,
    tasks_by_board: HashMap<BoardId, Vec<Task>>,
    pending: HashMap<u64, PendingCreate>,
    /// Stored tasks with a move or rename in flight; reloads keep the local copy
    unsettled: HashMap<TaskId, usize>,
    /// Stored tasks removed locally whose delete is in flight
    removing: HashMap<TaskId, usize>,
    /// Creates that finished while a clear of their board was in flight
    landed_in_clear: HashMap<u64, Task>,
    next_temp_id: u64,
    /// Bumped on every switch request; only the latest may activate a board
    switch_seq: u64,
    notice: Option<SyncNotice>,
    next_notice_id: u64,
    signed_out: bool,
}

impl SyncState {
    fn active_board_id(&self) -> SyncResult<BoardId> {
        self.active_board.clone().ok_or(SyncError::NoActiveBoard)
    }

    fn find_task_mut(&mut self, board_id: &str, id: &TaskId) -> Option<&mut Task> {
        self.tasks_by_board
            .get_mut(board_id)?
            .iter_mut()
            .find(|task| &task.id == id)
    }

    fn remove_task(&mut self, board_id: &str, id: &TaskId) {
        if let Some(tasks) = self.tasks_by_board.get_mut(board_id) {
            tasks.retain(|task| &task.id != id);
        }
    }

    /// Temporary tasks must still be nameable to accept local edits
    fn check_editable(&self, id: &TaskId) -> SyncResult<()> {
        match id {
            TaskId::Temporary(n) => match self.pending.get(n) {
                Some(p) if p.phase == CreatePhase::AwaitingLabel => Ok(()),
                _ => Err(SyncError::NotAwaitingLabel(id.clone())),
            },
            TaskId::Persisted(_) => Ok(()),
        }
    }

    fn record_failure(&mut self, err: &SyncError) {
        if err.is_unauthenticated() {
            self.signed_out = true;
            return;
        }
        self.next_notice_id += 1;
        self.notice = Some(SyncNotice {
            id: self.next_notice_id,
            message: err.to_string(),
            kind: err.kind(),
        });
    }

    fn snapshot(&self) -> SyncSnapshot {
        let tasks = self
            .active_board
            .as_ref()
            .and_then(|id| self.tasks_by_board.get(id))
            .cloned()
            .unwrap_or_default();
        SyncSnapshot {
            boards: self.boards.clone(),
            active_board: self.active_board.clone(),
            tasks,
            notice: self.notice.clone(),
            signed_out: self.signed_out,
        }
    }
}

type Listener = Box<dyn Fn(&SyncSnapshot)>;

/// Optimistic board state in front of a `TaskRepository`
///
/// Mutating operations take `self: &Rc<Self>` and return `'static` futures so
/// the UI can hand them straight to a local executor.
pub struct Synchronizer<R> {
    repo: R,
    config: SyncConfig,
    state: RefCell<SyncState>,
    listener: RefCell<Option<Listener>>,
}

impl<R: TaskRepository + 'static> Synchronizer<R> {
    pub fn new(repo: R, config: SyncConfig) -> Self {
        Self {
            repo,
            config,
            state: RefCell::new(SyncState {
                next_temp_id: 1,
                ..Default::default()
            }),
            listener: RefCell::new(None),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    // ========================
    // Observation
    // ========================

    /// Replace the subscriber; it receives a snapshot after every change.
    pub fn subscribe(&self, listener: impl Fn(&SyncSnapshot) + 'static) {
        *self.listener.borrow_mut() = Some(Box::new(listener));
    }

    /// Stop notifying; later changes stay internal.
    pub fn unsubscribe(&self) {
        self.listener.borrow_mut().take();
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        self.state.borrow().snapshot()
    }

    /// Tasks of the active board, in display order
    pub fn tasks(&self) -> Vec<Task> {
        self.snapshot().tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<Task> {
        let state = self.state.borrow();
        let board_id = state.active_board.as_ref()?;
        state
            .tasks_by_board
            .get(board_id)?
            .iter()
            .find(|task| &task.id == id)
            .cloned()
    }

    /// Tasks of any cached board
    pub fn board_tasks(&self, board_id: &str) -> Option<Vec<Task>> {
        self.state.borrow().tasks_by_board.get(board_id).cloned()
    }

    pub fn active_board(&self) -> Option<BoardId> {
        self.state.borrow().active_board.clone()
    }

    pub fn boards(&self) -> Vec<BoardSummary> {
        self.state.borrow().boards.clone()
    }

    pub fn is_loaded(&self, board_id: &str) -> bool {
        self.state.borrow().tasks_by_board.contains_key(board_id)
    }

    pub fn notice(&self) -> Option<SyncNotice> {
        self.state.borrow().notice.clone()
    }

    pub fn dismiss_notice(&self) {
        self.update(|state| state.notice = None);
    }

    /// Drop everything, e.g. after the identity changed
    pub fn reset(&self) {
        self.update(|state| {
            *state = SyncState {
                next_temp_id: state.next_temp_id,
                next_notice_id: state.next_notice_id,
                ..Default::default()
            }
        });
    }

    // ========================
    // Boards
    // ========================

    /// Fetch every board with its tasks so later switches are instant.
    pub fn load(self: &Rc<Self>) -> impl Future<Output = SyncResult<()>> + 'static {
        let this = Rc::clone(self);
        async move {
            let boards = match this.repo.list_boards().await {
                Ok(boards) => boards,
                Err(err) => return Err(this.fail("load boards", err)),
            };
            log::info!("[SYNC] Loaded {} boards", boards.len());

            this.update(|state| {
                let mut cache = HashMap::new();
                for board in &boards {
                    let previous = state.tasks_by_board.get(&board.id);
                    let local_copy = |id: &TaskId| previous.and_then(|tasks| tasks.iter().find(|t| &t.id == id));
                    // Unacknowledged local edits win over the fetched list
                    let mut tasks: Vec<Task> = board
                        .tasks
                        .iter()
                        .filter(|t| !state.removing.contains_key(&t.id))
                        .map(|t| match local_copy(&t.id) {
                            Some(local) if state.unsettled.contains_key(&t.id) => local.clone(),
                            _ => t.clone(),
                        })
                        .collect();
                    // Keep blobs that are still being named or saved
                    if let Some(previous) = previous {
                        tasks.extend(previous.iter().filter(|t| t.is_pending()).cloned());
                    }
                    cache.insert(board.id.clone(), tasks);
                }
                state.pending.retain(|_, p| cache.contains_key(&p.board_id));
                state.tasks_by_board = cache;
                state.boards = boards.iter().map(Board::summary).collect();
                state.signed_out = false;

                let keep_active = state
                    .active_board
                    .as_ref()
                    .is_some_and(|id| state.tasks_by_board.contains_key(id));
                if !keep_active {
                    state.active_board = boards
                        .iter()
                        .find(|b| b.name == PREFERRED_BOARD)
                        .or_else(|| boards.first())
                        .map(|b| b.id.clone());
                }
            });
            Ok(())
        }
    }

    /// Make a board known and cached without a round-trip
    pub fn seed_board(&self, board: Board) {
        self.update(|state| {
            if !state.boards.iter().any(|b| b.id == board.id) {
                state.boards.push(board.summary());
            }
            state.tasks_by_board.insert(board.id, board.tasks);
        });
    }

    /// Activate a board. Cached boards switch synchronously; others are
    /// fetched once and only exposed after the fetch lands.
    pub fn switch_board(self: &Rc<Self>, board_id: &str) -> impl Future<Output = SyncResult<()>> + 'static {
        let fetch_seq = self.update(|state| {
            state.switch_seq += 1;
            if state.active_board.as_deref() == Some(board_id) {
                return None;
            }
            if state.tasks_by_board.contains_key(board_id) {
                state.active_board = Some(board_id.to_string());
                return None;
            }
            Some(state.switch_seq)
        });

        let this = Rc::clone(self);
        let board_id = board_id.to_string();
        async move {
            let Some(seq) = fetch_seq else {
                return Ok(());
            };
            log::debug!("[SYNC] Fetching board {}", board_id);
            match this.repo.list_tasks(&board_id).await {
                Ok(tasks) => {
                    this.update(|state| {
                        state.tasks_by_board.entry(board_id.clone()).or_insert(tasks);
                        if state.switch_seq == seq {
                            state.active_board = Some(board_id);
                        }
                    });
                    Ok(())
                }
                Err(err) => Err(this.fail("switch board", err)),
            }
        }
    }

    pub fn select_board_by_name(self: &Rc<Self>, name: &str) -> impl Future<Output = SyncResult<()>> + 'static {
        let board_id = self
            .state
            .borrow()
            .boards
            .iter()
            .find(|b| b.name == name)
            .map(|b| b.id.clone());
        let switch = board_id.as_deref().map(|id| self.switch_board(id));
        let name = name.to_string();
        async move {
            match switch {
                Some(switch) => switch.await,
                None => Err(SyncError::UnknownBoard(name)),
            }
        }
    }

    /// Not optimistic: the board appears once the store has created it.
    pub fn create_board(self: &Rc<Self>, name: &str) -> impl Future<Output = SyncResult<BoardSummary>> + 'static {
        let this = Rc::clone(self);
        let name = name.to_string();
        async move {
            let board = match this.repo.create_board(&name).await {
                Ok(board) => board,
                Err(err) => return Err(this.fail("create board", err)),
            };
            let summary = board.summary();
            this.update(|state| {
                state.boards.push(board.summary());
                state.boards.sort_by(|a, b| a.name.cmp(&b.name));
                state.tasks_by_board.insert(board.id, board.tasks);
            });
            Ok(summary)
        }
    }

    // ========================
    // Tasks
    // ========================

    /// Drag end. The position is never reverted on failure unless
    /// `rollback_failed_moves` is set.
    pub fn move_task(self: &Rc<Self>, id: &TaskId, x: f64, y: f64) -> impl Future<Output = SyncResult<()>> + 'static {
        let local: SyncResult<_> = self.update(|state| {
            let board_id = state.active_board_id()?;
            let task = state
                .find_task_mut(&board_id, id)
                .ok_or_else(|| SyncError::UnknownTask(id.clone()))?;
            let previous = (task.x, task.y);
            task.x = x;
            task.y = y;
            hold_id(&mut state.unsettled, id);
            Ok((board_id, previous))
        });

        let this = Rc::clone(self);
        let id = id.clone();
        async move {
            let (board_id, previous) = local?;
            this.save_position(&board_id, &id, (x, y), previous).await
        }
    }

    /// Persist a position. The caller holds `id` in `unsettled`; it is
    /// released here once the store answers.
    async fn save_position(&self, board_id: &str, id: &TaskId, to: (f64, f64), previous: (f64, f64)) -> SyncResult<()> {
        // Temporary blobs carry their position in the create call
        let Some(store_id) = id.as_persisted() else {
            return Ok(());
        };
        let result = self.repo.update_task(store_id, &TaskPatch::position(to.0, to.1)).await;

        let rollback = result.is_err() && self.config.rollback_failed_moves;
        self.update(|state| {
            release_id(&mut state.unsettled, id);
            if !rollback {
                return;
            }
            if let Some(task) = state.find_task_mut(board_id, id) {
                if (task.x, task.y) == to {
                    task.x = previous.0;
                    task.y = previous.1;
                }
            }
        });
        match result {
            Ok(_) => Ok(()),
            Err(err) => Err(self.fail("move task", err)),
        }
    }

    /// Show a new blob right away under a temporary id. Nothing is sent until
    /// [`confirm_create`](Self::confirm_create).
    pub fn begin_create(&self, initial_label: &str, x: f64, y: f64, size: Option<f64>) -> SyncResult<TaskId> {
        let size = size.unwrap_or(self.config.default_task_size);
        self.update(|state| {
            let board_id = state.active_board_id()?;
            let n = state.next_temp_id;
            state.next_temp_id += 1;

            let id = TaskId::Temporary(n);
            state
                .tasks_by_board
                .entry(board_id.clone())
                .or_default()
                .push(Task::new(id.clone(), initial_label, x, y, size));
            state.pending.insert(
                n,
                PendingCreate {
                    board_id,
                    phase: CreatePhase::AwaitingLabel,
                    in_clear: false,
                },
            );
            Ok(id)
        })
    }

    /// Name a pending blob and persist it. On success the temporary entry is
    /// swapped in place for the stored task; on failure it disappears.
    pub fn confirm_create(self: &Rc<Self>, temp_id: &TaskId, label: &str) -> impl Future<Output = SyncResult<Task>> + 'static {
        let local: SyncResult<_> = self.update(|state| {
            let TaskId::Temporary(n) = *temp_id else {
                return Err(SyncError::NotAwaitingLabel(temp_id.clone()));
            };
            state.check_editable(temp_id)?;
            let board_id = state.pending[&n].board_id.clone();
            let task = state
                .find_task_mut(&board_id, temp_id)
                .ok_or_else(|| SyncError::UnknownTask(temp_id.clone()))?;
            task.label = label.to_string();
            let new_task = NewTask::from_task(&board_id, task);

            if let Some(pending) = state.pending.get_mut(&n) {
                pending.phase = CreatePhase::Saving;
            }
            Ok((n, board_id, new_task))
        });

        let this = Rc::clone(self);
        let temp_id = temp_id.clone();
        async move {
            let (n, board_id, new_task) = local?;
            match this.repo.create_task(&new_task).await {
                Ok(persisted) => {
                    this.reconcile_created(n, &board_id, &temp_id, &new_task, &persisted).await;
                    Ok(persisted)
                }
                Err(err) => {
                    this.update(|state| {
                        state.pending.remove(&n);
                        state.remove_task(&board_id, &temp_id);
                    });
                    Err(this.fail("create task", err))
                }
            }
        }
    }

    async fn reconcile_created(&self, n: u64, board_id: &str, temp_id: &TaskId, sent: &NewTask, persisted: &Task) {
        enum Outcome {
            Replaced,
            Moved(f64, f64),
            Vanished,
            /// Hidden by a running clear, which settles it
            Parked,
        }

        let outcome = self.update(|state| {
            let hidden_by_clear = state.pending.remove(&n).is_some_and(|p| p.in_clear);
            let already_present = state
                .tasks_by_board
                .get(board_id)
                .is_some_and(|tasks| tasks.iter().any(|t| t.id == persisted.id));
            if already_present {
                state.remove_task(board_id, temp_id);
                return Outcome::Replaced;
            }
            match state.find_task_mut(board_id, temp_id) {
                Some(slot) => {
                    let (x, y) = (slot.x, slot.y);
                    *slot = persisted.clone();
                    if (x, y) != (sent.x, sent.y) {
                        slot.x = x;
                        slot.y = y;
                        hold_id(&mut state.unsettled, &persisted.id);
                        Outcome::Moved(x, y)
                    } else {
                        Outcome::Replaced
                    }
                }
                None if hidden_by_clear => {
                    state.landed_in_clear.insert(n, persisted.clone());
                    Outcome::Parked
                }
                None => Outcome::Vanished,
            }
        });

        match outcome {
            Outcome::Replaced | Outcome::Parked => {}
            Outcome::Moved(x, y) => {
                // Dragged while saving; push the newer position
                let _ = self
                    .save_position(board_id, &persisted.id, (x, y), (persisted.x, persisted.y))
                    .await;
            }
            Outcome::Vanished => {
                log::info!("[SYNC] {} was removed while saving, deleting {}", temp_id, persisted.id);
                self.delete_orphan(persisted).await;
            }
        }
    }

    async fn delete_orphan(&self, persisted: &Task) {
        if let Some(store_id) = persisted.id.as_persisted() {
            if let Err(err) = self.repo.delete_task(store_id).await {
                log::warn!("[SYNC] Could not delete orphaned task {}: {}", store_id, err);
            }
        }
    }

    /// Drop a blob that is still waiting for its label. No network call.
    pub fn cancel_create(&self, temp_id: &TaskId) -> bool {
        self.update(|state| {
            let TaskId::Temporary(n) = *temp_id else {
                return false;
            };
            if state.check_editable(temp_id).is_err() {
                return false;
            }
            if let Some(pending) = state.pending.remove(&n) {
                state.remove_task(&pending.board_id, temp_id);
            }
            true
        })
    }

    /// Relabel; the exact prior label comes back if the store refuses.
    pub fn rename(self: &Rc<Self>, id: &TaskId, label: &str) -> impl Future<Output = SyncResult<()>> + 'static {
        let local: SyncResult<_> = self.update(|state| {
            state.check_editable(id)?;
            let board_id = state.active_board_id()?;
            let task = state
                .find_task_mut(&board_id, id)
                .ok_or_else(|| SyncError::UnknownTask(id.clone()))?;
            let previous = std::mem::replace(&mut task.label, label.to_string());
            hold_id(&mut state.unsettled, id);
            Ok((board_id, previous))
        });

        let this = Rc::clone(self);
        let id = id.clone();
        let label = label.to_string();
        async move {
            let (board_id, previous) = local?;
            let Some(store_id) = id.as_persisted() else {
                return Ok(());
            };
            let result = this.repo.update_task(store_id, &TaskPatch::label(label)).await;

            let failed = result.is_err();
            this.update(|state| {
                release_id(&mut state.unsettled, &id);
                if !failed {
                    return;
                }
                if let Some(task) = state.find_task_mut(&board_id, &id) {
                    task.label = previous;
                }
            });
            match result {
                Ok(_) => Ok(()),
                Err(err) => Err(this.fail("rename task", err)),
            }
        }
    }

    /// Remove now, put back with all attributes if the store refuses.
    pub fn delete(self: &Rc<Self>, id: &TaskId) -> impl Future<Output = SyncResult<()>> + 'static {
        let local: SyncResult<_> = self.update(|state| {
            let board_id = state.active_board_id()?;
            let tasks = state
                .tasks_by_board
                .get_mut(&board_id)
                .ok_or(SyncError::NoActiveBoard)?;
            let index = tasks
                .iter()
                .position(|task| &task.id == id)
                .ok_or_else(|| SyncError::UnknownTask(id.clone()))?;
            let removed = tasks.remove(index);
            if let TaskId::Temporary(n) = id {
                state.pending.remove(n);
            }
            hold_id(&mut state.removing, id);
            Ok((board_id, index, removed))
        });

        let this = Rc::clone(self);
        async move {
            let (board_id, index, removed) = local?;
            let Some(store_id) = removed.id.as_persisted() else {
                return Ok(());
            };
            let result = this.repo.delete_task(store_id).await;

            let failed = result.is_err();
            this.update(|state| {
                release_id(&mut state.removing, &removed.id);
                if !failed {
                    return;
                }
                let tasks = state.tasks_by_board.entry(board_id).or_default();
                if !tasks.iter().any(|t| t.id == removed.id) {
                    let at = index.min(tasks.len());
                    tasks.insert(at, removed);
                }
            });
            result.map_err(|err| this.fail("delete task", err))
        }
    }

    /// Empty the active board. One delete per stored task; if any fails the
    /// whole board comes back, including blobs whose create was still saving.
    /// Blobs still waiting for a label are dropped either way.
    pub fn clear_all(self: &Rc<Self>) -> impl Future<Output = SyncResult<()>> + 'static {
        let local: SyncResult<_> = self.update(|state| {
            let board_id = state.active_board_id()?;
            let taken = std::mem::take(state.tasks_by_board.entry(board_id.clone()).or_default());

            let mut retained = Vec::with_capacity(taken.len());
            let mut saving = Vec::new();
            for task in taken {
                if let TaskId::Temporary(n) = task.id {
                    let is_saving = state.pending.get(&n).is_some_and(|p| p.phase == CreatePhase::Saving);
                    if !is_saving {
                        state.pending.remove(&n);
                        continue;
                    }
                    if let Some(p) = state.pending.get_mut(&n) {
                        p.in_clear = true;
                    }
                    saving.push(n);
                    retained.push(task);
                    continue;
                }
                hold_id(&mut state.removing, &task.id);
                retained.push(task);
            }
            Ok((board_id, retained, saving))
        });

        let this = Rc::clone(self);
        async move {
            let (board_id, retained, saving) = local?;
            let results = join_all(
                retained
                    .iter()
                    .filter_map(|task| task.id.as_persisted())
                    .map(|store_id| this.repo.delete_task(store_id)),
            )
            .await;
            let failure = results.into_iter().find_map(Result::err);
            let cleared = retained.len();

            let orphans: Vec<Task> = this.update(|state| {
                for task in &retained {
                    release_id(&mut state.removing, &task.id);
                }
                let mut landed = HashMap::new();
                for n in &saving {
                    if let Some(task) = state.landed_in_clear.remove(n) {
                        landed.insert(*n, task);
                    }
                    // Creates still in flight reconcile normally from here on
                    if let Some(p) = state.pending.get_mut(n) {
                        p.in_clear = false;
                    }
                }
                if failure.is_none() {
                    return landed.into_values().collect();
                }

                let mut restored = Vec::with_capacity(retained.len());
                for task in retained {
                    match task.id {
                        TaskId::Temporary(n) => match landed.remove(&n) {
                            Some(persisted) => restored.push(persisted),
                            None if state.pending.contains_key(&n) => restored.push(task),
                            // Create failed meanwhile
                            None => {}
                        },
                        TaskId::Persisted(_) => restored.push(task),
                    }
                }
                let tasks = state.tasks_by_board.entry(board_id.clone()).or_default();
                let added_since = std::mem::take(tasks);
                restored.retain(|t| !added_since.iter().any(|a| a.id == t.id));
                *tasks = restored;
                tasks.extend(added_since);
                Vec::new()
            });

            for orphan in &orphans {
                log::info!("[SYNC] {} was saved during a clear, deleting", orphan.id);
                this.delete_orphan(orphan).await;
            }
            match failure {
                None => {
                    log::info!("[SYNC] Cleared {} tasks from {}", cleared, board_id);
                    Ok(())
                }
                Some(err) => Err(this.fail("clear board", err)),
            }
        }
    }

    // ========================
    // Internals
    // ========================

    /// Mutate state, then notify with the borrow released.
    fn update<T>(&self, f: impl FnOnce(&mut SyncState) -> T) -> T {
        let out = {
            let mut state = self.state.borrow_mut();
            f(&mut *state)
        };
        self.notify();
        out
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        if let Some(listener) = self.listener.borrow().as_ref() {
            listener(&snapshot);
        }
    }

    fn fail(&self, operation: &str, err: SyncError) -> SyncError {
        log::warn!("[SYNC] {} failed: {}", operation, err);
        self.update(|state| state.record_failure(&err));
        err
    }
}
