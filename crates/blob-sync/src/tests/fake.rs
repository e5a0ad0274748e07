//! Scripted Repository
//!
//! In-memory `TaskRepository` that records every call, can be told to fail
//! per operation or per task id, and can hold a call open until released.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::error::{SyncError, SyncResult};
use crate::model::{Board, NewTask, Task, TaskId, TaskPatch, User, DEFAULT_TASK_SIZE};
use crate::repository::TaskRepository;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListBoards,
    CreateBoard(String),
    ListTasks(String),
    CreateTask(NewTask),
    UpdateTask(String, TaskPatch),
    DeleteTask(String),
    CurrentUser,
    EnsureUser(String, String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    ListBoards,
    CreateBoard,
    ListTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
    CurrentUser,
    EnsureUser,
}

impl Call {
    fn op(&self) -> Op {
        match self {
            Call::ListBoards => Op::ListBoards,
            Call::CreateBoard(_) => Op::CreateBoard,
            Call::ListTasks(_) => Op::ListTasks,
            Call::CreateTask(_) => Op::CreateTask,
            Call::UpdateTask(..) => Op::UpdateTask,
            Call::DeleteTask(_) => Op::DeleteTask,
            Call::CurrentUser => Op::CurrentUser,
            Call::EnsureUser(..) => Op::EnsureUser,
        }
    }
}

pub fn server_error() -> SyncError {
    SyncError::from_status(500, "Internal server error")
}

pub fn task(id: &str, label: &str, x: f64, y: f64) -> Task {
    Task::new(TaskId::persisted(id), label, x, y, DEFAULT_TASK_SIZE)
}

pub fn board(id: &str, name: &str, tasks: Vec<Task>) -> Board {
    Board {
        id: id.to_string(),
        name: name.to_string(),
        tasks,
    }
}

#[derive(Default)]
pub struct FakeRepository {
    boards: RefCell<Vec<Board>>,
    calls: RefCell<Vec<Call>>,
    failing_ops: RefCell<HashMap<Op, SyncError>>,
    failing_ids: RefCell<HashMap<String, SyncError>>,
    holds: RefCell<Vec<(Op, oneshot::Receiver<()>)>>,
    created: RefCell<VecDeque<Task>>,
    next_id: Cell<u32>,
}

impl FakeRepository {
    pub fn with_boards(boards: Vec<Board>) -> Self {
        Self {
            boards: RefCell::new(boards),
            ..Default::default()
        }
    }

    /// Board that exists in the store but was never loaded by the client
    pub fn add_board(&self, board: Board) {
        self.boards.borrow_mut().push(board);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls.borrow().iter().filter(|c| c.op() == op).count()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    /// Every later call of `op` fails with a 500
    pub fn fail(&self, op: Op) {
        self.fail_with(op, server_error());
    }

    pub fn fail_with(&self, op: Op, err: SyncError) {
        self.failing_ops.borrow_mut().insert(op, err);
    }

    /// Calls addressing this task id fail with a 500
    pub fn fail_for_id(&self, id: &str) {
        self.failing_ids.borrow_mut().insert(id.to_string(), server_error());
    }

    /// Next create answers with exactly this task
    pub fn respond_to_create(&self, task: Task) {
        self.created.borrow_mut().push_back(task);
    }

    /// The next call of `op` waits until the sender fires or is dropped.
    /// Failures are decided after the wait.
    pub fn hold_next(&self, op: Op) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.holds.borrow_mut().push((op, rx));
        tx
    }

    pub fn stored_tasks(&self, board_id: &str) -> Vec<Task> {
        self.boards
            .borrow()
            .iter()
            .find(|b| b.id == board_id)
            .map(|b| b.tasks.clone())
            .unwrap_or_default()
    }

    async fn enter(&self, call: Call, id: Option<&str>) -> SyncResult<()> {
        let op = call.op();
        self.calls.borrow_mut().push(call);

        let hold = {
            let mut holds = self.holds.borrow_mut();
            holds
                .iter()
                .position(|(held, _)| *held == op)
                .map(|i| holds.remove(i).1)
        };
        if let Some(release) = hold {
            let _ = release.await;
        }

        if let Some(err) = self.failing_ops.borrow().get(&op) {
            return Err(err.clone());
        }
        if let Some(err) = id.and_then(|id| self.failing_ids.borrow().get(id).cloned()) {
            return Err(err);
        }
        Ok(())
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("{}-{}", prefix, n)
    }
}

#[async_trait(?Send)]
impl TaskRepository for FakeRepository {
    async fn list_boards(&self) -> SyncResult<Vec<Board>> {
        self.enter(Call::ListBoards, None).await?;
        Ok(self.boards.borrow().clone())
    }

    async fn create_board(&self, name: &str) -> SyncResult<Board> {
        self.enter(Call::CreateBoard(name.to_string()), None).await?;
        let created = board(&self.next_id("board"), name, Vec::new());
        self.boards.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn list_tasks(&self, board_id: &str) -> SyncResult<Vec<Task>> {
        self.enter(Call::ListTasks(board_id.to_string()), None).await?;
        self.boards
            .borrow()
            .iter()
            .find(|b| b.id == board_id)
            .map(|b| b.tasks.clone())
            .ok_or_else(|| SyncError::NotFound("Board not found".to_string()))
    }

    async fn create_task(&self, new_task: &NewTask) -> SyncResult<Task> {
        self.enter(Call::CreateTask(new_task.clone()), None).await?;
        let created = match self.created.borrow_mut().pop_front() {
            Some(scripted) => scripted,
            None => Task::new(
                TaskId::persisted(self.next_id("real")),
                new_task.label.clone(),
                new_task.x,
                new_task.y,
                new_task.size.unwrap_or(DEFAULT_TASK_SIZE),
            ),
        };
        let mut boards = self.boards.borrow_mut();
        let target = boards
            .iter_mut()
            .find(|b| b.id == new_task.board_id)
            .ok_or_else(|| SyncError::NotFound("Board not found".to_string()))?;
        target.tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, id: &str, patch: &TaskPatch) -> SyncResult<Task> {
        self.enter(Call::UpdateTask(id.to_string(), patch.clone()), Some(id)).await?;
        let mut boards = self.boards.borrow_mut();
        let stored = boards
            .iter_mut()
            .flat_map(|b| b.tasks.iter_mut())
            .find(|t| t.id.as_persisted() == Some(id))
            .ok_or_else(|| SyncError::NotFound("Task not found".to_string()))?;
        if let Some(label) = &patch.label {
            stored.label = label.clone();
        }
        stored.x = patch.x.unwrap_or(stored.x);
        stored.y = patch.y.unwrap_or(stored.y);
        stored.size = patch.size.unwrap_or(stored.size);
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: &str) -> SyncResult<()> {
        self.enter(Call::DeleteTask(id.to_string()), Some(id)).await?;
        let mut boards = self.boards.borrow_mut();
        let owner = boards
            .iter_mut()
            .find(|b| b.tasks.iter().any(|t| t.id.as_persisted() == Some(id)))
            .ok_or_else(|| SyncError::NotFound("Task not found".to_string()))?;
        owner.tasks.retain(|t| t.id.as_persisted() != Some(id));
        Ok(())
    }

    async fn current_user(&self) -> SyncResult<Option<User>> {
        self.enter(Call::CurrentUser, None).await?;
        Ok(None)
    }

    async fn ensure_user(&self, username: &str, email: &str) -> SyncResult<User> {
        self.enter(Call::EnsureUser(username.to_string(), email.to_string()), None)
            .await?;
        Ok(User {
            id: "user-1".to_string(),
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            boards: self.boards.borrow().clone(),
        })
    }
}
