//! Sub-search tasks and their handles.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

use crate::error::ForkfulError;
use crate::model::Restaurant;
use crate::search::SubSearchKind;

/// One sub-search scheduled on the pool.
#[derive(Debug, Clone)]
pub struct SearchTask {
    /// Unique identifier for this task.
    pub task_id: String,

    /// Strategy this task runs.
    pub kind: SubSearchKind,
}

impl SearchTask {
    pub fn new(kind: SubSearchKind) -> Self {
        let task_id = format!("{}_{}", kind.name(), uuid::Uuid::new_v4());
        Self { task_id, kind }
    }
}

/// Outcome of a sub-search.
#[derive(Debug)]
pub struct TaskResult {
    pub task_id: String,
    pub kind: SubSearchKind,

    /// Matches if the task succeeded.
    pub restaurants: Option<Vec<Restaurant>>,

    /// Error if the task failed or was cancelled.
    pub error: Option<ForkfulError>,

    pub execution_time: Duration,
}

impl TaskResult {
    pub fn success(task: SearchTask, restaurants: Vec<Restaurant>, execution_time: Duration) -> Self {
        Self {
            task_id: task.task_id,
            kind: task.kind,
            restaurants: Some(restaurants),
            error: None,
            execution_time,
        }
    }

    pub fn failure(task: SearchTask, error: ForkfulError, execution_time: Duration) -> Self {
        Self {
            task_id: task.task_id,
            kind: task.kind,
            restaurants: None,
            error: Some(error),
            execution_time,
        }
    }

    pub fn is_success(&self) -> bool {
        self.restaurants.is_some() && self.error.is_none()
    }

    pub fn hit_count(&self) -> usize {
        self.restaurants.as_ref().map(Vec::len).unwrap_or(0)
    }
}

/// Status of a task during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Queued,
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Shared view of a task: status plus a cancel flag the task polls.
#[derive(Debug, Clone)]
pub struct TaskHandle {
    pub task_id: String,
    status: Arc<RwLock<TaskStatus>>,
    cancel_token: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn new(task_id: String) -> Self {
        Self {
            task_id,
            status: Arc::new(RwLock::new(TaskStatus::Queued)),
            cancel_token: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn status(&self) -> TaskStatus {
        *self.status.read()
    }

    pub fn set_status(&self, status: TaskStatus) {
        *self.status.write() = status;
    }

    /// Mark the task as started.
    pub fn start(&self) {
        self.set_status(TaskStatus::Running);
    }

    /// Ask the task to stop at its next checkpoint.
    pub fn cancel(&self) {
        self.cancel_token.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_token.load(Ordering::SeqCst)
    }
}
