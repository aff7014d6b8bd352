//! Background agent contract — the object slash commands forward to.
//!
//! The console never runs agent work itself; it validates arguments and
//! delegates to a [`BackgroundAgent`]. The trait is the whole surface:
//! start/stop/list/get/message/delete. [`LocalAgent`] is the in-process
//! implementation used by the binary and the tests.

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("task not running: {0}")]
    TaskNotRunning(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type AgentResult<T> = Result<T, AgentError>;

/// Lifecycle state of a background task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Running,
    Stopped,
    Done,
    Failed,
}

impl TaskStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, TaskStatus::Running)
    }

    /// Short lowercase form for display.
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Running => "running",
            TaskStatus::Stopped => "stopped",
            TaskStatus::Done => "done",
            TaskStatus::Failed => "failed",
        }
    }
}

/// A background task as the console sees it.
#[derive(Debug, Clone)]
pub struct TaskRecord {
    /// UUID for this task.
    pub id: String,
    /// The prompt the task was started with.
    pub prompt: String,
    pub status: TaskStatus,
    /// Creation timestamp (unix epoch millis).
    pub created_at: u64,
    /// Messages exchanged with the task, newest last.
    pub transcript: Vec<String>,
}

/// The external background-task manager.
#[async_trait]
pub trait BackgroundAgent: Send + Sync {
    /// Start a new task for the given prompt.
    async fn start(&self, prompt: &str) -> AgentResult<TaskRecord>;

    /// Stop a running task.
    async fn stop(&self, id: &str) -> AgentResult<()>;

    /// All known tasks, oldest first.
    async fn list(&self) -> AgentResult<Vec<TaskRecord>>;

    /// One task by id.
    async fn get(&self, id: &str) -> AgentResult<TaskRecord>;

    /// Send a follow-up message to a running task.
    async fn message(&self, id: &str, text: &str) -> AgentResult<()>;

    /// Remove a task and its transcript.
    async fn delete(&self, id: &str) -> AgentResult<()>;
}

/// In-memory task table.
#[derive(Default)]
pub struct LocalAgent {
    tasks: Mutex<HashMap<String, TaskRecord>>,
}

impl LocalAgent {
    pub fn new() -> Self {
        Self::default()
    }
}

fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[async_trait]
impl BackgroundAgent for LocalAgent {
    async fn start(&self, prompt: &str) -> AgentResult<TaskRecord> {
        let record = TaskRecord {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.to_string(),
            status: TaskStatus::Running,
            created_at: now_millis(),
            transcript: Vec::new(),
        };
        tracing::info!(id = %record.id, "task started");
        self.tasks
            .lock()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record)
    }

    async fn stop(&self, id: &str) -> AgentResult<()> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| AgentError::TaskNotFound(id.to_string()))?;
        if task.status != TaskStatus::Running {
            return Err(AgentError::TaskNotRunning(id.to_string()));
        }
        task.status = TaskStatus::Stopped;
        tracing::info!(id, "task stopped");
        Ok(())
    }

    async fn list(&self) -> AgentResult<Vec<TaskRecord>> {
        let tasks = self.tasks.lock().await;
        let mut all: Vec<TaskRecord> = tasks.values().cloned().collect();
        all.sort_by_key(|t| (t.created_at, t.id.clone()));
        Ok(all)
    }

    async fn get(&self, id: &str) -> AgentResult<TaskRecord> {
        self.tasks
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| AgentError::TaskNotFound(id.to_string()))
    }

    async fn message(&self, id: &str, text: &str) -> AgentResult<()> {
        let mut tasks = self.tasks.lock().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| AgentError::TaskNotFound(id.to_string()))?;
        if task.status != TaskStatus::Running {
            return Err(AgentError::TaskNotRunning(id.to_string()));
        }
        task.transcript.push(text.to_string());
        Ok(())
    }

    async fn delete(&self, id: &str) -> AgentResult<()> {
        self.tasks
            .lock()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AgentError::TaskNotFound(id.to_string()))
    }
}
