use crate::{MenovibeError, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Processing,
    Streaming,
    Complete,
    Error,
}

impl TaskStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Complete | TaskStatus::Error)
    }

    /// processing -> streaming -> complete | error. A task may also fail before it streams.
    pub fn can_transition_to(self, next: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, next),
            (Processing, Streaming) | (Processing, Error) | (Streaming, Complete) | (Streaming, Error)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Processing => "processing",
            TaskStatus::Streaming => "streaming",
            TaskStatus::Complete => "complete",
            TaskStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One in-flight exchange. Lives only as long as its event stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub task_id: String,
    pub owner_id: String,
    pub status: TaskStatus,
}

impl Task {
    /// Tasks are not resumable across processes, so the owner id doubles as the task id.
    pub fn for_owner(owner_id: impl Into<String>) -> Result<Self> {
        let owner_id = owner_id.into();
        if owner_id.is_empty() {
            return Err(MenovibeError::InvalidRequest("user_id is required".to_string()));
        }
        Ok(Self { task_id: owner_id.clone(), owner_id, status: TaskStatus::Processing })
    }

    pub fn advance(&mut self, next: TaskStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(MenovibeError::InvalidRequest(format!(
                "task {} cannot move from {} to {}",
                self.task_id, self.status, next
            )));
        }
        self.status = next;
        Ok(())
    }
}
