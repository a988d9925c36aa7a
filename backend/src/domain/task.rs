//! Department tasks created by the workflow.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::workflow::{Step, TaskAnswers};
use super::{ContractId, ContractStatus, Role, TaskId, UserId};

/// Lifecycle of a task. A task moves from pending to completed exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Completed,
}

impl TaskStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {value}")]
pub struct TaskStatusParseError {
    pub value: String,
}

impl FromStr for TaskStatus {
    type Err = TaskStatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "PENDING" => Ok(Self::Pending),
            "COMPLETED" => Ok(Self::Completed),
            other => Err(TaskStatusParseError {
                value: other.to_owned(),
            }),
        }
    }
}

/// A stored task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub contract_id: ContractId,
    pub assigned_to: UserId,
    pub step: Step,
    pub description: String,
    pub status: TaskStatus,
    /// Answers recorded at completion; `None` while pending.
    pub answers: Option<TaskAnswers>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

/// A task to be inserted, already resolved to a concrete assignee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub assigned_to: UserId,
    pub step: Step,
    pub description: String,
}

/// A task joined with its assignee, as shown on a contract timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedTask {
    pub task: Task,
    pub assignee_name: String,
    pub assignee_role: Role,
}

/// A task joined with its assignee and owning contract, as shown in listings.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskOverview {
    pub assigned: AssignedTask,
    pub doctor_name: String,
    pub contract_status: ContractStatus,
}
