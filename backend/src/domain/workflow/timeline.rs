//! Per-step progress view of a contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ParallelGroup, Step};
use crate::domain::{AssignedTask, TaskStatus};

/// Progress of one step on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepProgress {
    /// At least one task for the step is completed.
    Completed,
    /// A task is open and none is completed.
    Pending,
    /// No task exists for the step yet.
    Waiting,
}

/// One row of the timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct StepProjection {
    pub step: Step,
    pub progress: StepProgress,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub tasks: Vec<AssignedTask>,
}

impl StepProjection {
    pub fn name(&self) -> &'static str {
        self.step.label()
    }

    pub fn order(&self) -> u8 {
        self.step.order()
    }

    pub fn parallel_group(&self) -> Option<ParallelGroup> {
        self.step.parallel_group()
    }
}

/// Project a contract's tasks onto every workflow step.
///
/// `tasks` should be ordered by creation time; the first completed and the
/// first pending task of each step supply the names shown.
pub fn project(tasks: &[AssignedTask]) -> Vec<StepProjection> {
    Step::ALL
        .into_iter()
        .map(|step| {
            let related: Vec<AssignedTask> = tasks
                .iter()
                .filter(|entry| entry.task.step == step)
                .cloned()
                .collect();
            let completed = related
                .iter()
                .find(|entry| entry.task.status == TaskStatus::Completed);
            let pending = related
                .iter()
                .find(|entry| entry.task.status == TaskStatus::Pending);
            let progress = match (completed, pending) {
                (Some(_), _) => StepProgress::Completed,
                (None, Some(_)) => StepProgress::Pending,
                (None, None) => StepProgress::Waiting,
            };
            StepProjection {
                step,
                progress,
                completed_by: completed.map(|entry| entry.assignee_name.clone()),
                completed_at: completed.and_then(|entry| entry.task.completed_at),
                assigned_to: pending.map(|entry| entry.assignee_name.clone()),
                tasks: related,
            }
        })
        .collect()
}
