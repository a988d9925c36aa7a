//! Driven port for contracts and their tasks.
//!
//! Every mutation that belongs to one completion goes through
//! [`WorkflowRepository::complete_task`]. Adapters must apply it atomically and
//! serialise it per contract so that two completions racing into the same
//! parallel join cannot both create the follow-up task.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::workflow::{PlanningError, TaskAnswers, TransitionPlan, TransitionPlanner};
use crate::domain::{
    AssignedTask, Contract, ContractDraft, ContractId, ContractStatus, ContractSummary, NewTask,
    Task, TaskId, TaskOverview, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by workflow record stores.
    pub enum WorkflowRepositoryError {
        /// The store could not be reached.
        Connection { message: String } =>
            "workflow store connection failed: {message}",
        /// A query or mutation failed.
        Query { message: String } =>
            "workflow store query failed: {message}",
        /// The task does not exist or was already completed.
        TaskNotFound { task_id: TaskId } =>
            "task {task_id} not found or already completed",
        ContractNotFound { contract_id: ContractId } =>
            "contract {contract_id} not found",
        /// A referenced user does not exist.
        UnknownUser { user_id: UserId } =>
            "user {user_id} does not exist",
        /// The planner refused the completion; nothing was written.
        Planning { error: PlanningError } =>
            "completion rejected: {error}",
    }
}

/// What a successful completion wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRecord {
    /// The task in its completed state.
    pub task: Task,
    pub plan: TransitionPlan,
    /// Tasks inserted as a consequence, in plan order.
    pub created: Vec<Task>,
}

/// Port for reading and writing contracts and tasks.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowRepository: Send + Sync {
    /// Insert a contract in its initial status together with its first task.
    async fn create_contract(
        &self,
        draft: &ContractDraft,
        first_task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<(Contract, Task), WorkflowRepositoryError>;

    async fn find_contract(
        &self,
        contract_id: ContractId,
    ) -> Result<Option<ContractSummary>, WorkflowRepositoryError>;

    /// All contracts, newest first.
    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, WorkflowRepositoryError>;

    /// Contracts started by `user_id`, newest first.
    async fn list_contracts_by_creator(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ContractSummary>, WorkflowRepositoryError>;

    async fn update_contract_status(
        &self,
        contract_id: ContractId,
        status: ContractStatus,
    ) -> Result<(), WorkflowRepositoryError>;

    async fn create_task(
        &self,
        contract_id: ContractId,
        task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, WorkflowRepositoryError>;

    async fn find_task(&self, task_id: TaskId) -> Result<Option<Task>, WorkflowRepositoryError>;

    /// Tasks of one contract with their assignees, oldest first.
    async fn contract_tasks(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<AssignedTask>, WorkflowRepositoryError>;

    /// Pending tasks of a contract other than `excluding`.
    async fn list_pending_tasks(
        &self,
        contract_id: ContractId,
        excluding: TaskId,
    ) -> Result<Vec<Task>, WorkflowRepositoryError>;

    /// Every task with assignee and contract details, newest first.
    async fn list_tasks(&self) -> Result<Vec<TaskOverview>, WorkflowRepositoryError>;

    /// Pending tasks assigned to `user_id`, newest first.
    async fn pending_tasks_for(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TaskOverview>, WorkflowRepositoryError>;

    /// Complete a pending task and apply the planner's consequences.
    ///
    /// Within one per-contract critical section the adapter marks the task
    /// completed, builds a [`crate::domain::workflow::CompletionContext`], asks
    /// `planner` for a plan, inserts the planned tasks and updates the status.
    /// Returns [`WorkflowRepositoryError::TaskNotFound`] without writing when
    /// the task is missing or no longer pending, and
    /// [`WorkflowRepositoryError::Planning`] when the planner fails, in which
    /// case the completion itself is rolled back too.
    async fn complete_task(
        &self,
        task_id: TaskId,
        answers: &TaskAnswers,
        now: DateTime<Utc>,
        planner: Arc<dyn TransitionPlanner>,
    ) -> Result<CompletionRecord, WorkflowRepositoryError>;
}
