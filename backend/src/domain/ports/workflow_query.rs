//! Driving port for workflow read views.

use async_trait::async_trait;

use crate::domain::workflow::StepProjection;
use crate::domain::{AssignedTask, ContractId, ContractSummary, Error, TaskOverview, UserId};

/// A contract with its per-step progress and every task it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct ContractTimeline {
    pub contract: ContractSummary,
    pub timeline: Vec<StepProjection>,
    pub tasks: Vec<AssignedTask>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowQuery: Send + Sync {
    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, Error>;

    async fn contracts_created_by(&self, user_id: UserId) -> Result<Vec<ContractSummary>, Error>;

    /// `not_found` when the contract does not exist.
    async fn timeline(&self, contract_id: ContractId) -> Result<ContractTimeline, Error>;

    async fn list_tasks(&self) -> Result<Vec<TaskOverview>, Error>;

    /// The task inbox of one user.
    async fn pending_tasks(&self, user_id: UserId) -> Result<Vec<TaskOverview>, Error>;
}
