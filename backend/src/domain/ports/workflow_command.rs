//! Driving port for workflow mutations: starting contracts and completing
//! tasks.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::workflow::{Outcome, Step};
use crate::domain::{ContractId, ContractStatus, Error, TaskId, UserId};

/// Raw intake fields for a new contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartContractRequest {
    pub doctor_name: String,
    pub doctor_role: String,
    pub start_date: String,
    pub created_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartContractResponse {
    pub contract_id: ContractId,
    pub message: &'static str,
}

/// Completion of one task with whatever the department submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteTaskRequest {
    pub task_id: TaskId,
    /// Must be a JSON object.
    pub answers: Value,
}

/// What the completion did to the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompleteTaskResponse {
    pub task_id: TaskId,
    pub contract_id: ContractId,
    pub outcome: Outcome,
    pub message: &'static str,
    /// Set when the contract status changed.
    pub next_status: Option<ContractStatus>,
    /// Set when exactly one follow-up task was opened.
    pub next_step: Option<Step>,
    pub created_steps: Vec<Step>,
}

/// Driving port for workflow writes.
///
/// Validation problems surface as `invalid_request`, unknown or completed
/// tasks as `not_found` and unroutable roles as `conflict`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkflowCommand: Send + Sync {
    async fn start_contract(
        &self,
        request: StartContractRequest,
    ) -> Result<StartContractResponse, Error>;

    async fn complete_task(&self, request: CompleteTaskRequest)
    -> Result<CompleteTaskResponse, Error>;
}
