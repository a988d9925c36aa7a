//! Workflow services.
//!
//! [`WorkflowService`] implements the workflow driving ports on top of a
//! [`WorkflowRepository`]. It validates input, stamps times from the injected
//! clock, hands completions to the store together with the planner and maps
//! store errors to domain errors.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    CompleteTaskRequest, CompleteTaskResponse, ContractTimeline, StartContractRequest,
    StartContractResponse, WorkflowCommand, WorkflowQuery, WorkflowRepository,
    WorkflowRepositoryError,
};
use crate::domain::workflow::{
    CONTRACT_STARTED, PlanningError, TaskAnswers, TransitionPlanner, initial_task, project,
};
use crate::domain::{
    ContractDraft, ContractId, ContractSummary, Error, TaskOverview, UserId,
};

fn map_repository_error(error: WorkflowRepositoryError) -> Error {
    match error {
        WorkflowRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("workflow store unavailable: {message}"))
        }
        WorkflowRepositoryError::Query { message } => {
            Error::internal(format!("workflow store error: {message}"))
        }
        WorkflowRepositoryError::TaskNotFound { task_id } => {
            Error::not_found(format!("task {task_id} not found or already completed"))
                .with_details(json!({ "taskId": task_id }))
        }
        WorkflowRepositoryError::ContractNotFound { contract_id } => {
            Error::not_found(format!("contract {contract_id} not found"))
                .with_details(json!({ "contractId": contract_id }))
        }
        WorkflowRepositoryError::UnknownUser { user_id } => {
            Error::invalid_request(format!("user {user_id} does not exist"))
                .with_details(json!({ "field": "created_by", "userId": user_id }))
        }
        WorkflowRepositoryError::Planning { error } => match error {
            PlanningError::InvalidAnswers(err) => Error::invalid_request(err.to_string())
                .with_details(json!({ "field": "answers", "step": err.step })),
            PlanningError::NoAssignee { role } => {
                Error::conflict(format!("no user holds the {role} role"))
                    .with_details(json!({ "role": role }))
            }
        },
    }
}

/// Workflow service implementing [`WorkflowCommand`] and [`WorkflowQuery`].
#[derive(Clone)]
pub struct WorkflowService<R> {
    repo: Arc<R>,
    planner: Arc<dyn TransitionPlanner>,
    clock: Arc<dyn Clock>,
}

impl<R> WorkflowService<R> {
    /// Create a service over `repo`.
    ///
    /// # Examples
    /// ```
    /// # use std::sync::Arc;
    /// # use mockable::DefaultClock;
    /// # use onboarding_backend::domain::WorkflowService;
    /// # use onboarding_backend::domain::workflow::{TransitionTable, WorkflowPlanner};
    /// # use onboarding_backend::outbound::memory::MemoryStore;
    /// let store = Arc::new(MemoryStore::new());
    /// let planner = Arc::new(WorkflowPlanner::new(TransitionTable::standard()));
    /// let service = WorkflowService::new(store, planner, Arc::new(DefaultClock));
    /// # let _ = service;
    /// ```
    pub fn new(repo: Arc<R>, planner: Arc<dyn TransitionPlanner>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repo,
            planner,
            clock,
        }
    }
}

#[async_trait]
impl<R> WorkflowCommand for WorkflowService<R>
where
    R: WorkflowRepository,
{
    async fn start_contract(
        &self,
        request: StartContractRequest,
    ) -> Result<StartContractResponse, Error> {
        let draft = ContractDraft::new(
            &request.doctor_name,
            &request.doctor_role,
            &request.start_date,
            request.created_by,
        )
        .map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": err.field() }))
        })?;

        let (contract, task) = self
            .repo
            .create_contract(&draft, &initial_task(draft.created_by()), self.clock.utc())
            .await
            .map_err(map_repository_error)?;

        info!(
            contract_id = %contract.id,
            task_id = %task.id,
            created_by = %contract.created_by,
            "contract started"
        );
        Ok(StartContractResponse {
            contract_id: contract.id,
            message: CONTRACT_STARTED,
        })
    }

    async fn complete_task(
        &self,
        request: CompleteTaskRequest,
    ) -> Result<CompleteTaskResponse, Error> {
        let answers = TaskAnswers::try_from(request.answers).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "answers" }))
        })?;

        let record = self
            .repo
            .complete_task(
                request.task_id,
                &answers,
                self.clock.utc(),
                Arc::clone(&self.planner),
            )
            .await
            .map_err(|err| {
                warn!(task_id = %request.task_id, error = %err, "task completion rejected");
                map_repository_error(err)
            })?;

        let plan = record.plan;
        info!(
            task_id = %record.task.id,
            contract_id = %record.task.contract_id,
            outcome = ?plan.outcome,
            created = record.created.len(),
            "task completed"
        );
        Ok(CompleteTaskResponse {
            task_id: record.task.id,
            contract_id: record.task.contract_id,
            outcome: plan.outcome,
            message: plan.message,
            next_status: plan.new_status,
            next_step: plan.next_step(),
            created_steps: plan.created_steps(),
        })
    }
}

#[async_trait]
impl<R> WorkflowQuery for WorkflowService<R>
where
    R: WorkflowRepository,
{
    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, Error> {
        self.repo
            .list_contracts()
            .await
            .map_err(map_repository_error)
    }

    async fn contracts_created_by(&self, user_id: UserId) -> Result<Vec<ContractSummary>, Error> {
        self.repo
            .list_contracts_by_creator(user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn timeline(&self, contract_id: ContractId) -> Result<ContractTimeline, Error> {
        let contract = self
            .repo
            .find_contract(contract_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| {
                map_repository_error(WorkflowRepositoryError::contract_not_found(contract_id))
            })?;
        let tasks = self
            .repo
            .contract_tasks(contract_id)
            .await
            .map_err(map_repository_error)?;
        debug!(contract_id = %contract_id, tasks = tasks.len(), "projecting timeline");

        Ok(ContractTimeline {
            contract,
            timeline: project(&tasks),
            tasks,
        })
    }

    async fn list_tasks(&self) -> Result<Vec<TaskOverview>, Error> {
        self.repo.list_tasks().await.map_err(map_repository_error)
    }

    async fn pending_tasks(&self, user_id: UserId) -> Result<Vec<TaskOverview>, Error> {
        self.repo
            .pending_tasks_for(user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "workflow_service_tests.rs"]
mod tests;
