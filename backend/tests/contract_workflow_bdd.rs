//! Behaviour tests for the contract workflow over the in-memory store.
//!
//! Steps drive the workflow service through its driving ports, the same way
//! the HTTP handlers do, and look up assignees by role so the scenarios read
//! in department terms.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use mockable::Clock;
use onboarding_backend::domain::ports::{
    CompleteTaskRequest, CompleteTaskResponse, DirectoryRepository, StartContractRequest,
    WorkflowCommand, WorkflowQuery,
};
use onboarding_backend::domain::workflow::{TransitionTable, WorkflowPlanner};
use onboarding_backend::domain::{ContractId, Error, Role, TaskId, UserId, WorkflowService};
use onboarding_backend::outbound::memory::MemoryStore;
use onboarding_backend::test_support::SteppingClock;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::{Value, json};
use tokio::runtime::Runtime;

struct WorkflowWorld {
    runtime: Runtime,
    store: RefCell<Option<Arc<MemoryStore>>>,
    service: RefCell<Option<Arc<WorkflowService<MemoryStore>>>>,
    contract_id: Cell<Option<ContractId>>,
    last_task: Cell<Option<TaskId>>,
    last_result: RefCell<Option<Result<CompleteTaskResponse, Error>>>,
}

impl WorkflowWorld {
    fn new() -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime");
        Self {
            runtime,
            store: RefCell::new(None),
            service: RefCell::new(None),
            contract_id: Cell::new(None),
            last_task: Cell::new(None),
            last_result: RefCell::new(None),
        }
    }

    fn install(&self, extended: bool) {
        let clock: Arc<dyn Clock> = SteppingClock::shared();
        let store = Arc::new(MemoryStore::seeded(clock.utc()));
        let planner = Arc::new(WorkflowPlanner::new(TransitionTable::for_sequence(extended)));
        let service = Arc::new(WorkflowService::new(Arc::clone(&store), planner, clock));
        self.store.replace(Some(store));
        self.service.replace(Some(service));
    }

    fn service(&self) -> Arc<WorkflowService<MemoryStore>> {
        self.service
            .borrow()
            .clone()
            .expect("store should be installed")
    }

    fn contract_id(&self) -> ContractId {
        self.contract_id.get().expect("contract should be started")
    }

    fn holder_of(&self, role: &str) -> UserId {
        let role: Role = role.parse().expect("known role");
        let store = self
            .store
            .borrow()
            .clone()
            .expect("store should be installed");
        let users = self
            .runtime
            .block_on(async move { store.list_users().await })
            .expect("directory readable");
        users
            .into_iter()
            .find(|user| user.role == role)
            .map(|user| user.id)
            .expect("seeded user for role")
    }

    fn pending_for(&self, role: &str) -> Vec<TaskId> {
        let user = self.holder_of(role);
        let contract_id = self.contract_id();
        let service = self.service();
        let tasks = self
            .runtime
            .block_on(async move { service.pending_tasks(user).await })
            .expect("pending tasks readable");
        tasks
            .into_iter()
            .filter(|overview| overview.assigned.task.contract_id == contract_id)
            .map(|overview| overview.assigned.task.id)
            .collect()
    }

    fn complete(&self, task_id: TaskId, answers: Value) {
        let service = self.service();
        let result = self.runtime.block_on(async move {
            service
                .complete_task(CompleteTaskRequest { task_id, answers })
                .await
        });
        self.last_task.set(Some(task_id));
        self.last_result.replace(Some(result));
    }

    fn complete_for(&self, role: &str, answers: Value) {
        let task_id = *self
            .pending_for(role)
            .first()
            .unwrap_or_else(|| panic!("{role} should have a pending task"));
        self.complete(task_id, answers);
    }

    fn last_response(&self) -> CompleteTaskResponse {
        match self.last_result.borrow().as_ref() {
            Some(Ok(response)) => response.clone(),
            Some(Err(error)) => panic!("completion failed: {error:?}"),
            None => panic!("no task completed yet"),
        }
    }
}

#[fixture]
fn world() -> WorkflowWorld {
    WorkflowWorld::new()
}

#[given("a seeded onboarding store on the standard sequence")]
fn a_seeded_onboarding_store(world: &WorkflowWorld) {
    world.install(false);
}

#[given("a seeded onboarding store running the extended sequence")]
fn a_seeded_store_running_the_extended_sequence(world: &WorkflowWorld) {
    world.install(true);
}

#[given("a contract started by {role}")]
fn a_contract_started_by(world: &WorkflowWorld, role: String) {
    let created_by = world.holder_of(&role);
    let service = world.service();
    let response = world
        .runtime
        .block_on(async move {
            service
                .start_contract(StartContractRequest {
                    doctor_name: "Dr. Elif Şahin".to_owned(),
                    doctor_role: "Kardiyoloji".to_owned(),
                    start_date: "2025-04-01".to_owned(),
                    created_by,
                })
                .await
        })
        .expect("contract starts");
    world.contract_id.set(Some(response.contract_id));
}

#[when("{role} completes their task")]
fn completes_their_task(world: &WorkflowWorld, role: String) {
    world.complete_for(&role, json!({}));
}

#[when("{role} approves the arrived contract")]
fn approves_the_arrived_contract(world: &WorkflowWorld, role: String) {
    world.complete_for(
        &role,
        json!({"sozlesme_ulasti_mi": true, "sozlesme_onaylandi_mi": true}),
    );
}

#[when("{role} reports the contract has not arrived")]
fn reports_the_contract_has_not_arrived(world: &WorkflowWorld, role: String) {
    world.complete_for(&role, json!({"sozlesme_ulasti_mi": false}));
}

#[when("the same task is completed again")]
fn the_same_task_is_completed_again(world: &WorkflowWorld) {
    let task_id = world.last_task.get().expect("a task was completed");
    world.complete(task_id, json!({}));
}

#[then("the outcome is {outcome}")]
fn the_outcome_is(world: &WorkflowWorld, outcome: String) {
    assert_eq!(world.last_response().outcome.as_str(), outcome);
}

#[then("the contract status is {status}")]
fn the_contract_status_is(world: &WorkflowWorld, status: String) {
    let service = world.service();
    let contract_id = world.contract_id();
    let timeline = world
        .runtime
        .block_on(async move { service.timeline(contract_id).await })
        .expect("timeline readable");
    assert_eq!(timeline.contract.contract.current_status.as_str(), status);
}

#[then("the pending task count for {role} is {count}")]
fn the_pending_task_count_is(world: &WorkflowWorld, role: String, count: usize) {
    assert_eq!(world.pending_for(&role).len(), count);
}

#[then("the completion is rejected as {code}")]
fn the_completion_is_rejected_as(world: &WorkflowWorld, code: String) {
    match world.last_result.borrow().as_ref() {
        Some(Err(error)) => {
            let wire = serde_json::to_value(error.code()).expect("code serialises");
            assert_eq!(wire, Value::String(code));
        }
        other => panic!("expected a rejection, got {other:?}"),
    }
}

#[scenario(
    path = "tests/features/contract_workflow.feature",
    name = "An approved contract reaches finance after both parallel departments"
)]
fn approved_contract_reaches_finance(world: WorkflowWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/contract_workflow.feature",
    name = "A contract that has not arrived goes back to the approver"
)]
fn unarrived_contract_goes_back(world: WorkflowWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/contract_workflow.feature",
    name = "A completed task cannot be completed twice"
)]
fn completed_task_cannot_be_completed_twice(world: WorkflowWorld) {
    drop(world);
}

#[scenario(
    path = "tests/features/contract_workflow.feature",
    name = "The extended sequence runs through orientation"
)]
fn extended_sequence_runs_through_orientation(world: WorkflowWorld) {
    drop(world);
}
