//! Parallel-group joins under concurrent completion.
//!
//! Human resources and licensing finish at the same moment; the join must
//! still open exactly one finance task per contract.

use std::sync::Arc;

use mockable::Clock;
use onboarding_backend::domain::ports::{
    CompleteTaskRequest, StartContractRequest, WorkflowCommand, WorkflowQuery,
};
use onboarding_backend::domain::workflow::{Outcome, Step, WorkflowPlanner};
use onboarding_backend::domain::{ContractId, ContractStatus, UserId, WorkflowService};
use onboarding_backend::outbound::memory::MemoryStore;
use onboarding_backend::test_support::SteppingClock;
use rstest::{fixture, rstest};
use serde_json::json;

type Service = Arc<WorkflowService<MemoryStore>>;

const APPROVER: UserId = UserId::new(1);
const CONTRACT_OFFICE: UserId = UserId::new(2);

#[fixture]
fn service() -> Service {
    let clock: Arc<dyn Clock> = SteppingClock::shared();
    let store = Arc::new(MemoryStore::seeded(clock.utc()));
    Arc::new(WorkflowService::new(
        store,
        Arc::new(WorkflowPlanner::default()),
        clock,
    ))
}

async fn complete_only_pending(
    service: &Service,
    user: UserId,
    contract_id: ContractId,
    answers: serde_json::Value,
) {
    let pending = service.pending_tasks(user).await.expect("pending tasks");
    let task = pending
        .into_iter()
        .find(|overview| overview.assigned.task.contract_id == contract_id)
        .expect("a pending task for the contract");
    service
        .complete_task(CompleteTaskRequest {
            task_id: task.assigned.task.id,
            answers,
        })
        .await
        .expect("completion succeeds");
}

async fn contract_in_parallel_stage(service: &Service) -> ContractId {
    let started = service
        .start_contract(StartContractRequest {
            doctor_name: "Dr. Mert Aydın".to_owned(),
            doctor_role: "Ortopedi".to_owned(),
            start_date: "2025-05-12".to_owned(),
            created_by: APPROVER,
        })
        .await
        .expect("contract starts");
    let contract_id = started.contract_id;
    complete_only_pending(service, APPROVER, contract_id, json!({})).await;
    complete_only_pending(
        service,
        CONTRACT_OFFICE,
        contract_id,
        json!({"sozlesme_ulasti_mi": true, "sozlesme_onaylandi_mi": true}),
    )
    .await;
    contract_id
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_group_completions_open_one_finance_task(service: Service) {
    for _ in 0..25 {
        let contract_id = contract_in_parallel_stage(&service).await;
        let timeline = service.timeline(contract_id).await.expect("timeline");
        let group_tasks: Vec<_> = timeline
            .tasks
            .iter()
            .filter(|assigned| {
                matches!(
                    assigned.task.step,
                    Step::InsanKaynaklari | Step::Ruhsatlandirma
                )
            })
            .map(|assigned| assigned.task.id)
            .collect();
        assert_eq!(group_tasks.len(), 2);

        let handles: Vec<_> = group_tasks
            .into_iter()
            .map(|task_id| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .complete_task(CompleteTaskRequest {
                            task_id,
                            answers: json!({}),
                        })
                        .await
                })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            let response = handle.await.expect("task joins").expect("completion succeeds");
            outcomes.push(response.outcome);
        }
        outcomes.sort_by_key(|outcome| outcome.as_str());
        assert_eq!(outcomes, vec![Outcome::Advanced, Outcome::Waiting]);

        let timeline = service.timeline(contract_id).await.expect("timeline");
        let finance_tasks = timeline
            .tasks
            .iter()
            .filter(|assigned| assigned.task.step == Step::MaliIsler)
            .count();
        assert_eq!(finance_tasks, 1);
        assert_eq!(
            timeline.contract.contract.current_status,
            ContractStatus::MaliIsler
        );
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_completions_of_one_task_succeed_once(service: Service) {
    let started = service
        .start_contract(StartContractRequest {
            doctor_name: "Dr. Mert Aydın".to_owned(),
            doctor_role: "Ortopedi".to_owned(),
            start_date: "2025-05-12".to_owned(),
            created_by: APPROVER,
        })
        .await
        .expect("contract starts");
    let pending = service.pending_tasks(APPROVER).await.expect("pending tasks");
    let task_id = pending
        .into_iter()
        .find(|overview| overview.assigned.task.contract_id == started.contract_id)
        .map(|overview| overview.assigned.task.id)
        .expect("initial task");

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = Arc::clone(&service);
            tokio::spawn(async move {
                service
                    .complete_task(CompleteTaskRequest {
                        task_id,
                        answers: json!({}),
                    })
                    .await
            })
        })
        .collect();

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task joins").is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let timeline = service.timeline(started.contract_id).await.expect("timeline");
    let review_tasks = timeline
        .tasks
        .iter()
        .filter(|assigned| assigned.task.step == Step::MerkezHakedis)
        .count();
    assert_eq!(review_tasks, 1);
}
