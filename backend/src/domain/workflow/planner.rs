//! Bridge between the pure engine and the record store.
//!
//! Stores call a [`TransitionPlanner`] inside their per-contract critical
//! section, after marking the task completed, and persist whatever plan comes
//! back. A planning error aborts the completion.

use super::{
    AnswersError, Completion, Outcome, Step, StepAnswers, StepSet, TransitionTable,
    UnassignedRole, assign, INITIAL_TASK,
};
use crate::domain::{Contract, ContractStatus, NewTask, Role, Task, User, UserId};

/// Everything a planner may look at for one completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionContext {
    /// The task just completed, with its answers.
    pub task: Task,
    pub contract: Contract,
    /// All tasks of the contract, reflecting the completion.
    pub contract_tasks: Vec<Task>,
    /// Directory snapshot for role resolution.
    pub staff: Vec<User>,
}

/// Resolved effects to persist alongside the completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    pub outcome: Outcome,
    pub message: &'static str,
    pub new_status: Option<ContractStatus>,
    pub new_tasks: Vec<NewTask>,
}

impl TransitionPlan {
    /// The single step opened by this plan, if exactly one task is created.
    pub fn next_step(&self) -> Option<Step> {
        match self.new_tasks.as_slice() {
            [only] => Some(only.step),
            _ => None,
        }
    }

    pub fn created_steps(&self) -> Vec<Step> {
        self.new_tasks.iter().map(|task| task.step).collect()
    }
}

/// Reasons a completion cannot be planned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanningError {
    #[error(transparent)]
    InvalidAnswers(#[from] AnswersError),
    #[error("no user holds the {role} role")]
    NoAssignee { role: Role },
}

impl From<UnassignedRole> for PlanningError {
    fn from(value: UnassignedRole) -> Self {
        Self::NoAssignee { role: value.role }
    }
}

/// Decide the consequences of a completion.
#[cfg_attr(test, mockall::automock)]
pub trait TransitionPlanner: Send + Sync {
    fn plan(&self, context: &CompletionContext) -> Result<TransitionPlan, PlanningError>;
}

/// Planner driven by a [`TransitionTable`] and the lowest-id assignment policy.
#[derive(Debug, Clone)]
pub struct WorkflowPlanner {
    table: TransitionTable,
}

impl WorkflowPlanner {
    pub fn new(table: TransitionTable) -> Self {
        Self { table }
    }
}

impl Default for WorkflowPlanner {
    fn default() -> Self {
        Self::new(TransitionTable::standard())
    }
}

impl TransitionPlanner for WorkflowPlanner {
    fn plan(&self, context: &CompletionContext) -> Result<TransitionPlan, PlanningError> {
        let empty = super::TaskAnswers::default();
        let raw = context.task.answers.as_ref().unwrap_or(&empty);
        let answers = StepAnswers::parse(context.task.step, raw)?;
        let completed: StepSet = context
            .contract_tasks
            .iter()
            .chain(std::iter::once(&context.task))
            .filter(|task| task.is_completed())
            .map(|task| task.step)
            .collect();

        let decision = self.table.advance(&Completion {
            status: context.contract.current_status,
            answers: &answers,
            completed,
        });

        let new_tasks = decision
            .tasks
            .iter()
            .map(|spec| assign(spec, context.contract.created_by, &context.staff))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(TransitionPlan {
            outcome: decision.outcome,
            message: decision.message,
            new_status: decision.new_status,
            new_tasks,
        })
    }
}

/// The first task of a new contract, owned by its creator.
pub fn initial_task(created_by: UserId) -> NewTask {
    NewTask {
        assigned_to: created_by,
        step: INITIAL_TASK.step,
        description: INITIAL_TASK.description.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;
    use crate::domain::workflow::TaskAnswers;
    use crate::domain::{ContractData, ContractId, TaskId, TaskStatus};

    fn at(minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 9, minute, 0)
            .single()
            .expect("valid time")
    }

    fn staff_member(id: i32, role: Role) -> User {
        User {
            id: UserId::new(id),
            name: format!("Personel {id}"),
            email: format!("p{id}@hastane.com"),
            role,
            created_at: at(0),
        }
    }

    fn task(id: i32, step: Step, status: TaskStatus) -> Task {
        Task {
            id: TaskId::new(id),
            contract_id: ContractId::new(1),
            assigned_to: UserId::new(1),
            step,
            description: "görev".to_owned(),
            status,
            answers: None,
            created_at: at(id as u32),
            completed_at: (status == TaskStatus::Completed).then(|| at(30)),
        }
    }

    #[fixture]
    fn context() -> CompletionContext {
        let mut completed = task(3, Step::InsanKaynaklari, TaskStatus::Completed);
        completed.answers = Some(
            TaskAnswers::try_from(json!({ "oracle_girisi": true })).expect("object"),
        );
        CompletionContext {
            task: completed.clone(),
            contract: Contract {
                id: ContractId::new(1),
                current_status: ContractStatus::ParalelSurec,
                created_by: UserId::new(1),
                data: ContractData {
                    doctor_name: "Dr. Ahmet Kaya".to_owned(),
                    doctor_role: "Kardiyoloji".to_owned(),
                    start_date: chrono::NaiveDate::from_ymd_opt(2025, 3, 1)
                        .expect("valid date"),
                },
                created_at: at(0),
            },
            contract_tasks: vec![
                task(1, Step::MaliGmy, TaskStatus::Completed),
                task(2, Step::MerkezHakedis, TaskStatus::Completed),
                completed,
                task(4, Step::Ruhsatlandirma, TaskStatus::Pending),
            ],
            staff: vec![
                staff_member(1, Role::MaliGmy),
                staff_member(8, Role::MaliIsler),
                staff_member(5, Role::MaliIsler),
            ],
        }
    }

    #[rstest]
    fn waits_while_a_sibling_is_pending(context: CompletionContext) {
        let plan = WorkflowPlanner::default().plan(&context).expect("plan succeeds");
        assert_eq!(plan.outcome, Outcome::Waiting);
        assert!(plan.new_tasks.is_empty());
    }

    #[rstest]
    fn join_assigns_finance_to_lowest_id(mut context: CompletionContext) {
        context.contract_tasks[3].status = TaskStatus::Completed;
        let plan = WorkflowPlanner::default().plan(&context).expect("plan succeeds");
        assert_eq!(plan.outcome, Outcome::Advanced);
        assert_eq!(plan.new_status, Some(ContractStatus::MaliIsler));
        assert_eq!(plan.next_step(), Some(Step::MaliIsler));
        assert_eq!(
            plan.new_tasks.first().map(|task| task.assigned_to),
            Some(UserId::new(5))
        );
    }

    #[rstest]
    fn join_without_finance_staff_fails(mut context: CompletionContext) {
        context.contract_tasks[3].status = TaskStatus::Completed;
        context.staff.retain(|user| user.role != Role::MaliIsler);
        let err = WorkflowPlanner::default()
            .plan(&context)
            .expect_err("nobody can take the task");
        assert_eq!(
            err,
            PlanningError::NoAssignee {
                role: Role::MaliIsler
            }
        );
    }

    #[rstest]
    fn mistyped_answers_fail_planning(mut context: CompletionContext) {
        context.task.answers =
            Some(TaskAnswers::try_from(json!({ "oracle_girisi": "evet" })).expect("object"));
        let err = WorkflowPlanner::default()
            .plan(&context)
            .expect_err("wrong answer type");
        assert!(matches!(err, PlanningError::InvalidAnswers(_)));
    }

    #[rstest]
    fn initial_task_belongs_to_creator() {
        let task = initial_task(UserId::new(12));
        assert_eq!(task.assigned_to, UserId::new(12));
        assert_eq!(task.step, Step::MaliGmy);
        assert_eq!(
            task.description,
            "Doktor bilgilerini doğrulayın ve süreci başlatın."
        );
    }
}
