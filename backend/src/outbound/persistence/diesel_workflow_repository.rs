//! PostgreSQL-backed [`WorkflowRepository`].
//!
//! Completions run in one transaction that locks the contract row with
//! `SELECT … FOR UPDATE` before re-reading the task. Two completions on the
//! same contract therefore queue behind each other, and the second sees the
//! first one's writes when the planner evaluates a parallel join.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use super::error_mapping::{Failure, TxError, classify, pool_message};
use super::models::{
    ContractRow, NewContractRow, NewTaskRow, RowError, TaskRow, UserRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{contracts, tasks, users};
use crate::domain::ports::{CompletionRecord, WorkflowRepository, WorkflowRepositoryError};
use crate::domain::workflow::{CompletionContext, TaskAnswers, TransitionPlanner};
use crate::domain::{
    AssignedTask, Contract, ContractDraft, ContractId, ContractStatus, ContractSummary, NewTask,
    Task, TaskId, TaskOverview, TaskStatus, User, UserId,
};

/// Diesel implementation of the workflow record store.
#[derive(Clone)]
pub struct DieselWorkflowRepository {
    pool: DbPool,
}

impl DieselWorkflowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type Tx = TxError<WorkflowRepositoryError>;

fn map_pool_error(error: PoolError) -> WorkflowRepositoryError {
    WorkflowRepositoryError::connection(pool_message(error))
}

fn map_failure(failure: Failure) -> WorkflowRepositoryError {
    match failure {
        Failure::Connection(message) => WorkflowRepositoryError::connection(message),
        Failure::Query(message) => WorkflowRepositoryError::query(message),
        Failure::Unique { .. } => WorkflowRepositoryError::query("unique constraint violated"),
        Failure::ForeignKey { .. } => WorkflowRepositoryError::query("foreign key violation"),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> WorkflowRepositoryError {
    map_failure(classify(error))
}

fn map_tx_error(error: Tx) -> WorkflowRepositoryError {
    match error {
        TxError::Diesel(error) => map_diesel_error(error),
        TxError::Rejected(error) => error,
    }
}

fn corrupt(error: RowError) -> WorkflowRepositoryError {
    WorkflowRepositoryError::query(error.to_string())
}

fn task_row<'a>(contract_id: i32, task: &'a NewTask, now: DateTime<Utc>) -> NewTaskRow<'a> {
    NewTaskRow {
        contract_id,
        assigned_to: task.assigned_to.get(),
        step_name: task.step.as_str(),
        description: &task.description,
        status: TaskStatus::Pending.as_str(),
        created_at: now,
    }
}

/// Pending tasks on a contract other than `excluding`, oldest first.
fn pending_siblings(contract_id: ContractId, excluding: TaskId) -> tasks::BoxedQuery<'static, Pg> {
    tasks::table
        .filter(tasks::contract_id.eq(contract_id.get()))
        .filter(tasks::status.eq(TaskStatus::Pending.as_str()))
        .filter(tasks::id.ne(excluding.get()))
        .order(tasks::id.asc())
        .into_boxed()
}

fn assigned(row: TaskRow, name: String, role: &str) -> Result<AssignedTask, WorkflowRepositoryError> {
    let task = row.into_domain().map_err(corrupt)?;
    let assignee_role = role.parse().map_err(|err: crate::domain::RoleParseError| {
        WorkflowRepositoryError::query(format!("corrupt users row {}: {err}", task.assigned_to))
    })?;
    Ok(AssignedTask {
        task,
        assignee_name: name,
        assignee_role,
    })
}

fn summarise(rows: Vec<(ContractRow, Option<String>)>) -> Result<Vec<ContractSummary>, WorkflowRepositoryError> {
    rows.into_iter()
        .map(|(row, created_by_name)| {
            Ok(ContractSummary {
                contract: row.into_domain().map_err(corrupt)?,
                created_by_name,
            })
        })
        .collect()
}

type OverviewRow = (TaskRow, String, String, ContractRow);

fn overview((task, name, role, contract): OverviewRow) -> Result<TaskOverview, WorkflowRepositoryError> {
    let contract = contract.into_domain().map_err(corrupt)?;
    Ok(TaskOverview {
        assigned: assigned(task, name, &role)?,
        doctor_name: contract.data.doctor_name,
        contract_status: contract.current_status,
    })
}

async fn load_staff(conn: &mut AsyncPgConnection) -> Result<Vec<User>, Tx> {
    let rows: Vec<UserRow> = users::table
        .order(users::id.asc())
        .select(UserRow::as_select())
        .load(conn)
        .await?;
    rows.into_iter()
        .map(|row| row.into_domain().map_err(|err| TxError::Rejected(corrupt(err))))
        .collect()
}

async fn insert_tasks(
    conn: &mut AsyncPgConnection,
    contract_id: i32,
    new_tasks: &[NewTask],
    now: DateTime<Utc>,
) -> Result<Vec<Task>, Tx> {
    if new_tasks.is_empty() {
        return Ok(Vec::new());
    }
    let rows: Vec<NewTaskRow<'_>> = new_tasks
        .iter()
        .map(|task| task_row(contract_id, task, now))
        .collect();
    let inserted: Vec<TaskRow> = diesel::insert_into(tasks::table)
        .values(&rows)
        .returning(TaskRow::as_returning())
        .get_results(conn)
        .await?;
    inserted
        .into_iter()
        .map(|row| row.into_domain().map_err(|err| TxError::Rejected(corrupt(err))))
        .collect()
}

#[async_trait]
impl WorkflowRepository for DieselWorkflowRepository {
    async fn create_contract(
        &self,
        draft: &ContractDraft,
        first_task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<(Contract, Task), WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let data = serde_json::to_value(draft.data())
            .map_err(|err| WorkflowRepositoryError::query(err.to_string()))?;
        let created_by = draft.created_by();
        let first_task = first_task.clone();

        let result = conn
            .transaction::<_, Tx, _>(|conn| {
                async move {
                    let contract: ContractRow = diesel::insert_into(contracts::table)
                        .values(&NewContractRow {
                            current_status: ContractStatus::MaliGmy.as_str(),
                            created_by: created_by.get(),
                            data,
                            created_at: now,
                        })
                        .returning(ContractRow::as_returning())
                        .get_result(conn)
                        .await?;
                    let mut created =
                        insert_tasks(conn, contract.id, std::slice::from_ref(&first_task), now)
                            .await?;
                    let contract = contract
                        .into_domain()
                        .map_err(|err| TxError::Rejected(corrupt(err)))?;
                    let task = created.pop().ok_or_else(|| {
                        TxError::Rejected(WorkflowRepositoryError::query("first task was not inserted"))
                    })?;
                    Ok((contract, task))
                }
                .scope_boxed()
            })
            .await;

        result.map_err(|err| match err {
            TxError::Diesel(error) => match classify(error) {
                Failure::ForeignKey { .. } => WorkflowRepositoryError::unknown_user(created_by),
                other => map_failure(other),
            },
            TxError::Rejected(error) => error,
        })
    }

    async fn find_contract(
        &self,
        contract_id: ContractId,
    ) -> Result<Option<ContractSummary>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(ContractRow, Option<String>)> = contracts::table
            .left_join(users::table)
            .filter(contracts::id.eq(contract_id.get()))
            .select((ContractRow::as_select(), users::name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(summarise(rows)?.into_iter().next())
    }

    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = contracts::table
            .left_join(users::table)
            .order((contracts::created_at.desc(), contracts::id.desc()))
            .select((ContractRow::as_select(), users::name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        summarise(rows)
    }

    async fn list_contracts_by_creator(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ContractSummary>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = contracts::table
            .left_join(users::table)
            .filter(contracts::created_by.eq(user_id.get()))
            .order((contracts::created_at.desc(), contracts::id.desc()))
            .select((ContractRow::as_select(), users::name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        summarise(rows)
    }

    async fn update_contract_status(
        &self,
        contract_id: ContractId,
        status: ContractStatus,
    ) -> Result<(), WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(contracts::table.find(contract_id.get()))
            .set(contracts::current_status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if updated == 0 {
            return Err(WorkflowRepositoryError::contract_not_found(contract_id));
        }
        Ok(())
    }

    async fn create_task(
        &self,
        contract_id: ContractId,
        task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: TaskRow = diesel::insert_into(tasks::table)
            .values(&task_row(contract_id.get(), task, now))
            .returning(TaskRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| match classify(err) {
                Failure::ForeignKey { constraint }
                    if constraint.as_deref() == Some("tasks_contract_id_fkey") =>
                {
                    WorkflowRepositoryError::contract_not_found(contract_id)
                }
                Failure::ForeignKey { .. } => WorkflowRepositoryError::unknown_user(task.assigned_to),
                other => map_failure(other),
            })?;
        row.into_domain().map_err(corrupt)
    }

    async fn find_task(&self, task_id: TaskId) -> Result<Option<Task>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<TaskRow> = tasks::table
            .find(task_id.get())
            .select(TaskRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(TaskRow::into_domain).transpose().map_err(corrupt)
    }

    async fn contract_tasks(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<AssignedTask>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(TaskRow, String, String)> = tasks::table
            .inner_join(users::table)
            .filter(tasks::contract_id.eq(contract_id.get()))
            .order((tasks::created_at.asc(), tasks::id.asc()))
            .select((TaskRow::as_select(), users::name, users::role))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|(row, name, role)| assigned(row, name, &role))
            .collect()
    }

    async fn list_pending_tasks(
        &self,
        contract_id: ContractId,
        excluding: TaskId,
    ) -> Result<Vec<Task>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TaskRow> = pending_siblings(contract_id, excluding)
            .select(TaskRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row.into_domain().map_err(corrupt))
            .collect()
    }

    async fn list_tasks(&self) -> Result<Vec<TaskOverview>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OverviewRow> = tasks::table
            .inner_join(users::table)
            .inner_join(contracts::table)
            .order((tasks::created_at.desc(), tasks::id.desc()))
            .select((
                TaskRow::as_select(),
                users::name,
                users::role,
                ContractRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(overview).collect()
    }

    async fn pending_tasks_for(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TaskOverview>, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OverviewRow> = tasks::table
            .inner_join(users::table)
            .inner_join(contracts::table)
            .filter(tasks::assigned_to.eq(user_id.get()))
            .filter(tasks::status.eq(TaskStatus::Pending.as_str()))
            .order((tasks::created_at.desc(), tasks::id.desc()))
            .select((
                TaskRow::as_select(),
                users::name,
                users::role,
                ContractRow::as_select(),
            ))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(overview).collect()
    }

    async fn complete_task(
        &self,
        task_id: TaskId,
        answers: &TaskAnswers,
        now: DateTime<Utc>,
        planner: Arc<dyn TransitionPlanner>,
    ) -> Result<CompletionRecord, WorkflowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let answers = answers.clone().into_value();
        let not_found = move || TxError::Rejected(WorkflowRepositoryError::task_not_found(task_id));

        let record = conn
            .transaction::<_, Tx, _>(|conn| {
                async move {
                    let contract_id: i32 = tasks::table
                        .find(task_id.get())
                        .select(tasks::contract_id)
                        .first(conn)
                        .await
                        .optional()?
                        .ok_or_else(not_found)?;

                    let contract: ContractRow = contracts::table
                        .find(contract_id)
                        .select(ContractRow::as_select())
                        .for_update()
                        .first(conn)
                        .await?;

                    let completed: TaskRow = diesel::update(
                        tasks::table
                            .find(task_id.get())
                            .filter(tasks::status.eq(TaskStatus::Pending.as_str())),
                    )
                    .set((
                        tasks::status.eq(TaskStatus::Completed.as_str()),
                        tasks::data.eq(Some(answers)),
                        tasks::completed_at.eq(Some(now)),
                    ))
                    .returning(TaskRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?
                    .ok_or_else(not_found)?;

                    let task_rows: Vec<TaskRow> = tasks::table
                        .filter(tasks::contract_id.eq(contract_id))
                        .order(tasks::id.asc())
                        .select(TaskRow::as_select())
                        .load(conn)
                        .await?;
                    let staff = load_staff(conn).await?;

                    let reject = |err: RowError| TxError::Rejected(corrupt(err));
                    let context = CompletionContext {
                        task: completed.into_domain().map_err(reject)?,
                        contract: contract.into_domain().map_err(reject)?,
                        contract_tasks: task_rows
                            .into_iter()
                            .map(TaskRow::into_domain)
                            .collect::<Result<_, _>>()
                            .map_err(reject)?,
                        staff,
                    };

                    let plan = planner
                        .plan(&context)
                        .map_err(|err| TxError::Rejected(WorkflowRepositoryError::planning(err)))?;

                    let created = insert_tasks(conn, contract_id, &plan.new_tasks, now).await?;
                    if let Some(status) = plan.new_status {
                        diesel::update(contracts::table.find(contract_id))
                            .set(contracts::current_status.eq(status.as_str()))
                            .execute(conn)
                            .await?;
                    }

                    Ok(CompletionRecord {
                        task: context.task,
                        plan,
                        created,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_tx_error)?;

        debug!(
            task_id = %task_id,
            contract_id = %record.task.contract_id,
            created = record.created.len(),
            "completion committed"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    //! Error mapping and query-shape coverage; query behaviour is exercised
    //! against a live database outside the unit test suite.
    use rstest::rstest;

    use super::*;
    use crate::domain::workflow::PlanningError;
    use crate::domain::Role;

    #[rstest]
    fn connection_failures_stay_connection_failures() {
        assert_eq!(
            map_failure(Failure::Connection("closed".to_owned())),
            WorkflowRepositoryError::connection("closed")
        );
    }

    #[rstest]
    fn rejected_transactions_surface_the_repository_error() {
        let planning = WorkflowRepositoryError::planning(PlanningError::NoAssignee {
            role: Role::MaliIsler,
        });
        assert_eq!(map_tx_error(TxError::Rejected(planning.clone())), planning);
    }

    #[rstest]
    fn diesel_not_found_inside_a_transaction_is_a_query_error() {
        assert!(matches!(
            map_tx_error(TxError::Diesel(diesel::result::Error::NotFound)),
            WorkflowRepositoryError::Query { .. }
        ));
    }

    #[rstest]
    fn new_task_rows_start_pending() {
        let task = NewTask {
            assigned_to: UserId::new(5),
            step: crate::domain::workflow::Step::MaliIsler,
            description: "Hakkediş entegrasyonunu yapın.".to_owned(),
        };
        let row = task_row(7, &task, crate::test_support::fixture_timestamp());
        assert_eq!(row.status, "PENDING");
        assert_eq!(row.step_name, "MALI_ISLER");
        assert_eq!(row.assigned_to, 5);
    }

    #[rstest]
    fn pending_sibling_query_excludes_the_completed_task() {
        let query =
            pending_siblings(ContractId::new(7), TaskId::new(3)).select(TaskRow::as_select());
        let sql = diesel::debug_query::<Pg, _>(&query).to_string();
        assert!(sql.contains(r#""tasks"."status" = $2"#), "{sql}");
        assert!(sql.contains(r#""tasks"."id" != $3"#), "{sql}");
        assert!(sql.contains(r#"ORDER BY "tasks"."id" ASC"#), "{sql}");
        assert!(sql.ends_with(r#"-- binds: [7, "PENDING", 3]"#), "{sql}");
    }
}
