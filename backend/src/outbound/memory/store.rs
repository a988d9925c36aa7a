//! Process-local record store.
//!
//! Each contract and its tasks live behind their own async mutex, so a
//! completion holds only its contract's lock for the whole read-decide-write
//! sequence. The directory sits behind a separate `RwLock`. Anything that
//! needs both takes the directory first: completions and task creation hold a
//! directory read for their whole write, and user deletion checks references
//! under the directory write lock, so a deleted user is never assigned.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::seed;
use crate::domain::ports::{CompletionRecord, WorkflowRepository, WorkflowRepositoryError};
use crate::domain::workflow::{CompletionContext, TaskAnswers, TransitionPlanner};
use crate::domain::{
    AssignedTask, Contract, ContractDraft, ContractId, ContractStatus, ContractSummary, NewTask,
    Role, Task, TaskId, TaskOverview, TaskStatus, Unit, UnitDraft, UnitId, User, UserId,
    UserProfile,
};

pub(super) struct StoredUser {
    pub(super) user: User,
    #[expect(dead_code, reason = "passwords are write-only and never read back")]
    pub(super) password: Option<String>,
}

pub(super) struct StoredUnit {
    pub(super) id: UnitId,
    pub(super) name: String,
    pub(super) training_contact: Option<UserId>,
}

#[derive(Default)]
pub(super) struct Directory {
    pub(super) users: BTreeMap<UserId, StoredUser>,
    pub(super) units: BTreeMap<UnitId, StoredUnit>,
    next_user: i32,
    next_unit: i32,
}

impl Directory {
    pub(super) fn insert_user(&mut self, profile: &UserProfile, password: Option<String>, now: DateTime<Utc>) -> User {
        self.next_user += 1;
        let user = User {
            id: UserId::new(self.next_user),
            name: profile.name().to_owned(),
            email: profile.email().to_owned(),
            role: profile.role(),
            created_at: now,
        };
        self.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password,
            },
        );
        user
    }

    pub(super) fn insert_unit(&mut self, draft: &UnitDraft) -> UnitId {
        self.next_unit += 1;
        let id = UnitId::new(self.next_unit);
        self.units.insert(
            id,
            StoredUnit {
                id,
                name: draft.name().to_owned(),
                training_contact: draft.training_contact(),
            },
        );
        id
    }

    pub(super) fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|stored| stored.user.email == email && Some(stored.user.id) != except)
    }

    pub(super) fn unit_view(&self, unit: &StoredUnit) -> Unit {
        Unit {
            id: unit.id,
            name: unit.name.clone(),
            training_contact_user_id: unit.training_contact,
            trainer_name: unit
                .training_contact
                .and_then(|id| self.users.get(&id))
                .map(|stored| stored.user.name.clone()),
        }
    }

    fn staff(&self) -> Vec<User> {
        self.users.values().map(|stored| stored.user.clone()).collect()
    }
}

struct ContractRecord {
    contract: Contract,
    /// Oldest first.
    tasks: Vec<Task>,
}

/// In-memory implementation of the workflow and directory ports.
#[derive(Default)]
pub struct MemoryStore {
    pub(super) directory: RwLock<Directory>,
    contracts: Mutex<HashMap<ContractId, Arc<Mutex<ContractRecord>>>>,
    task_index: Mutex<HashMap<TaskId, ContractId>>,
    next_contract: AtomicI32,
    next_task: AtomicI32,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding one user per role and the two training units.
    ///
    /// # Examples
    /// ```
    /// # tokio::runtime::Runtime::new().unwrap().block_on(async {
    /// use chrono::Utc;
    /// use onboarding_backend::domain::ports::DirectoryRepository;
    /// use onboarding_backend::outbound::memory::MemoryStore;
    ///
    /// let store = MemoryStore::seeded(Utc::now());
    /// let users = store.list_users().await.expect("directory readable");
    /// assert_eq!(users.len(), 11);
    /// # });
    /// ```
    pub fn seeded(now: DateTime<Utc>) -> Self {
        let mut directory = Directory::default();
        for (name, email, role) in seed::STAFF {
            if let Ok(profile) = UserProfile::new(name, email, role) {
                directory.insert_user(&profile, None, now);
            }
        }
        for (name, contact) in seed::UNITS {
            if let Ok(draft) = UnitDraft::new(name, i32::try_from(contact).ok().map(UserId::new)) {
                directory.insert_unit(&draft);
            }
        }
        Self {
            directory: RwLock::new(directory),
            ..Self::default()
        }
    }

    fn allocate_task(&self, contract_id: ContractId, task: &NewTask, now: DateTime<Utc>) -> Task {
        Task {
            id: TaskId::new(self.next_task.fetch_add(1, Ordering::SeqCst) + 1),
            contract_id,
            assigned_to: task.assigned_to,
            step: task.step,
            description: task.description.clone(),
            status: TaskStatus::Pending,
            answers: None,
            created_at: now,
            completed_at: None,
        }
    }

    async fn record(
        &self,
        contract_id: ContractId,
    ) -> Option<Arc<Mutex<ContractRecord>>> {
        self.contracts.lock().await.get(&contract_id).cloned()
    }

    async fn all_records(&self) -> Vec<Arc<Mutex<ContractRecord>>> {
        self.contracts.lock().await.values().cloned().collect()
    }

    async fn index_tasks(&self, tasks: &[Task]) {
        let mut index = self.task_index.lock().await;
        for task in tasks {
            index.insert(task.id, task.contract_id);
        }
    }

    async fn summaries<F>(&self, keep: F) -> Vec<ContractSummary>
    where
        F: Fn(&Contract) -> bool,
    {
        let names = self.user_names().await;
        let mut summaries = Vec::new();
        for record in self.all_records().await {
            let record = record.lock().await;
            if keep(&record.contract) {
                summaries.push(ContractSummary {
                    contract: record.contract.clone(),
                    created_by_name: names.get(&record.contract.created_by).map(|(name, _)| name.clone()),
                });
            }
        }
        summaries.sort_by(|a, b| {
            b.contract
                .created_at
                .cmp(&a.contract.created_at)
                .then(b.contract.id.cmp(&a.contract.id))
        });
        summaries
    }

    async fn overviews<F>(&self, keep: F) -> Vec<TaskOverview>
    where
        F: Fn(&Task) -> bool,
    {
        let names = self.user_names().await;
        let mut overviews = Vec::new();
        for record in self.all_records().await {
            let record = record.lock().await;
            for task in record.tasks.iter().filter(|task| keep(task)) {
                if let Some(assigned) = assign_names(task, &names) {
                    overviews.push(TaskOverview {
                        assigned,
                        doctor_name: record.contract.data.doctor_name.clone(),
                        contract_status: record.contract.current_status,
                    });
                }
            }
        }
        overviews.sort_by(|a, b| {
            b.assigned
                .task
                .created_at
                .cmp(&a.assigned.task.created_at)
                .then(b.assigned.task.id.cmp(&a.assigned.task.id))
        });
        overviews
    }

    async fn user_names(&self) -> HashMap<UserId, (String, Role)> {
        self.directory
            .read()
            .await
            .users
            .values()
            .map(|stored| (stored.user.id, (stored.user.name.clone(), stored.user.role)))
            .collect()
    }

    /// True when any contract or task references `user_id`.
    pub(super) async fn references_user(&self, user_id: UserId) -> bool {
        for record in self.all_records().await {
            let record = record.lock().await;
            if record.contract.created_by == user_id
                || record.tasks.iter().any(|task| task.assigned_to == user_id)
            {
                return true;
            }
        }
        false
    }
}

fn assign_names(task: &Task, names: &HashMap<UserId, (String, Role)>) -> Option<AssignedTask> {
    names.get(&task.assigned_to).map(|(name, role)| AssignedTask {
        task: task.clone(),
        assignee_name: name.clone(),
        assignee_role: *role,
    })
}

#[async_trait]
impl WorkflowRepository for MemoryStore {
    async fn create_contract(
        &self,
        draft: &ContractDraft,
        first_task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<(Contract, Task), WorkflowRepositoryError> {
        // Held until the contract is indexed; user deletion checks
        // references under the write lock.
        let directory = self.directory.read().await;
        for user_id in [draft.created_by(), first_task.assigned_to] {
            if !directory.users.contains_key(&user_id) {
                return Err(WorkflowRepositoryError::unknown_user(user_id));
            }
        }

        let contract = Contract {
            id: ContractId::new(self.next_contract.fetch_add(1, Ordering::SeqCst) + 1),
            current_status: ContractStatus::MaliGmy,
            created_by: draft.created_by(),
            data: draft.data().clone(),
            created_at: now,
        };
        let task = self.allocate_task(contract.id, first_task, now);
        self.contracts.lock().await.insert(
            contract.id,
            Arc::new(Mutex::new(ContractRecord {
                contract: contract.clone(),
                tasks: vec![task.clone()],
            })),
        );
        self.index_tasks(std::slice::from_ref(&task)).await;
        drop(directory);
        Ok((contract, task))
    }

    async fn find_contract(
        &self,
        contract_id: ContractId,
    ) -> Result<Option<ContractSummary>, WorkflowRepositoryError> {
        let Some(record) = self.record(contract_id).await else {
            return Ok(None);
        };
        let contract = record.lock().await.contract.clone();
        let created_by_name = self
            .directory
            .read()
            .await
            .users
            .get(&contract.created_by)
            .map(|stored| stored.user.name.clone());
        Ok(Some(ContractSummary {
            contract,
            created_by_name,
        }))
    }

    async fn list_contracts(&self) -> Result<Vec<ContractSummary>, WorkflowRepositoryError> {
        Ok(self.summaries(|_| true).await)
    }

    async fn list_contracts_by_creator(
        &self,
        user_id: UserId,
    ) -> Result<Vec<ContractSummary>, WorkflowRepositoryError> {
        Ok(self.summaries(|contract| contract.created_by == user_id).await)
    }

    async fn update_contract_status(
        &self,
        contract_id: ContractId,
        status: ContractStatus,
    ) -> Result<(), WorkflowRepositoryError> {
        let record = self
            .record(contract_id)
            .await
            .ok_or_else(|| WorkflowRepositoryError::contract_not_found(contract_id))?;
        record.lock().await.contract.current_status = status;
        Ok(())
    }

    async fn create_task(
        &self,
        contract_id: ContractId,
        task: &NewTask,
        now: DateTime<Utc>,
    ) -> Result<Task, WorkflowRepositoryError> {
        let directory = self.directory.read().await;
        if !directory.users.contains_key(&task.assigned_to) {
            return Err(WorkflowRepositoryError::unknown_user(task.assigned_to));
        }
        let record = self
            .record(contract_id)
            .await
            .ok_or_else(|| WorkflowRepositoryError::contract_not_found(contract_id))?;
        let created = self.allocate_task(contract_id, task, now);
        record.lock().await.tasks.push(created.clone());
        self.index_tasks(std::slice::from_ref(&created)).await;
        drop(directory);
        Ok(created)
    }

    async fn find_task(&self, task_id: TaskId) -> Result<Option<Task>, WorkflowRepositoryError> {
        let Some(contract_id) = self.task_index.lock().await.get(&task_id).copied() else {
            return Ok(None);
        };
        let Some(record) = self.record(contract_id).await else {
            return Ok(None);
        };
        let record = record.lock().await;
        Ok(record.tasks.iter().find(|task| task.id == task_id).cloned())
    }

    async fn contract_tasks(
        &self,
        contract_id: ContractId,
    ) -> Result<Vec<AssignedTask>, WorkflowRepositoryError> {
        let names = self.user_names().await;
        let Some(record) = self.record(contract_id).await else {
            return Ok(Vec::new());
        };
        let record = record.lock().await;
        Ok(record
            .tasks
            .iter()
            .filter_map(|task| assign_names(task, &names))
            .collect())
    }

    async fn list_pending_tasks(
        &self,
        contract_id: ContractId,
        excluding: TaskId,
    ) -> Result<Vec<Task>, WorkflowRepositoryError> {
        let Some(record) = self.record(contract_id).await else {
            return Ok(Vec::new());
        };
        let record = record.lock().await;
        Ok(record
            .tasks
            .iter()
            .filter(|task| task.is_pending() && task.id != excluding)
            .cloned()
            .collect())
    }

    async fn list_tasks(&self) -> Result<Vec<TaskOverview>, WorkflowRepositoryError> {
        Ok(self.overviews(|_| true).await)
    }

    async fn pending_tasks_for(
        &self,
        user_id: UserId,
    ) -> Result<Vec<TaskOverview>, WorkflowRepositoryError> {
        Ok(self
            .overviews(|task| task.is_pending() && task.assigned_to == user_id)
            .await)
    }

    async fn complete_task(
        &self,
        task_id: TaskId,
        answers: &TaskAnswers,
        now: DateTime<Utc>,
        planner: Arc<dyn TransitionPlanner>,
    ) -> Result<CompletionRecord, WorkflowRepositoryError> {
        let not_found = || WorkflowRepositoryError::task_not_found(task_id);
        let contract_id = self
            .task_index
            .lock()
            .await
            .get(&task_id)
            .copied()
            .ok_or_else(not_found)?;
        let handle = self.record(contract_id).await.ok_or_else(not_found)?;
        // Held until the new tasks are indexed.
        let directory = self.directory.read().await;
        let staff = directory.staff();

        let mut record = handle.lock().await;
        let position = record
            .tasks
            .iter()
            .position(|task| task.id == task_id && task.is_pending())
            .ok_or_else(not_found)?;

        let mut completed = record.tasks[position].clone();
        completed.status = TaskStatus::Completed;
        completed.answers = Some(answers.clone());
        completed.completed_at = Some(now);

        let mut contract_tasks = record.tasks.clone();
        contract_tasks[position] = completed.clone();
        let context = CompletionContext {
            task: completed.clone(),
            contract: record.contract.clone(),
            contract_tasks,
            staff,
        };
        let plan = planner
            .plan(&context)
            .map_err(WorkflowRepositoryError::planning)?;

        let created: Vec<Task> = plan
            .new_tasks
            .iter()
            .map(|task| self.allocate_task(contract_id, task, now))
            .collect();
        record.tasks[position] = completed.clone();
        record.tasks.extend(created.iter().cloned());
        if let Some(status) = plan.new_status {
            record.contract.current_status = status;
        }
        self.index_tasks(&created).await;
        drop(record);
        drop(directory);

        debug!(
            task_id = %task_id,
            contract_id = %contract_id,
            created = created.len(),
            "completion applied"
        );
        Ok(CompletionRecord {
            task: completed,
            plan,
            created,
        })
    }
}
