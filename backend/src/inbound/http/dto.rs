//! JSON response bodies shared by the workflow and directory handlers.
//!
//! Field names are snake_case; identifiers are plain integers and enum values
//! travel as their stored SCREAMING_SNAKE_CASE strings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::workflow::{StepProgress, StepProjection};
use crate::domain::{AssignedTask, ContractSummary, Role, TaskOverview, Unit, User};

/// Intake details stored on a contract.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContractDataBody {
    #[schema(example = "Dr. Ayşe Demir")]
    pub doctor_name: String,
    #[schema(example = "Kardiyoloji Uzmanı")]
    pub doctor_role: String,
    pub start_date: NaiveDate,
}

/// One contract in a listing.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContractBody {
    pub id: i32,
    #[schema(example = "MERKEZ_HAKEDIS")]
    pub current_status: String,
    pub created_by: i32,
    /// `null` when the creating user no longer exists.
    pub created_by_name: Option<String>,
    pub data: ContractDataBody,
    pub created_at: DateTime<Utc>,
}

impl From<ContractSummary> for ContractBody {
    fn from(summary: ContractSummary) -> Self {
        let ContractSummary {
            contract,
            created_by_name,
        } = summary;
        Self {
            id: contract.id.get(),
            current_status: contract.current_status.as_str().to_owned(),
            created_by: contract.created_by.get(),
            created_by_name,
            data: ContractDataBody {
                doctor_name: contract.data.doctor_name,
                doctor_role: contract.data.doctor_role,
                start_date: contract.data.start_date,
            },
            created_at: contract.created_at,
        }
    }
}

/// A task with its assignee's name and role.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskBody {
    pub id: i32,
    pub contract_id: i32,
    pub assigned_to: i32,
    #[schema(example = "INSAN_KAYNAKLARI")]
    pub step_name: String,
    pub description: String,
    #[schema(example = "PENDING")]
    pub status: String,
    /// Answers submitted on completion.
    #[schema(value_type = Option<Object>)]
    pub data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_user_name: String,
    #[schema(example = "INSAN_KAYNAKLARI")]
    pub assigned_user_role: String,
}

impl From<AssignedTask> for TaskBody {
    fn from(assigned: AssignedTask) -> Self {
        let AssignedTask {
            task,
            assignee_name,
            assignee_role,
        } = assigned;
        Self {
            id: task.id.get(),
            contract_id: task.contract_id.get(),
            assigned_to: task.assigned_to.get(),
            step_name: task.step.as_str().to_owned(),
            description: task.description,
            status: task.status.as_str().to_owned(),
            data: task.answers.map(|answers| answers.into_value()),
            created_at: task.created_at,
            completed_at: task.completed_at,
            assigned_user_name: assignee_name,
            assigned_user_role: assignee_role.as_str().to_owned(),
        }
    }
}

/// A task in a cross-contract listing or inbox.
#[derive(Debug, Serialize, ToSchema)]
pub struct TaskOverviewBody {
    #[serde(flatten)]
    pub task: TaskBody,
    pub doctor_name: String,
    #[schema(example = "PARALEL_SUREC")]
    pub current_status: String,
}

impl From<TaskOverview> for TaskOverviewBody {
    fn from(overview: TaskOverview) -> Self {
        Self {
            task: overview.assigned.into(),
            doctor_name: overview.doctor_name,
            current_status: overview.contract_status.as_str().to_owned(),
        }
    }
}

/// The contract header shown above a timeline.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimelineContractBody {
    pub id: i32,
    pub doctor_name: String,
    pub doctor_role: String,
    pub start_date: NaiveDate,
    pub current_status: String,
    /// Name of the creating user.
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<ContractSummary> for TimelineContractBody {
    fn from(summary: ContractSummary) -> Self {
        let contract = summary.contract;
        Self {
            id: contract.id.get(),
            doctor_name: contract.data.doctor_name,
            doctor_role: contract.data.doctor_role,
            start_date: contract.data.start_date,
            current_status: contract.current_status.as_str().to_owned(),
            created_by: summary.created_by_name,
            created_at: contract.created_at,
        }
    }
}

/// One step of a contract timeline.
#[derive(Debug, Serialize, ToSchema)]
pub struct StepBody {
    #[schema(example = "MALI_GMY")]
    pub id: String,
    #[schema(example = "Mali GMY Onayı")]
    pub name: String,
    pub order: u8,
    pub parallel: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "A")]
    pub parallel_group: Option<String>,
    #[schema(example = "COMPLETED")]
    pub status: String,
    pub completed_by: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
    pub assigned_to: Option<String>,
    pub tasks: Vec<TaskBody>,
}

fn progress_label(progress: StepProgress) -> &'static str {
    match progress {
        StepProgress::Completed => "COMPLETED",
        StepProgress::Pending => "PENDING",
        StepProgress::Waiting => "WAITING",
    }
}

impl From<StepProjection> for StepBody {
    fn from(projection: StepProjection) -> Self {
        let group = projection.parallel_group();
        Self {
            id: projection.step.as_str().to_owned(),
            name: projection.name().to_owned(),
            order: projection.order(),
            parallel: group.is_some(),
            parallel_group: group.map(|group| group.as_str().to_owned()),
            status: progress_label(projection.progress).to_owned(),
            completed_by: projection.completed_by,
            completed_at: projection.completed_at,
            assigned_to: projection.assigned_to,
            tasks: projection.tasks.into_iter().map(TaskBody::from).collect(),
        }
    }
}

/// A staff member. Passwords are never returned.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserBody {
    pub id: i32,
    #[schema(example = "Ayşe Kaya")]
    pub name: String,
    #[schema(example = "ik@hastane.local")]
    pub email: String,
    #[schema(example = "INSAN_KAYNAKLARI")]
    pub role: String,
    #[schema(example = "İnsan Kaynakları")]
    pub role_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserBody {
    fn from(user: User) -> Self {
        Self {
            id: user.id.get(),
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_owned(),
            role_name: user.role.display_name().to_owned(),
            created_at: user.created_at,
        }
    }
}

/// A hospital unit and its training contact.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitBody {
    pub id: i32,
    #[schema(example = "Kalite")]
    pub name: String,
    pub training_contact_user_id: Option<i32>,
    pub trainer_name: Option<String>,
}

impl From<Unit> for UnitBody {
    fn from(unit: Unit) -> Self {
        Self {
            id: unit.id.get(),
            name: unit.name,
            training_contact_user_id: unit.training_contact_user_id.map(|id| id.get()),
            trainer_name: unit.trainer_name,
        }
    }
}

/// A department role from the catalogue.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoleBody {
    #[schema(example = "MALI_ISLER")]
    pub id: String,
    #[schema(example = "Mali İşler")]
    pub name: String,
    pub description: String,
}

impl From<Role> for RoleBody {
    fn from(role: Role) -> Self {
        Self {
            id: role.as_str().to_owned(),
            name: role.display_name().to_owned(),
            description: role.description().to_owned(),
        }
    }
}
