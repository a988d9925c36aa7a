//! Task endpoints: listings, the per-user inbox and completion.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::{CompleteTaskRequest, CompleteTaskResponse};
use crate::domain::workflow::Outcome;
use crate::domain::{ContractStatus, TaskId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::TaskOverviewBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const TASK_ID: FieldName = FieldName::new("task_id");
const USER_ID: FieldName = FieldName::new("user_id");

/// Result of completing a task.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompletionBody {
    pub task_id: i32,
    pub contract_id: i32,
    #[schema(example = "ADVANCED")]
    pub outcome: String,
    pub message: String,
    /// Present when the contract status changed. The first parallel stage is
    /// announced as `PARALEL`.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "PARALEL")]
    pub next_status: Option<String>,
    /// Present when exactly one follow-up task was opened.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "MERKEZ_HAKEDIS")]
    pub next_step: Option<String>,
    /// Set to `BACK_TO_START` when the contract has not arrived.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "BACK_TO_START")]
    pub status: Option<String>,
    pub created_steps: Vec<String>,
}

const fn next_status_label(status: ContractStatus) -> &'static str {
    match status {
        ContractStatus::ParalelSurec => "PARALEL",
        other => other.as_str(),
    }
}

impl From<CompleteTaskResponse> for CompletionBody {
    fn from(response: CompleteTaskResponse) -> Self {
        Self {
            task_id: response.task_id.get(),
            contract_id: response.contract_id.get(),
            outcome: response.outcome.as_str().to_owned(),
            message: response.message.to_owned(),
            next_status: response
                .next_status
                .map(|status| next_status_label(status).to_owned()),
            next_step: response.next_step.map(|step| step.as_str().to_owned()),
            status: (response.outcome == Outcome::BackToStart)
                .then(|| response.outcome.as_str().to_owned()),
            created_steps: response
                .created_steps
                .into_iter()
                .map(|step| step.as_str().to_owned())
                .collect(),
        }
    }
}

/// Every task across contracts, newest first.
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Tasks", body = [TaskOverviewBody]),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "listTasks"
)]
#[get("/tasks")]
pub async fn list_tasks(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let tasks = state.workflow_query.list_tasks().await?;
    let body: Vec<TaskOverviewBody> = tasks.into_iter().map(TaskOverviewBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Pending tasks assigned to one user.
#[utoipa::path(
    get,
    path = "/api/tasks/pending/{user_id}",
    params(("user_id" = i32, Path, description = "Assignee")),
    responses(
        (status = 200, description = "Inbox", body = [TaskOverviewBody]),
        (status = 400, description = "Invalid user id", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "pendingTasks"
)]
#[get("/tasks/pending/{user_id}")]
pub async fn pending_tasks(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(parse_id(&path.into_inner(), USER_ID)?);
    let tasks = state.workflow_query.pending_tasks(user_id).await?;
    let body: Vec<TaskOverviewBody> = tasks.into_iter().map(TaskOverviewBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Complete a pending task. The body is the department's answers object.
#[utoipa::path(
    post,
    path = "/api/tasks/{id}/complete",
    params(("id" = i32, Path, description = "Task id")),
    request_body(
        content = Object,
        description = "Step answers, e.g. {\"sozlesme_ulasti_mi\": true, \"sozlesme_onaylandi_mi\": true}"
    ),
    responses(
        (status = 200, description = "Task completed", body = CompletionBody),
        (status = 400, description = "Invalid answers", body = ErrorSchema),
        (status = 404, description = "Unknown or already completed task", body = ErrorSchema),
        (status = 409, description = "No user holds the next department role", body = ErrorSchema)
    ),
    tags = ["tasks"],
    operation_id = "completeTask"
)]
#[post("/tasks/{id}/complete")]
pub async fn complete_task(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<Value>,
) -> ApiResult<HttpResponse> {
    let task_id = TaskId::new(parse_id(&path.into_inner(), TASK_ID)?);
    let response = state
        .workflow
        .complete_task(CompleteTaskRequest {
            task_id,
            answers: payload.into_inner(),
        })
        .await?;
    Ok(HttpResponse::Ok().json(CompletionBody::from(response)))
}
