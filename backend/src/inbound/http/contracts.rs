//! Contract endpoints: intake, listings and the per-step timeline.
//!
//! ```text
//! POST /api/contracts
//! GET  /api/contracts
//! GET  /api/contracts/by-user/{user_id}
//! GET  /api/contracts/{id}/timeline
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::StartContractRequest;
use crate::domain::{ContractId, Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::{ContractBody, StepBody, TaskBody, TimelineContractBody};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

const CONTRACT_ID: FieldName = FieldName::new("contract_id");
const USER_ID: FieldName = FieldName::new("user_id");

/// Intake form submitted by the initiating department.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartContractBody {
    #[schema(example = "Dr. Ayşe Demir")]
    pub doctor_name: Option<String>,
    #[schema(example = "Kardiyoloji Uzmanı")]
    pub doctor_role: Option<String>,
    #[schema(example = "2025-04-01")]
    pub start_date: Option<String>,
    #[schema(example = 1)]
    pub created_by: Option<i32>,
}

impl StartContractBody {
    fn into_request(self) -> Result<StartContractRequest, Error> {
        Ok(StartContractRequest {
            doctor_name: require(self.doctor_name, FieldName::new("doctor_name"))?,
            doctor_role: require(self.doctor_role, FieldName::new("doctor_role"))?,
            start_date: require(self.start_date, FieldName::new("start_date"))?,
            created_by: UserId::new(require(self.created_by, FieldName::new("created_by"))?),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContractStartedBody {
    #[schema(example = "Sözleşme başarıyla başlatıldı.")]
    pub message: String,
    pub contract_id: i32,
}

/// A contract, its steps in order and every task it owns.
#[derive(Debug, Serialize, ToSchema)]
pub struct TimelineBody {
    pub contract: TimelineContractBody,
    pub timeline: Vec<StepBody>,
    pub tasks: Vec<TaskBody>,
}

/// Start a contract; the first task goes to the creator.
#[utoipa::path(
    post,
    path = "/api/contracts",
    request_body = StartContractBody,
    responses(
        (status = 201, description = "Contract started", body = ContractStartedBody),
        (status = 400, description = "Invalid intake form", body = ErrorSchema),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["contracts"],
    operation_id = "startContract"
)]
#[post("/contracts")]
pub async fn start_contract(
    state: web::Data<HttpState>,
    payload: web::Json<StartContractBody>,
) -> ApiResult<HttpResponse> {
    let request = payload.into_inner().into_request()?;
    let response = state.workflow.start_contract(request).await?;
    info!(contract_id = %response.contract_id, "contract started over HTTP");
    Ok(HttpResponse::Created().json(ContractStartedBody {
        message: response.message.to_owned(),
        contract_id: response.contract_id.get(),
    }))
}

/// Every contract, newest first.
#[utoipa::path(
    get,
    path = "/api/contracts",
    responses(
        (status = 200, description = "Contracts", body = [ContractBody]),
        (status = 503, description = "Record store unavailable", body = ErrorSchema)
    ),
    tags = ["contracts"],
    operation_id = "listContracts"
)]
#[get("/contracts")]
pub async fn list_contracts(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let contracts = state.workflow_query.list_contracts().await?;
    let body: Vec<ContractBody> = contracts.into_iter().map(ContractBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Contracts started by one user, newest first.
#[utoipa::path(
    get,
    path = "/api/contracts/by-user/{user_id}",
    params(("user_id" = i32, Path, description = "Creating user")),
    responses(
        (status = 200, description = "Contracts", body = [ContractBody]),
        (status = 400, description = "Invalid user id", body = ErrorSchema)
    ),
    tags = ["contracts"],
    operation_id = "listContractsByCreator"
)]
#[get("/contracts/by-user/{user_id}")]
pub async fn contracts_by_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id = UserId::new(parse_id(&path.into_inner(), USER_ID)?);
    let contracts = state.workflow_query.contracts_created_by(user_id).await?;
    let body: Vec<ContractBody> = contracts.into_iter().map(ContractBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Per-step progress of one contract.
#[utoipa::path(
    get,
    path = "/api/contracts/{id}/timeline",
    params(("id" = i32, Path, description = "Contract id")),
    responses(
        (status = 200, description = "Timeline", body = TimelineBody),
        (status = 400, description = "Invalid contract id", body = ErrorSchema),
        (status = 404, description = "Unknown contract", body = ErrorSchema)
    ),
    tags = ["contracts"],
    operation_id = "contractTimeline"
)]
#[get("/contracts/{id}/timeline")]
pub async fn contract_timeline(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let contract_id = ContractId::new(parse_id(&path.into_inner(), CONTRACT_ID)?);
    let timeline = state.workflow_query.timeline(contract_id).await?;
    Ok(HttpResponse::Ok().json(TimelineBody {
        contract: timeline.contract.into(),
        timeline: timeline.timeline.into_iter().map(StepBody::from).collect(),
        tasks: timeline.tasks.into_iter().map(TaskBody::from).collect(),
    }))
}

#[cfg(test)]
#[path = "contracts_tests.rs"]
mod tests;
