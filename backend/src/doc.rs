//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer together
//! with the wire bodies and the [`ErrorSchema`] mirror of the domain error.
//! Swagger UI serves it in debug builds; `cargo run --bin openapi-dump`
//! exports it for external tooling.

use crate::inbound::http::contracts::{ContractStartedBody, StartContractBody, TimelineBody};
use crate::inbound::http::dto::{
    ContractBody, ContractDataBody, RoleBody, StepBody, TaskBody, TaskOverviewBody,
    TimelineContractBody, UnitBody, UserBody,
};
use crate::inbound::http::health::MessageBody;
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::tasks::CompletionBody;
use crate::inbound::http::units::UnitPayload;
use crate::inbound::http::users::UserPayload;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Doctor onboarding API",
        description = "Contract intake and multi-department task routing for new doctors."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::health::banner,
        crate::inbound::http::roles::workflow_roles,
        crate::inbound::http::contracts::start_contract,
        crate::inbound::http::contracts::list_contracts,
        crate::inbound::http::contracts::contracts_by_user,
        crate::inbound::http::contracts::contract_timeline,
        crate::inbound::http::tasks::list_tasks,
        crate::inbound::http::tasks::pending_tasks,
        crate::inbound::http::tasks::complete_task,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::units::list_units,
        crate::inbound::http::units::create_unit,
        crate::inbound::http::units::update_unit,
        crate::inbound::http::units::delete_unit,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        MessageBody,
        StartContractBody,
        ContractStartedBody,
        TimelineBody,
        ContractBody,
        ContractDataBody,
        TimelineContractBody,
        StepBody,
        TaskBody,
        TaskOverviewBody,
        CompletionBody,
        UserBody,
        UserPayload,
        UnitBody,
        UnitPayload,
        RoleBody,
    )),
    tags(
        (name = "health", description = "Liveness, readiness and the API banner"),
        (name = "contracts", description = "Starting contracts and following their progress"),
        (name = "tasks", description = "Department work items and their completion"),
        (name = "users", description = "Staff directory"),
        (name = "units", description = "Hospital units and their training contacts")
    )
)]
pub struct ApiDoc;
