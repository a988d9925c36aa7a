//! Department role catalogue.

use actix_web::{HttpResponse, get};

use crate::domain::Role;
use crate::inbound::http::dto::RoleBody;

/// Every department role with its display name and duty.
#[utoipa::path(
    get,
    path = "/api/workflow-roles",
    responses((status = 200, description = "Role catalogue", body = [RoleBody])),
    tags = ["users"],
    operation_id = "workflowRoles"
)]
#[get("/workflow-roles")]
pub async fn workflow_roles() -> HttpResponse {
    let roles: Vec<RoleBody> = Role::ALL.into_iter().map(RoleBody::from).collect();
    HttpResponse::Ok().json(roles)
}
