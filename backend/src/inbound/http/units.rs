//! Unit administration endpoints.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::ports::UnitRequest;
use crate::domain::{Error, UnitId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UnitBody;
use crate::inbound::http::health::MessageBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

const UNIT_ID: FieldName = FieldName::new("unit_id");

pub const UNIT_DELETED: &str = "Birim silindi.";

#[derive(Debug, Deserialize, ToSchema)]
pub struct UnitPayload {
    #[schema(example = "Kalite")]
    pub name: Option<String>,
    /// Staff member who runs the unit's training; `null` clears it.
    #[schema(example = 10)]
    pub training_contact_user_id: Option<i32>,
}

impl UnitPayload {
    fn into_request(self) -> Result<UnitRequest, Error> {
        Ok(UnitRequest {
            name: require(self.name, FieldName::new("name"))?,
            training_contact_user_id: self.training_contact_user_id.map(UserId::new),
        })
    }
}

fn unit_id(path: web::Path<String>) -> Result<UnitId, Error> {
    parse_id(&path.into_inner(), UNIT_ID).map(UnitId::new)
}

#[utoipa::path(
    get,
    path = "/api/units",
    responses((status = 200, description = "Units with trainer names", body = [UnitBody])),
    tags = ["units"],
    operation_id = "listUnits"
)]
#[get("/units")]
pub async fn list_units(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let units = state.directory.list_units().await?;
    let body: Vec<UnitBody> = units.into_iter().map(UnitBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    post,
    path = "/api/units",
    request_body = UnitPayload,
    responses(
        (status = 201, description = "Unit created", body = UnitBody),
        (status = 400, description = "Missing name or unknown training contact", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "createUnit"
)]
#[post("/units")]
pub async fn create_unit(
    state: web::Data<HttpState>,
    payload: web::Json<UnitPayload>,
) -> ApiResult<HttpResponse> {
    let unit = state
        .directory
        .create_unit(payload.into_inner().into_request()?)
        .await?;
    Ok(HttpResponse::Created().json(UnitBody::from(unit)))
}

#[utoipa::path(
    put,
    path = "/api/units/{id}",
    params(("id" = i32, Path, description = "Unit id")),
    request_body = UnitPayload,
    responses(
        (status = 200, description = "Unit updated", body = UnitBody),
        (status = 404, description = "Unknown unit", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "updateUnit"
)]
#[put("/units/{id}")]
pub async fn update_unit(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UnitPayload>,
) -> ApiResult<HttpResponse> {
    let id = unit_id(path)?;
    let unit = state
        .directory
        .update_unit(id, payload.into_inner().into_request()?)
        .await?;
    Ok(HttpResponse::Ok().json(UnitBody::from(unit)))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    params(("id" = i32, Path, description = "Unit id")),
    responses(
        (status = 200, description = "Unit deleted", body = MessageBody),
        (status = 404, description = "Unknown unit", body = ErrorSchema)
    ),
    tags = ["units"],
    operation_id = "deleteUnit"
)]
#[delete("/units/{id}")]
pub async fn delete_unit(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.directory.delete_unit(unit_id(path)?).await?;
    Ok(HttpResponse::Ok().json(MessageBody::new(UNIT_DELETED)))
}
