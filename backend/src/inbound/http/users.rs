//! Staff administration endpoints.
//!
//! ```text
//! GET    /api/users
//! POST   /api/users
//! GET    /api/users/{id}
//! PUT    /api/users/{id}
//! DELETE /api/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::{CreateUserRequest, UserRequest};
use crate::domain::{Error, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::dto::UserBody;
use crate::inbound::http::health::MessageBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id, require};

const USER_ID: FieldName = FieldName::new("user_id");

pub const USER_DELETED: &str = "Kullanıcı silindi.";

/// Profile fields for creating or replacing a staff member.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UserPayload {
    #[schema(example = "Ayşe Kaya")]
    pub name: Option<String>,
    #[schema(example = "ik@hastane.local")]
    pub email: Option<String>,
    #[schema(example = "INSAN_KAYNAKLARI")]
    pub role: Option<String>,
    /// Stored as given; ignored on update.
    pub password: Option<String>,
}

impl UserPayload {
    fn into_profile(self) -> Result<(UserRequest, Option<String>), Error> {
        let profile = UserRequest {
            name: require(self.name, FieldName::new("name"))?,
            email: require(self.email, FieldName::new("email"))?,
            role: require(self.role, FieldName::new("role"))?,
        };
        Ok((profile, self.password))
    }
}

fn user_id(path: web::Path<String>) -> Result<UserId, Error> {
    parse_id(&path.into_inner(), USER_ID).map(UserId::new)
}

#[utoipa::path(
    get,
    path = "/api/users",
    responses((status = 200, description = "Staff ordered by id", body = [UserBody])),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let users = state.directory.list_users().await?;
    let body: Vec<UserBody> = users.into_iter().map(UserBody::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserPayload,
    responses(
        (status = 201, description = "User created", body = UserBody),
        (status = 400, description = "Missing field, unknown role or duplicate email", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let (profile, password) = payload.into_inner().into_profile()?;
    let user = state
        .directory
        .create_user(CreateUserRequest { profile, password })
        .await?;
    Ok(HttpResponse::Created().json(UserBody::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserBody),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user = state.directory.get_user(user_id(path)?).await?;
    Ok(HttpResponse::Ok().json(UserBody::from(user)))
}

#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    request_body = UserPayload,
    responses(
        (status = 200, description = "User updated", body = UserBody),
        (status = 400, description = "Invalid profile", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UserPayload>,
) -> ApiResult<HttpResponse> {
    let id = user_id(path)?;
    let (profile, _) = payload.into_inner().into_profile()?;
    let user = state.directory.update_user(id, profile).await?;
    Ok(HttpResponse::Ok().json(UserBody::from(user)))
}

/// Delete a user that no contract or task refers to.
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageBody),
        (status = 400, description = "User still referenced by workflow records", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = user_id(path)?;
    state.directory.delete_user(id).await?;
    info!(user_id = %id, "user deleted over HTTP");
    Ok(HttpResponse::Ok().json(MessageBody::new(USER_DELETED)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use mockall::predicate::eq;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{DUPLICATE_EMAIL_MESSAGE, Role};
    use crate::inbound::http::test_utils::{MockPorts, sample_user};
    use crate::inbound::http::validation::json_config;

    async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(ports.into_state()))
                .app_data(json_config())
                .service(
                    web::scope("/api")
                        .service(list_users)
                        .service(create_user)
                        .service(get_user)
                        .service(update_user)
                        .service(delete_user),
                ),
        )
        .await;
        let response = actix_test::call_service(&app, request.to_request()).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    fn payload() -> Value {
        json!({"name": "Ayşe Kaya", "email": "ik@hastane.local", "role": "INSAN_KAYNAKLARI"})
    }

    #[rstest]
    #[actix_web::test]
    async fn create_returns_created_without_password() {
        let mut ports = MockPorts::default();
        ports
            .directory
            .expect_create_user()
            .withf(|request| {
                request.profile.role == "INSAN_KAYNAKLARI" && request.password.is_none()
            })
            .return_once(|_| Ok(sample_user(12, Role::InsanKaynaklari)));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post().uri("/api/users").set_json(payload()),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 12);
        assert_eq!(body["role"], "INSAN_KAYNAKLARI");
        assert_eq!(body["role_name"], "İnsan Kaynakları");
        assert_eq!(body.get("password"), None);
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_a_bad_request() {
        let mut ports = MockPorts::default();
        ports
            .directory
            .expect_create_user()
            .return_once(|_| Err(Error::invalid_request(DUPLICATE_EMAIL_MESSAGE)));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::post().uri("/api/users").set_json(payload()),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], DUPLICATE_EMAIL_MESSAGE);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_role_is_reported_by_field() {
        let (status, body) = call(
            MockPorts::default(),
            actix_test::TestRequest::post()
                .uri("/api/users")
                .set_json(json!({"name": "Ayşe Kaya", "email": "ik@hastane.local"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "role");
    }

    #[rstest]
    #[actix_web::test]
    async fn update_passes_the_path_id() {
        let mut ports = MockPorts::default();
        ports
            .directory
            .expect_update_user()
            .withf(|id, request| *id == UserId::new(3) && request.email == "ik@hastane.local")
            .return_once(|_, _| Ok(sample_user(3, Role::InsanKaynaklari)));

        let (status, body) = call(
            ports,
            actix_test::TestRequest::put().uri("/api/users/3").set_json(payload()),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 3);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_confirms_with_a_message() {
        let mut ports = MockPorts::default();
        ports
            .directory
            .expect_delete_user()
            .with(eq(UserId::new(4)))
            .return_once(|_| Ok(()));

        let (status, body) = call(ports, actix_test::TestRequest::delete().uri("/api/users/4")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": USER_DELETED}));
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_user_is_not_found() {
        let mut ports = MockPorts::default();
        ports
            .directory
            .expect_get_user()
            .return_once(|_| Err(Error::not_found("Kullanıcı bulunamadı.")));

        let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/users/99")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Kullanıcı bulunamadı.");
    }

    #[rstest]
    #[actix_web::test]
    async fn listing_keeps_id_order() {
        let mut ports = MockPorts::default();
        ports.directory.expect_list_users().return_once(|| {
            Ok(vec![
                sample_user(1, Role::MaliGmy),
                sample_user(2, Role::MerkezHakedis),
            ])
        });

        let (status, body) = call(ports, actix_test::TestRequest::get().uri("/api/users")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["id"], 1);
        assert_eq!(body[1]["role"], "MERKEZ_HAKEDIS");
    }
}
