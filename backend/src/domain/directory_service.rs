//! Staff directory service implementing [`StaffDirectory`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::info;

use crate::domain::ports::{
    CreateUserRequest, DirectoryRepository, DirectoryRepositoryError, StaffDirectory, UnitRequest,
    UserRequest,
};
use crate::domain::{Error, NewUser, Role, Unit, UnitDraft, UnitId, User, UserId, UserProfile};

/// Returned when an email address is already taken.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Bu e-posta adresi zaten kullanılıyor.";

fn map_repository_error(error: DirectoryRepositoryError) -> Error {
    match error {
        DirectoryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("directory store unavailable: {message}"))
        }
        DirectoryRepositoryError::Query { message } => {
            Error::internal(format!("directory store error: {message}"))
        }
        DirectoryRepositoryError::DuplicateEmail { .. } => {
            Error::invalid_request(DUPLICATE_EMAIL_MESSAGE).with_details(json!({ "field": "email" }))
        }
        DirectoryRepositoryError::UserInUse { user_id } => Error::invalid_request(format!(
            "user {user_id} is referenced by contracts or tasks"
        ))
        .with_details(json!({ "userId": user_id })),
        DirectoryRepositoryError::UnknownUser { user_id } => {
            Error::invalid_request(format!("user {user_id} does not exist"))
                .with_details(json!({ "field": "training_contact_user_id" }))
        }
    }
}

fn user_not_found(user_id: UserId) -> Error {
    Error::not_found("Kullanıcı bulunamadı.").with_details(json!({ "userId": user_id }))
}

fn unit_not_found(unit_id: UnitId) -> Error {
    Error::not_found("Birim bulunamadı.").with_details(json!({ "unitId": unit_id }))
}

fn validate_profile(request: &UserRequest) -> Result<UserProfile, Error> {
    let role: Role = request.role.trim().parse().map_err(|err: crate::domain::RoleParseError| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "role" }))
    })?;
    UserProfile::new(&request.name, &request.email, role)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

fn validate_unit(request: &UnitRequest) -> Result<UnitDraft, Error> {
    UnitDraft::new(&request.name, request.training_contact_user_id).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({ "field": "name" }))
    })
}

/// Directory service over a [`DirectoryRepository`].
#[derive(Clone)]
pub struct DirectoryService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DirectoryService<R> {
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> StaffDirectory for DirectoryService<R>
where
    R: DirectoryRepository,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repo.list_users().await.map_err(map_repository_error)
    }

    async fn get_user(&self, user_id: UserId) -> Result<User, Error> {
        self.repo
            .find_user(user_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(user_id))
    }

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error> {
        let profile = validate_profile(&request.profile)?;
        let password = request.password.filter(|password| !password.is_empty());
        let user = self
            .repo
            .create_user(&NewUser { profile, password }, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %user.id, role = %user.role, "user created");
        Ok(user)
    }

    async fn update_user(&self, user_id: UserId, request: UserRequest) -> Result<User, Error> {
        let profile = validate_profile(&request)?;
        self.repo
            .update_user(user_id, &profile)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(user_id))
    }

    async fn delete_user(&self, user_id: UserId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_user(user_id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(user_not_found(user_id));
        }
        info!(user_id = %user_id, "user deleted");
        Ok(())
    }

    async fn list_units(&self) -> Result<Vec<Unit>, Error> {
        self.repo.list_units().await.map_err(map_repository_error)
    }

    async fn create_unit(&self, request: UnitRequest) -> Result<Unit, Error> {
        let draft = validate_unit(&request)?;
        self.repo
            .create_unit(&draft)
            .await
            .map_err(map_repository_error)
    }

    async fn update_unit(&self, unit_id: UnitId, request: UnitRequest) -> Result<Unit, Error> {
        let draft = validate_unit(&request)?;
        self.repo
            .update_unit(unit_id, &draft)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| unit_not_found(unit_id))
    }

    async fn delete_unit(&self, unit_id: UnitId) -> Result<(), Error> {
        let removed = self
            .repo
            .delete_unit(unit_id)
            .await
            .map_err(map_repository_error)?;
        if removed {
            Ok(())
        } else {
            Err(unit_not_found(unit_id))
        }
    }
}
