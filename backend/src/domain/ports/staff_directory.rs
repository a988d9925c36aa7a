//! Driving port for staff and unit administration.

use async_trait::async_trait;

use crate::domain::{Error, Unit, UnitId, User, UserId};

/// Raw profile fields; `role` is validated against the role catalogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRequest {
    pub name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserRequest {
    pub profile: UserRequest,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitRequest {
    pub name: String,
    pub training_contact_user_id: Option<UserId>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    async fn list_users(&self) -> Result<Vec<User>, Error>;

    async fn get_user(&self, user_id: UserId) -> Result<User, Error>;

    async fn create_user(&self, request: CreateUserRequest) -> Result<User, Error>;

    async fn update_user(&self, user_id: UserId, request: UserRequest) -> Result<User, Error>;

    async fn delete_user(&self, user_id: UserId) -> Result<(), Error>;

    async fn list_units(&self) -> Result<Vec<Unit>, Error>;

    async fn create_unit(&self, request: UnitRequest) -> Result<Unit, Error>;

    async fn update_unit(&self, unit_id: UnitId, request: UnitRequest) -> Result<Unit, Error>;

    async fn delete_unit(&self, unit_id: UnitId) -> Result<(), Error>;
}
