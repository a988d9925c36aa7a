//! Driven port for the staff directory and organisational units.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{NewUser, Unit, UnitDraft, UnitId, User, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by directory stores.
    pub enum DirectoryRepositoryError {
        Connection { message: String } =>
            "directory store connection failed: {message}",
        Query { message: String } =>
            "directory store query failed: {message}",
        /// Another user already has this email address.
        DuplicateEmail { email: String } =>
            "email {email} is already in use",
        /// The user is still referenced by a contract or task.
        UserInUse { user_id: UserId } =>
            "user {user_id} is referenced by workflow records",
        /// A unit references a user that does not exist.
        UnknownUser { user_id: UserId } =>
            "user {user_id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryRepository: Send + Sync {
    /// All users ordered by id.
    async fn list_users(&self) -> Result<Vec<User>, DirectoryRepositoryError>;

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, DirectoryRepositoryError>;

    async fn create_user(
        &self,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, DirectoryRepositoryError>;

    /// Replace a user's profile; `None` when the user does not exist.
    async fn update_user(
        &self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<Option<User>, DirectoryRepositoryError>;

    /// Remove a user; `false` when the user does not exist.
    async fn delete_user(&self, user_id: UserId) -> Result<bool, DirectoryRepositoryError>;

    /// All units ordered by id, with training contact names.
    async fn list_units(&self) -> Result<Vec<Unit>, DirectoryRepositoryError>;

    async fn create_unit(&self, draft: &UnitDraft) -> Result<Unit, DirectoryRepositoryError>;

    async fn update_unit(
        &self,
        unit_id: UnitId,
        draft: &UnitDraft,
    ) -> Result<Option<Unit>, DirectoryRepositoryError>;

    async fn delete_unit(&self, unit_id: UnitId) -> Result<bool, DirectoryRepositoryError>;
}
