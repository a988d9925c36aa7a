//! PostgreSQL-backed [`DirectoryRepository`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use super::error_mapping::{Failure, classify, pool_message};
use super::models::{NewUserRow, UnitChanges, UnitRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{units, users};
use crate::domain::ports::{DirectoryRepository, DirectoryRepositoryError};
use crate::domain::{NewUser, Unit, UnitDraft, UnitId, User, UserId, UserProfile};

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel implementation of the staff directory store.
#[derive(Clone)]
pub struct DieselDirectoryRepository {
    pool: DbPool,
}

impl DieselDirectoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DirectoryRepositoryError {
    DirectoryRepositoryError::connection(pool_message(error))
}

fn map_failure(failure: Failure) -> DirectoryRepositoryError {
    match failure {
        Failure::Connection(message) => DirectoryRepositoryError::connection(message),
        Failure::Query(message) => DirectoryRepositoryError::query(message),
        Failure::Unique { constraint } => DirectoryRepositoryError::query(format!(
            "unique constraint {} violated",
            constraint.as_deref().unwrap_or("<unnamed>")
        )),
        Failure::ForeignKey { .. } => DirectoryRepositoryError::query("foreign key violation"),
    }
}

fn map_diesel_error(error: diesel::result::Error) -> DirectoryRepositoryError {
    map_failure(classify(error))
}

/// Unique violations on the email column become [`DirectoryRepositoryError::DuplicateEmail`].
fn user_write_failure(failure: Failure, email: &str) -> DirectoryRepositoryError {
    match failure {
        Failure::Unique { constraint } if constraint.as_deref() == Some(EMAIL_CONSTRAINT) => {
            DirectoryRepositoryError::duplicate_email(email)
        }
        other => map_failure(other),
    }
}

fn map_user_write_error(error: diesel::result::Error, email: &str) -> DirectoryRepositoryError {
    user_write_failure(classify(error), email)
}

fn map_unit_write_error(error: diesel::result::Error, draft: &UnitDraft) -> DirectoryRepositoryError {
    match (classify(error), draft.training_contact()) {
        (Failure::ForeignKey { .. }, Some(user_id)) => DirectoryRepositoryError::unknown_user(user_id),
        (other, _) => map_failure(other),
    }
}

fn to_user(row: UserRow) -> Result<User, DirectoryRepositoryError> {
    row.into_domain()
        .map_err(|err| DirectoryRepositoryError::query(err.to_string()))
}

fn unit_changes(draft: &UnitDraft) -> UnitChanges<'_> {
    UnitChanges {
        name: draft.name(),
        training_contact_user_id: draft.training_contact().map(UserId::get),
    }
}

impl DieselDirectoryRepository {
    async fn unit_with_trainer(
        &self,
        unit_id: i32,
    ) -> Result<Option<Unit>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(UnitRow, Option<String>)> = units::table
            .left_join(users::table)
            .filter(units::id.eq(unit_id))
            .select((UnitRow::as_select(), users::name.nullable()))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|(unit, trainer)| unit.into_domain(trainer)))
    }
}

#[async_trait]
impl DirectoryRepository for DieselDirectoryRepository {
    async fn list_users(&self) -> Result<Vec<User>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order(users::id.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(to_user).collect()
    }

    async fn find_user(&self, user_id: UserId) -> Result<Option<User>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(user_id.get())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(to_user).transpose()
    }

    async fn create_user(
        &self,
        user: &NewUser,
        now: DateTime<Utc>,
    ) -> Result<User, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let email = user.profile.email();
        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                name: user.profile.name(),
                email,
                password: user.password.as_deref(),
                role: user.profile.role().as_str(),
                created_at: now,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_user_write_error(err, email))?;
        to_user(row)
    }

    async fn update_user(
        &self,
        user_id: UserId,
        profile: &UserProfile,
    ) -> Result<Option<User>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = diesel::update(users::table.find(user_id.get()))
            .set(&UserUpdate {
                name: profile.name(),
                email: profile.email(),
                role: profile.role().as_str(),
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(|err| map_user_write_error(err, profile.email()))?;
        row.map(to_user).transpose()
    }

    async fn delete_user(&self, user_id: UserId) -> Result<bool, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(users::table.find(user_id.get()))
            .execute(&mut conn)
            .await
            .map_err(|err| match classify(err) {
                Failure::ForeignKey { .. } => DirectoryRepositoryError::user_in_use(user_id),
                other => map_failure(other),
            })?;
        Ok(deleted > 0)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(UnitRow, Option<String>)> = units::table
            .left_join(users::table)
            .order(units::id.asc())
            .select((UnitRow::as_select(), users::name.nullable()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|(unit, trainer)| unit.into_domain(trainer))
            .collect())
    }

    async fn create_unit(&self, draft: &UnitDraft) -> Result<Unit, DirectoryRepositoryError> {
        let id: i32 = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::insert_into(units::table)
                .values(&unit_changes(draft))
                .returning(units::id)
                .get_result(&mut conn)
                .await
                .map_err(|err| map_unit_write_error(err, draft))?
        };
        self.unit_with_trainer(id)
            .await?
            .ok_or_else(|| DirectoryRepositoryError::query(format!("unit {id} vanished")))
    }

    async fn update_unit(
        &self,
        unit_id: UnitId,
        draft: &UnitDraft,
    ) -> Result<Option<Unit>, DirectoryRepositoryError> {
        let updated = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::update(units::table.find(unit_id.get()))
                .set(&unit_changes(draft))
                .execute(&mut conn)
                .await
                .map_err(|err| map_unit_write_error(err, draft))?
        };
        if updated == 0 {
            return Ok(None);
        }
        self.unit_with_trainer(unit_id.get()).await
    }

    async fn delete_unit(&self, unit_id: UnitId) -> Result<bool, DirectoryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(units::table.find(unit_id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some("users_email_key"), true)]
    #[case(Some("users_pkey"), false)]
    #[case(None, false)]
    fn only_the_email_constraint_means_duplicate_email(
        #[case] constraint: Option<&str>,
        #[case] duplicate: bool,
    ) {
        let failure = Failure::Unique {
            constraint: constraint.map(str::to_owned),
        };
        let mapped = user_write_failure(failure, "a@b.c");
        assert_eq!(
            matches!(mapped, DirectoryRepositoryError::DuplicateEmail { .. }),
            duplicate
        );
    }

    #[rstest]
    fn unit_changes_clear_missing_contacts() {
        let draft = UnitDraft::new("Kalite", None).expect("valid draft");
        assert_eq!(unit_changes(&draft).training_contact_user_id, None);
        let draft = UnitDraft::new("Kalite", Some(UserId::new(10))).expect("valid draft");
        assert_eq!(unit_changes(&draft).training_contact_user_id, Some(10));
    }
}
