//! Internal Diesel row structs.
//!
//! Rows never leave the persistence layer. Conversions into domain types fail
//! with a [`RowError`] when a stored enum value or JSON payload no longer
//! parses.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

use super::schema::{contracts, tasks, units, users};
use crate::domain::workflow::TaskAnswers;
use crate::domain::{
    Contract, ContractData, ContractId, Task, TaskId, Unit, UnitId, User, UserId,
};

/// A stored value that does not map onto the domain model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("corrupt {table} row {id}: {message}")]
pub(crate) struct RowError {
    table: &'static str,
    id: i32,
    message: String,
}

impl RowError {
    fn new(table: &'static str, id: i32, message: impl ToString) -> Self {
        Self {
            table,
            id,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, RowError> {
        let role = self
            .role
            .parse()
            .map_err(|err| RowError::new("users", self.id, err))?;
        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email: self.email,
            role,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: Option<&'a str>,
    pub role: &'a str,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserUpdate<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub role: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = units)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UnitRow {
    pub id: i32,
    pub name: String,
    pub training_contact_user_id: Option<i32>,
}

impl UnitRow {
    pub(crate) fn into_domain(self, trainer_name: Option<String>) -> Unit {
        Unit {
            id: UnitId::new(self.id),
            name: self.name,
            training_contact_user_id: self.training_contact_user_id.map(UserId::new),
            trainer_name,
        }
    }
}

/// Insert and update share one shape; `None` clears the contact.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = units)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UnitChanges<'a> {
    pub name: &'a str,
    pub training_contact_user_id: Option<i32>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contracts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContractRow {
    pub id: i32,
    pub current_status: String,
    pub created_by: i32,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

impl ContractRow {
    pub(crate) fn into_domain(self) -> Result<Contract, RowError> {
        let current_status = self
            .current_status
            .parse()
            .map_err(|err| RowError::new("contracts", self.id, err))?;
        let data: ContractData = serde_json::from_value(self.data)
            .map_err(|err| RowError::new("contracts", self.id, err))?;
        Ok(Contract {
            id: ContractId::new(self.id),
            current_status,
            created_by: UserId::new(self.created_by),
            data,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contracts)]
pub(crate) struct NewContractRow<'a> {
    pub current_status: &'a str,
    pub created_by: i32,
    pub data: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TaskRow {
    pub id: i32,
    pub contract_id: i32,
    pub assigned_to: i32,
    pub step_name: String,
    pub description: String,
    pub status: String,
    pub data: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskRow {
    pub(crate) fn into_domain(self) -> Result<Task, RowError> {
        let id = self.id;
        let step = self
            .step_name
            .parse()
            .map_err(|err| RowError::new("tasks", id, err))?;
        let status = self
            .status
            .parse()
            .map_err(|err| RowError::new("tasks", id, err))?;
        let answers = self
            .data
            .map(TaskAnswers::try_from)
            .transpose()
            .map_err(|err| RowError::new("tasks", id, err))?;
        Ok(Task {
            id: TaskId::new(id),
            contract_id: ContractId::new(self.contract_id),
            assigned_to: UserId::new(self.assigned_to),
            step,
            description: self.description,
            status,
            answers,
            created_at: self.created_at,
            completed_at: self.completed_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub(crate) struct NewTaskRow<'a> {
    pub contract_id: i32,
    pub assigned_to: i32,
    pub step_name: &'a str,
    pub description: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}
