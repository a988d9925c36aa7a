//! Diesel and pool error classification shared by the repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// What a failed Diesel call means to a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Failure {
    Connection(String),
    /// A unique constraint rejected the write.
    Unique { constraint: Option<String> },
    /// A foreign key rejected the write or delete.
    ForeignKey { constraint: Option<String> },
    Query(String),
}

pub(crate) fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

pub(crate) fn classify(error: DieselError) -> Failure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            Failure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Failure::Unique {
            constraint: info.constraint_name().map(str::to_owned),
        },
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            Failure::ForeignKey {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::NotFound => Failure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => Failure::Query("database query error".to_owned()),
        DieselError::SerializationError(_) | DieselError::DeserializationError(_) => {
            Failure::Query("database value conversion error".to_owned())
        }
        _ => Failure::Query("database error".to_owned()),
    }
}

/// Failure inside a transaction body: either Diesel itself or a
/// repository-level refusal that must roll the transaction back.
#[derive(Debug)]
pub(crate) enum TxError<E> {
    Diesel(DieselError),
    Rejected(E),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}
