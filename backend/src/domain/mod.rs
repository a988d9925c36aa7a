//! Domain model, workflow engine, ports and services.
//!
//! Nothing in here knows about HTTP or SQL. Inbound adapters call the driving
//! ports in [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`]: transport-agnostic failures.
//! - [`Contract`], [`Task`], [`User`], [`Unit`]: stored records.
//! - [`workflow`]: the transition table, planner and timeline projection.
//! - [`WorkflowService`] / [`DirectoryService`]: driving port implementations.

pub mod error;
pub mod ports;
pub mod workflow;

mod contract;
mod directory_service;
mod ids;
mod role;
mod task;
mod trace_id;
mod unit;
mod user;
mod workflow_service;

pub use self::contract::{
    Contract, ContractData, ContractDraft, ContractStatus, ContractStatusParseError,
    ContractSummary, ContractValidationError,
};
pub use self::directory_service::{DUPLICATE_EMAIL_MESSAGE, DirectoryService};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::ids::{ContractId, TaskId, UnitId, UserId};
pub use self::role::{Role, RoleParseError};
pub use self::task::{
    AssignedTask, NewTask, Task, TaskOverview, TaskStatus, TaskStatusParseError,
};
pub use self::trace_id::TraceId;
pub use self::unit::{Unit, UnitDraft, UnitValidationError};
pub use self::user::{NewUser, User, UserProfile, UserValidationError};
pub use self::workflow_service::WorkflowService;
