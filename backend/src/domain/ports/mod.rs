//! Ports at the hexagonal boundary.
//!
//! Driving ports (`WorkflowCommand`, `WorkflowQuery`, `StaffDirectory`) are
//! what inbound adapters call. Driven ports (`WorkflowRepository`,
//! `DirectoryRepository`) are what outbound adapters implement.

mod macros;
pub(crate) use macros::define_port_error;

mod directory_repository;
mod staff_directory;
mod workflow_command;
mod workflow_query;
mod workflow_repository;

#[cfg(test)]
pub use directory_repository::MockDirectoryRepository;
pub use directory_repository::{DirectoryRepository, DirectoryRepositoryError};
#[cfg(test)]
pub use staff_directory::MockStaffDirectory;
pub use staff_directory::{CreateUserRequest, StaffDirectory, UnitRequest, UserRequest};
#[cfg(test)]
pub use workflow_command::MockWorkflowCommand;
pub use workflow_command::{
    CompleteTaskRequest, CompleteTaskResponse, StartContractRequest, StartContractResponse,
    WorkflowCommand,
};
#[cfg(test)]
pub use workflow_query::MockWorkflowQuery;
pub use workflow_query::{ContractTimeline, WorkflowQuery};
#[cfg(test)]
pub use workflow_repository::MockWorkflowRepository;
pub use workflow_repository::{CompletionRecord, WorkflowRepository, WorkflowRepositoryError};
