//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::domain::ports::{MockStaffDirectory, MockWorkflowCommand, MockWorkflowQuery};
use crate::domain::workflow::Step;
use crate::domain::{
    AssignedTask, Contract, ContractData, ContractId, ContractStatus, ContractSummary, Role, Task,
    TaskId, TaskStatus, User, UserId,
};
use crate::inbound::http::state::HttpState;
use crate::test_support::fixture_timestamp;

/// Mocks for every port the handlers can reach. Unset expectations panic.
#[derive(Default)]
pub struct MockPorts {
    pub workflow: MockWorkflowCommand,
    pub workflow_query: MockWorkflowQuery,
    pub directory: MockStaffDirectory,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.workflow),
            Arc::new(self.workflow_query),
            Arc::new(self.directory),
        )
    }
}

pub fn sample_summary(id: i32, status: ContractStatus) -> ContractSummary {
    ContractSummary {
        contract: Contract {
            id: ContractId::new(id),
            current_status: status,
            created_by: UserId::new(1),
            data: ContractData {
                doctor_name: "Dr. Ayşe Demir".to_owned(),
                doctor_role: "Kardiyoloji Uzmanı".to_owned(),
                start_date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or_default(),
            },
            created_at: fixture_timestamp(),
        },
        created_by_name: Some("Ahmet Yılmaz".to_owned()),
    }
}

pub fn sample_task(id: i32, step: Step, status: TaskStatus) -> AssignedTask {
    AssignedTask {
        task: Task {
            id: TaskId::new(id),
            contract_id: ContractId::new(1),
            assigned_to: UserId::new(1),
            step,
            description: format!("{} görevi", step.label()),
            status,
            answers: None,
            created_at: fixture_timestamp(),
            completed_at: matches!(status, TaskStatus::Completed).then(fixture_timestamp),
        },
        assignee_name: "Ahmet Yılmaz".to_owned(),
        assignee_role: Role::MaliGmy,
    }
}

pub fn sample_user(id: i32, role: Role) -> User {
    User {
        id: UserId::new(id),
        name: "Ayşe Kaya".to_owned(),
        email: format!("user{id}@hastane.local"),
        role,
        created_at: fixture_timestamp(),
    }
}
