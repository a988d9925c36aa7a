//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see the driving ports,
//! so they can be exercised against mocks without a record store.

use std::sync::Arc;

use crate::domain::ports::{StaffDirectory, WorkflowCommand, WorkflowQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub workflow: Arc<dyn WorkflowCommand>,
    pub workflow_query: Arc<dyn WorkflowQuery>,
    pub directory: Arc<dyn StaffDirectory>,
}

impl HttpState {
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use onboarding_backend::domain::workflow::{TransitionTable, WorkflowPlanner};
    /// use onboarding_backend::domain::{DirectoryService, WorkflowService};
    /// use onboarding_backend::inbound::http::state::HttpState;
    /// use onboarding_backend::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let clock = Arc::new(DefaultClock);
    /// let planner = Arc::new(WorkflowPlanner::new(TransitionTable::standard()));
    /// let workflow = Arc::new(WorkflowService::new(store.clone(), planner, clock.clone()));
    /// let directory = Arc::new(DirectoryService::new(store, clock));
    /// let state = HttpState::new(workflow.clone(), workflow, directory);
    /// let _ = state.directory.clone();
    /// ```
    pub fn new(
        workflow: Arc<dyn WorkflowCommand>,
        workflow_query: Arc<dyn WorkflowQuery>,
        directory: Arc<dyn StaffDirectory>,
    ) -> Self {
        Self {
            workflow,
            workflow_query,
            directory,
        }
    }
}
