//! Builds the driving ports behind [`HttpState`] for the configured store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use onboarding_backend::domain::workflow::{TransitionPlanner, TransitionTable, WorkflowPlanner};
use onboarding_backend::domain::{DirectoryService, WorkflowService};
use onboarding_backend::inbound::http::state::HttpState;
use onboarding_backend::outbound::memory::MemoryStore;
use onboarding_backend::outbound::persistence::{
    DieselDirectoryRepository, DieselWorkflowRepository,
};

use super::{ServerConfig, StoreBackend};

pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let planner: Arc<dyn TransitionPlanner> = Arc::new(WorkflowPlanner::new(
        TransitionTable::for_sequence(config.extended_sequence),
    ));

    let state = match &config.store {
        StoreBackend::Memory => {
            let store = Arc::new(MemoryStore::seeded(clock.utc()));
            info!("serving from the seeded in-memory store");
            let workflow = Arc::new(WorkflowService::new(
                Arc::clone(&store),
                planner,
                Arc::clone(&clock),
            ));
            let directory = Arc::new(DirectoryService::new(store, clock));
            HttpState::new(workflow.clone(), workflow, directory)
        }
        StoreBackend::Postgres(pool) => {
            let workflow = Arc::new(WorkflowService::new(
                Arc::new(DieselWorkflowRepository::new(pool.clone())),
                planner,
                Arc::clone(&clock),
            ));
            let directory = Arc::new(DirectoryService::new(
                Arc::new(DieselDirectoryRepository::new(pool.clone())),
                clock,
            ));
            HttpState::new(workflow.clone(), workflow, directory)
        }
    };
    web::Data::new(state)
}
