//! PostgreSQL record stores built on Diesel.
//!
//! Repositories translate between the row structs in `models` and domain
//! types; `schema` mirrors `backend/migrations`. Neither leaves this module.
//!
//! ```no_run
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! use onboarding_backend::outbound::persistence::{
//!     DbPool, DieselWorkflowRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! let url = "postgres://localhost/onboarding";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let workflow = DieselWorkflowRepository::new(pool);
//! # let _ = workflow;
//! # Ok(())
//! # }
//! ```

mod diesel_directory_repository;
mod diesel_workflow_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_directory_repository::DieselDirectoryRepository;
pub use diesel_workflow_repository::DieselWorkflowRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
