//! Outbound adapters implementing the driven ports.
//!
//! - `persistence`: PostgreSQL via Diesel, used when a database URL is set.
//! - `memory`: process-local store for development runs and tests.

pub mod memory;
pub mod persistence;
